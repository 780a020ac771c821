use actix_web::{App, HttpServer, middleware, web};

use alldeadlines::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool).await;

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Public browse + submission
            .route("/", web::get().to(handlers::browse_handlers::index))
            .route("/api/conferences", web::get().to(handlers::browse_handlers::data))
            .route("/suggestions", web::post().to(handlers::suggestion_handlers::submit))
            // Calendar exports
            .route(
                "/conferences/{id}/calendar.ics",
                web::get().to(handlers::calendar_handlers::conference_ics),
            )
            .route(
                "/conferences/{id}/deadlines/{index}.ics",
                web::get().to(handlers::calendar_handlers::deadline_ics),
            )
            // Admin review queue (behind the reverse proxy's auth)
            .route("/admin", web::get().to(handlers::suggestion_handlers::queue))
            .route(
                "/admin/suggestions/{id}/approve",
                web::post().to(handlers::suggestion_handlers::approve),
            )
            .route(
                "/admin/suggestions/{id}/reject",
                web::post().to(handlers::suggestion_handlers::reject),
            )
            .route(
                "/admin/conferences/{id}",
                web::post().to(handlers::conference_handlers::update),
            )
            .route(
                "/admin/conferences/{id}/delete",
                web::post().to(handlers::conference_handlers::delete),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
