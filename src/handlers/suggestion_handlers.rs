use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::{AppError, render};
use crate::models::suggestion::{SuggestionForm, SuggestionRow};
use crate::reconcile::{self, ApprovalOutcome, ReconcileError};
use crate::store::RecordStore;
use crate::templates_structs::{AdminTemplate, ConferenceView, SuggestionView};

/// POST /suggestions: public submission form.
pub async fn submit(
    pool: web::Data<PgPool>,
    form: web::Form<SuggestionForm>,
) -> Result<HttpResponse, AppError> {
    let new = form.into_inner().into_new()?;
    pool.get_ref().insert_suggestion(&new).await?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/?submitted=true"))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub notice: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

async fn build_suggestion_view<S: RecordStore>(store: &S, s: &SuggestionRow) -> SuggestionView {
    if !s.is_edit {
        return SuggestionView::build(s, None);
    }
    let Some(target_id) = s.target_conference_id.as_deref() else {
        return SuggestionView::build(s, None);
    };
    // A fetch failure here only degrades the diff, not the queue.
    let target = store.find_conference(target_id).await.ok().flatten();
    let deadlines = store.deadlines_for(target_id).await.unwrap_or_default();
    match target {
        Some(row) => SuggestionView::build(s, Some((&row, &deadlines))),
        None => SuggestionView::build(s, None),
    }
}

/// GET /admin: the review queue plus the conference list.
pub async fn queue(
    pool: web::Data<PgPool>,
    query: web::Query<AdminQuery>,
) -> Result<HttpResponse, AppError> {
    let store = pool.get_ref();

    let (suggestions, suggestions_error) = match store.list_suggestions().await {
        Ok(rows) => {
            let mut views = Vec::with_capacity(rows.len());
            for s in &rows {
                views.push(build_suggestion_view(store, s).await);
            }
            (views, None)
        }
        Err(e) => {
            log::error!("failed to load suggestions: {e}");
            (vec![], Some("Failed to load suggestions.".to_string()))
        }
    };

    let (conferences, conferences_error) = match store.list_conference_rows().await {
        Ok(rows) => (rows.iter().map(ConferenceView::from).collect(), None),
        Err(e) => {
            log::error!("failed to load conferences: {e}");
            (vec![], Some("Failed to load conferences.".to_string()))
        }
    };

    render(AdminTemplate {
        notice: query.notice.clone(),
        warning: query.warning.clone(),
        error: query.error.clone(),
        suggestions_error,
        conferences_error,
        suggestions,
        conferences,
    })
}

fn redirect_admin(kind: &str, message: String) -> HttpResponse {
    let query = serde_urlencoded::to_string([(kind, message.as_str())]).unwrap_or_default();
    HttpResponse::SeeOther()
        .insert_header(("Location", format!("/admin?{query}")))
        .finish()
}

/// POST /admin/suggestions/{id}/approve
pub async fn approve(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let suggestion_id = path.into_inner();

    let response = match reconcile::approve(pool.get_ref(), suggestion_id, Utc::now()).await {
        Ok(ApprovalOutcome::Created { conference_id }) => {
            redirect_admin("notice", format!("Added conference '{conference_id}'"))
        }
        Ok(ApprovalOutcome::CreatedWithoutDeadlines { conference_id, detail }) => redirect_admin(
            "warning",
            format!("Conference '{conference_id}' was added, but its deadlines failed: {detail}"),
        ),
        Ok(ApprovalOutcome::Updated { conference_id }) => {
            redirect_admin("notice", format!("Updated conference '{conference_id}'"))
        }
        Err(e @ ReconcileError::DeadlinesCleared { .. }) => {
            log::error!("approval of suggestion {suggestion_id} cleared deadlines: {e}");
            redirect_admin("error", e.to_string())
        }
        Err(e) => {
            log::error!("approval of suggestion {suggestion_id} failed: {e}");
            redirect_admin("error", format!("Approval failed: {e}"))
        }
    };
    Ok(response)
}

/// POST /admin/suggestions/{id}/reject
pub async fn reject(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let suggestion_id = path.into_inner();
    let response = match reconcile::reject(pool.get_ref(), suggestion_id).await {
        Ok(()) => redirect_admin("notice", "Suggestion rejected".to_string()),
        Err(e) => {
            log::error!("rejection of suggestion {suggestion_id} failed: {e}");
            redirect_admin("error", format!("Rejection failed: {e}"))
        }
    };
    Ok(response)
}
