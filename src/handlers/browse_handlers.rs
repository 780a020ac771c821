use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::catalog::types::{CatalogItem, RawConference};
use crate::catalog::view_state::ViewState;
use crate::catalog::{FilterState, filter, normalize, sort};
use crate::errors::{AppError, render};
use crate::store::RecordStore;
use crate::templates_structs::{CardView, IndexTemplate};

/// The view-local extras riding alongside the permalinked view state:
/// `show_past` and the post-submission banner flag. The state itself is
/// decoded from the raw query string by the codec.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    show_past: bool,
    #[serde(default)]
    submitted: bool,
}

struct RankedView {
    state: ViewState,
    ranked: Vec<CatalogItem>,
    categories: Vec<String>,
    subfields: Vec<String>,
}

/// Normalize, filter and sort under a single `now`/`today` capture.
fn rank(
    raw: &[RawConference],
    mut state: ViewState,
    show_past: bool,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> RankedView {
    let items: Vec<CatalogItem> = raw.iter().map(|r| normalize(r, now)).collect();

    let categories = filter::category_options(&items);
    let subfields = filter::subfield_options(&items, &state.category);
    // A subfield that is not in the selected category's pool resets to
    // "all", same as the subfield select in the UI.
    if state.subfield != "all" && !subfields.contains(&state.subfield) {
        state.subfield = "all".to_string();
    }

    let filter_state = FilterState::from_view(&state, show_past);
    let mut filtered = filter::apply(&items, &filter_state, today);
    sort::sort_items(&mut filtered, &state.sort);
    let ranked = filtered.into_iter().cloned().collect();

    RankedView {
        state,
        ranked,
        categories,
        subfields,
    }
}

/// GET /: the card grid.
pub async fn index(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<BrowseQuery>,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let today = Local::now().date_naive();
    let state = ViewState::decode(req.query_string());

    let (raw, load_error) = match pool.get_ref().list_conferences().await {
        Ok(raw) => (raw, None),
        Err(e) => {
            log::error!("failed to load conferences: {e}");
            (vec![], Some("Failed to load conferences.".to_string()))
        }
    };

    let view = rank(&raw, state, query.show_past, now, today);
    let cards: Vec<CardView> = view
        .ranked
        .iter()
        .map(|item| CardView::build(item, now))
        .collect();

    render(IndexTemplate {
        state: view.state,
        show_past: query.show_past,
        submitted: query.submitted,
        load_error,
        categories: view.categories,
        subfields: view.subfields,
        result_count: cards.len(),
        cards,
    })
}

/// GET /api/conferences: the same ranked view as JSON.
pub async fn data(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<BrowseQuery>,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let today = Local::now().date_naive();
    let state = ViewState::decode(req.query_string());

    let raw = pool.get_ref().list_conferences().await?;
    let view = rank(&raw, state, query.show_past, now, today);
    Ok(HttpResponse::Ok().json(view.ranked))
}
