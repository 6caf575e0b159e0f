use actix_web::{get, post, web, HttpResponse};
use semsort_common::SemsortError;
use semsort_vector::{rank, rank_by_id, Entry, NewEntry, RankedEntry};
use tracing::info;

use crate::error::HttpResult;
use crate::render::PageView;
use crate::state::AppState;
use crate::types::SubmitForm;

fn page(
    state: &AppState,
    entries: &[Entry],
    ranked: &[RankedEntry],
    query_id: Option<i64>,
) -> HttpResult<HttpResponse> {
    let html = state.renderer.render(&PageView {
        entries,
        ranked,
        query_id,
        embedding_model: state.embedder.model(),
        compose_template: &state.config.compose_template,
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Chronological list only
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> HttpResult<HttpResponse> {
    let entries = state.store.list().await?;
    page(&state, &entries, &[], None)
}

/// Add an entry and rank everything against it
#[post("/")]
pub async fn submit(
    form: web::Form<SubmitForm>,
    state: web::Data<AppState>,
) -> HttpResult<HttpResponse> {
    let text = form.user_text.trim();
    if text.is_empty() {
        let entries = state.store.list().await?;
        return page(&state, &entries, &[], None);
    }

    let embedding = state.embedder.embed(text).await?;
    let inserted = state.store.insert(NewEntry::new(text, embedding)).await?;

    // Re-fetch so the page reflects the stored order
    let entries = state.store.list().await?;
    let ranked = rank(&inserted, &entries);

    info!("Entry {} added; ranked {} others", inserted.id, ranked.len() - 1);
    page(&state, &entries, &ranked, Some(inserted.id))
}

/// Both lists, ranked against the entry with `id`
#[get("/query/{id}")]
pub async fn query(path: web::Path<i64>, state: web::Data<AppState>) -> HttpResult<HttpResponse> {
    let id = path.into_inner();
    let entries = state.store.list().await?;

    let ranked = rank_by_id(&entries, id)
        .ok_or_else(|| SemsortError::not_found(format!("entry {}", id)))?;

    page(&state, &entries, &ranked, Some(id))
}
