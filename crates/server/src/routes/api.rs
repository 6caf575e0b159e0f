use actix_web::{get, web, HttpResponse};
use semsort_common::SemsortError;
use semsort_vector::{rank_by_id, rank_latest};

use crate::error::HttpResult;
use crate::state::AppState;
use crate::types::{EntrySummary, RankResponse};

#[get("/api/entries")]
pub async fn list_entries(state: web::Data<AppState>) -> HttpResult<HttpResponse> {
    let entries = state.store.list().await?;
    let summaries: Vec<EntrySummary> = entries.iter().map(EntrySummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/api/rank/{id}")]
pub async fn rank_entries(path: web::Path<i64>, state: web::Data<AppState>) -> HttpResult<HttpResponse> {
    let query_id = path.into_inner();
    let entries = state.store.list().await?;

    let results = rank_by_id(&entries, query_id)
        .ok_or_else(|| SemsortError::not_found(format!("entry {}", query_id)))?;

    Ok(HttpResponse::Ok().json(RankResponse { query_id, results }))
}

/// Ranking against the most recent entry
#[get("/api/rank/latest")]
pub async fn rank_newest(state: web::Data<AppState>) -> HttpResult<HttpResponse> {
    let entries = state.store.list().await?;

    let results = rank_latest(&entries);
    let query_id = results
        .first()
        .map(|r| r.id)
        .ok_or_else(|| SemsortError::not_found("no entries yet"))?;

    Ok(HttpResponse::Ok().json(RankResponse { query_id, results }))
}
