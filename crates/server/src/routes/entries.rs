use actix_web::{http::header, post, web, HttpResponse};
use semsort_vector::NewEntry;
use tracing::{info, warn};

use crate::compose::compose_sentence;
use crate::error::HttpResult;
use crate::state::AppState;
use crate::types::{ComposeForm, SelectForm};

fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Compose a sentence from two fields, store it, and show it as the query
#[post("/compose")]
pub async fn compose(
    form: web::Form<ComposeForm>,
    state: web::Data<AppState>,
) -> HttpResult<HttpResponse> {
    let (first, second) = (form.first.trim(), form.second.trim());
    if first.is_empty() || second.is_empty() {
        return Ok(see_other("/".to_string()));
    }

    let text = compose_sentence(&state.config.compose_template, first, second);
    let embedding = state.embedder.embed(&text).await?;
    let entry = state.store.insert(NewEntry::new(text, embedding)).await?;

    info!("Composed entry {}: {}", entry.id, entry.text);
    Ok(see_other(format!("/query/{}", entry.id)))
}

/// Redirect to the stable URL for a query selection
#[post("/select")]
pub async fn select(form: web::Form<SelectForm>) -> HttpResponse {
    see_other(format!("/query/{}", form.query_id))
}

#[post("/delete/{id}")]
pub async fn delete(path: web::Path<i64>, state: web::Data<AppState>) -> HttpResult<HttpResponse> {
    let id = path.into_inner();
    if !state.store.delete(id).await? {
        warn!("Delete requested for missing entry {}", id);
    }

    Ok(see_other("/".to_string()))
}
