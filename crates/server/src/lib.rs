//! SemSort HTTP server
//!
//! Actix-web page, form handlers and JSON API over the entry store

pub mod compose;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod types;

use actix_web::{web, App, HttpServer};
use semsort_common::{AppConfig, Result};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Build the collaborators from `config` and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(AppState::new(config)?);

    info!(
        "Starting server on http://{} (embedding model: {})",
        bind_addr,
        state.embedder.model()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use semsort_vector::NewEntry;

    async fn seed(state: &AppState, texts: &[&str]) {
        for text in texts {
            let embedding = state.embedder.embed(text).await.unwrap();
            state.store.insert(NewEntry::new(*text, embedding)).await.unwrap();
        }
    }

    fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn body_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[actix_web::test]
    async fn test_index_lists_without_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::state(&dir);
        seed(&state, &["a cat", "a dog"]).await;

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(routes::configure),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_text(&test::read_body(resp).await);
        assert!(body.contains("a cat"));
        assert!(body.contains("a dog"));
        assert!(body.contains("Submit an entry or pick one"));
    }

    #[actix_web::test]
    async fn test_submit_ranks_against_new_entry() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::state(&dir);
        seed(&state, &["dog park", "cat nap", "car wash"]).await;

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_form([("user_text", "  cat cat dog  ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_text(&test::read_body(resp).await);
        let semantic = &body[body.find("Semantic order").unwrap()..];
        let query = semantic.find("cat cat dog").unwrap();
        let cat = semantic.find("cat nap").unwrap();
        let dog = semantic.find("dog park").unwrap();
        let car = semantic.find("car wash").unwrap();
        assert!(query < cat && cat < dog && dog < car);
    }

    #[actix_web::test]
    async fn test_blank_submission_inserts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(test_support::state(&dir));

        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_form([("user_text", "   ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.store.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_embedding_failure_is_gateway_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(test_support::state(&dir));

        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_form([("user_text", "explode")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(state.store.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_compose_redirects_to_query_url() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(test_support::state(&dir));
        seed(&state, &["car"]).await;

        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/compose")
            .set_form([("first", "cat"), ("second", "dogs")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/query/2");

        let stored = state.store.get(2).await.unwrap().unwrap();
        assert_eq!(stored.text, "The cat likes dogs.");
    }

    #[actix_web::test]
    async fn test_compose_with_missing_field_inserts_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(test_support::state(&dir));

        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/compose")
            .set_form([("first", "cat"), ("second", " ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        assert!(state.store.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_select_and_query_page() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::state(&dir);
        seed(&state, &["car race", "cat toy", "car park"]).await;

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/select")
            .set_form([("query_id", "1")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/query/1");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/query/1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(&test::read_body(resp).await);
        let semantic = &body[body.find("Semantic order").unwrap()..];
        assert!(semantic.find("car race").unwrap() < semantic.find("car park").unwrap());
        assert!(semantic.find("car park").unwrap() < semantic.find("cat toy").unwrap());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/query/42").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_redirects_home() {
        let dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(test_support::state(&dir));
        seed(&state, &["cat", "dog"]).await;

        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::configure),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::post().uri("/delete/1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");

        let remaining: Vec<i64> = state.store.list().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![2]);
    }

    #[actix_web::test]
    async fn test_api_rank_and_entries() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_support::state(&dir);
        seed(&state, &["dog", "cat", "cat dog"]).await;

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(routes::configure),
        )
        .await;

        let entries: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/entries").to_request(),
        )
        .await;
        assert_eq!(entries.as_array().unwrap().len(), 3);
        assert!(entries[0].get("embedding").is_none());

        let ranked: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/rank/2").to_request(),
        )
        .await;
        assert_eq!(ranked["query_id"], 2);
        let ids: Vec<i64> = ranked["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(ranked["results"][0]["score"].is_null());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/rank/9").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let latest: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/rank/latest").to_request(),
        )
        .await;
        assert_eq!(latest["query_id"], 3);
        assert_eq!(latest["results"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn test_api_rank_latest_without_entries() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state(&dir)))
                .configure(routes::configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/rank/latest").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_support::state(&dir)))
                .configure(routes::configure),
        )
        .await;

        let health: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["embedding_model"], "keyword-test");
    }
}
