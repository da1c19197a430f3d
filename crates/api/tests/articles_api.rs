//! HTTP-level tests for the read-only JSON API.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

use helpcenter_core::article::ArticleKind;
use helpcenter_db::models::error_article::CreateErrorArticle;
use helpcenter_db::repositories::ErrorArticleRepo;

async fn seed(pool: &PgPool) {
    let articles = [
        ("Login fails 403", "Auth", ArticleKind::Error, true),
        ("Session expired", "Auth", ArticleKind::Error, false),
        ("Exporting invoices", "Billing", ArticleKind::Guide, false),
    ];
    for (title, category, kind, featured) in articles {
        let input = CreateErrorArticle {
            kind,
            title: title.into(),
            category: category.into(),
            customer_message: format!("{title}!"),
            featured,
            ..CreateErrorArticle::default()
        };
        ErrorArticleRepo::create(pool, &input).await.unwrap();
    }
}

async fn get_json(pool: &PgPool, uri: &str) -> (StatusCode, serde_json::Value) {
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool.clone(), media.path());
    let response = get(app, uri).await;
    let status = response.status();
    (status, body_json(response).await)
}

fn titles(json: &serde_json::Value) -> Vec<&str> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_returns_data_envelope_newest_first(pool: PgPool) {
    seed(&pool).await;

    let (status, json) = get_json(&pool, "/api/v1/errors").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&json),
        vec!["Exporting invoices", "Session expired", "Login fails 403"]
    );
    assert_eq!(json["data"][0]["kind"], "guide");
    assert!(json["data"][0]["causes"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_combine(pool: PgPool) {
    seed(&pool).await;

    let (_, json) = get_json(&pool, "/api/v1/errors?category=Auth&q=session").await;
    assert_eq!(titles(&json), vec!["Session expired"]);

    let (_, json) = get_json(&pool, "/api/v1/errors?featured=true").await;
    assert_eq!(titles(&json), vec!["Login fails 403"]);

    let (_, json) = get_json(&pool, "/api/v1/errors?kind=guide").await;
    assert_eq!(titles(&json), vec!["Exporting invoices"]);

    let (_, json) = get_json(&pool, "/api/v1/errors?limit=1").await;
    assert_eq!(titles(&json), vec!["Exporting invoices"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_unknown_kind(pool: PgPool) {
    let (status, json) = get_json(&pool, "/api/v1/errors?kind=tutorial").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_by_id_and_missing(pool: PgPool) {
    seed(&pool).await;
    let (_, list) = get_json(&pool, "/api/v1/errors?q=login").await;
    let id = list["data"][0]["id"].as_i64().unwrap();

    let (status, json) = get_json(&pool, &format!("/api/v1/errors/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Login fails 403");
    assert_eq!(json["data"]["featured"], true);

    let (status, json) = get_json(&pool, "/api/v1/errors/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Article with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_categories_with_counts(pool: PgPool) {
    seed(&pool).await;

    let (status, json) = get_json(&pool, "/api/v1/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"],
        serde_json::json!([
            {"name": "Auth", "count": 2},
            {"name": "Billing", "count": 1}
        ])
    );
}
