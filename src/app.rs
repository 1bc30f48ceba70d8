use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::{config::AppConfig, db::DbPool, handlers};

pub fn build_router(pool: DbPool, config: Arc<AppConfig>) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_ttl_days)))
        .with_secure(config.session_secure);

    Router::new()
        .route("/health", get(health))
        .nest("/auth", handlers::auth::auth_router(pool.clone(), config))
        .nest("/api", handlers::api_router(pool))
        .layer(session_layer)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{ReviewResponse, UserInfo};
    use crate::db::test_pool;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    fn app() -> Router {
        let config = AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        };
        build_router(test_pool(), Arc::new(config))
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: Method, uri: &str, cookie: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    /// Registers `email` and returns the session cookie to send back.
    async fn register(app: &Router, email: &str) -> String {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "email={}&password=password123",
                email.replace('@', "%40")
            )))
            .unwrap();

        let response = send(app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
            .expect("session cookie")
    }

    async fn create_deck(app: &Router, cookie: &str, title: &str) -> i64 {
        let response = send(
            app,
            json_request(Method::POST, "/api/decks", cookie, json!({ "title": title })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["deck_id"].as_i64().unwrap()
    }

    async fn create_card(app: &Router, cookie: &str, deck_id: i64, front: &str) -> i64 {
        let response = send(
            app,
            json_request(
                Method::POST,
                "/api/cards",
                cookie,
                json!({ "deck_id": deck_id, "front": front, "back": "answer" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["card_id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_session() {
        let response = send(&app(), get_request("/health", "")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_a_session() {
        let app = app();
        for uri in ["/api/decks", "/api/review", "/api/cards/1"] {
            let response = send(&app, get_request(uri, "")).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        // Identity is checked before the body is looked at
        let response = send(
            &app,
            json_request(Method::POST, "/api/review", "", json!({ "grade": "bogus" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn register_login_me_logout() {
        let app = app();
        let cookie = register(&app, "learner@example.com").await;

        let me = send(&app, get_request("/auth/me", &cookie)).await;
        assert_eq!(me.status(), StatusCode::OK);
        let me: UserInfo = serde_json::from_value(json_body(me).await).unwrap();
        assert_eq!(me.email, "learner@example.com");

        let duplicate = Request::builder()
            .method(Method::POST)
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=learner%40example.com&password=password123"))
            .unwrap();
        assert_eq!(send(&app, duplicate).await.status(), StatusCode::CONFLICT);

        let bad_login = Request::builder()
            .method(Method::POST)
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=learner%40example.com&password=wrong-password"))
            .unwrap();
        assert_eq!(send(&app, bad_login).await.status(), StatusCode::UNAUTHORIZED);

        let login = Request::builder()
            .method(Method::POST)
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=learner%40example.com&password=password123"))
            .unwrap();
        assert_eq!(send(&app, login).await.status(), StatusCode::OK);

        let logout = Request::builder()
            .method(Method::POST)
            .uri("/auth/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, logout).await.status(), StatusCode::OK);

        let me = send(&app, get_request("/auth/me", &cookie)).await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40example.com&password=short"))
            .unwrap();
        let response = send(&app(), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Password must be at least 8 characters"
        );
    }

    #[tokio::test]
    async fn review_flow_over_http() {
        let app = app();
        let cookie = register(&app, "learner@example.com").await;
        let deck_id = create_deck(&app, &cookie, "Kanji").await;
        let card_id = create_card(&app, &cookie, deck_id, "水").await;

        let due = json_body(send(&app, get_request("/api/review", &cookie)).await).await;
        assert_eq!(due.as_array().map(Vec::len), Some(1));
        assert_eq!(due[0]["card_id"].as_i64(), Some(card_id));
        assert_eq!(due[0]["deck"]["title"], "Kanji");

        let response = send(
            &app,
            json_request(
                Method::POST,
                "/api/review",
                &cookie,
                json!({ "card_id": card_id, "grade": 5 }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let review: ReviewResponse = serde_json::from_value(json_body(response).await).unwrap();
        assert!(review.success);
        assert_eq!(review.interval_days, 7);

        let due = json_body(send(&app, get_request("/api/review", &cookie)).await).await;
        assert_eq!(due, json!([]));

        let card = json_body(send(&app, get_request(&format!("/api/cards/{}", card_id), &cookie)).await).await;
        assert_eq!(card["reviews"][0]["grade"], 5);
        assert_eq!(card["deck"]["deck_id"].as_i64(), Some(deck_id));
    }

    #[tokio::test]
    async fn card_view_shows_five_newest_reviews() {
        let app = app();
        let cookie = register(&app, "learner@example.com").await;
        let deck_id = create_deck(&app, &cookie, "Kanji").await;
        let card_id = create_card(&app, &cookie, deck_id, "火").await;

        for grade in 0..6 {
            let response = send(
                &app,
                json_request(
                    Method::POST,
                    "/api/review",
                    &cookie,
                    json!({ "card_id": card_id, "grade": grade }),
                ),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let card = json_body(send(&app, get_request(&format!("/api/cards/{}", card_id), &cookie)).await).await;
        let grades: Vec<i64> = card["reviews"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["grade"].as_i64().unwrap())
            .collect();
        assert_eq!(grades, vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn review_rejects_bad_grades_and_foreign_cards() {
        let app = app();
        let owner = register(&app, "owner@example.com").await;
        let other = register(&app, "other@example.com").await;
        let deck_id = create_deck(&app, &owner, "Mine").await;
        let card_id = create_card(&app, &owner, deck_id, "front").await;

        for grade in [json!(6), json!(2.5), json!("abc")] {
            let response = send(
                &app,
                json_request(
                    Method::POST,
                    "/api/review",
                    &owner,
                    json!({ "card_id": card_id, "grade": grade }),
                ),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "grade {}", grade);
        }

        let response = send(
            &app,
            json_request(Method::POST, "/api/review", &owner, json!({ "grade": 3 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            json_request(
                Method::POST,
                "/api/review",
                &other,
                json!({ "card_id": card_id, "grade": 2 }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Card not found");

        let theirs = json_body(send(&app, get_request("/api/review", &other)).await).await;
        assert_eq!(theirs, json!([]));
        let mine = json_body(send(&app, get_request("/api/review", &owner)).await).await;
        assert_eq!(mine.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn deck_and_card_crud() {
        let app = app();
        let cookie = register(&app, "learner@example.com").await;
        let other = register(&app, "other@example.com").await;

        let response = send(
            &app,
            json_request(Method::POST, "/api/decks", &cookie, json!({ "title": "   " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let deck_id = create_deck(&app, &cookie, "French").await;
        let card_id = create_card(&app, &cookie, deck_id, "chat").await;

        let response = send(
            &app,
            json_request(
                Method::POST,
                "/api/cards",
                &other,
                json!({ "deck_id": deck_id, "front": "x", "back": "y" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            json_request(
                Method::PATCH,
                &format!("/api/cards/{}", card_id),
                &cookie,
                json!({ "back": "cat", "hint": "animal" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let card = json_body(response).await;
        assert_eq!(card["back"], "cat");
        assert_eq!(card["hint"], "animal");

        let response = send(
            &app,
            json_request(
                Method::PATCH,
                &format!("/api/decks/{}", deck_id),
                &cookie,
                json!({ "description": "Basics" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "French");

        let deck = json_body(send(&app, get_request(&format!("/api/decks/{}", deck_id), &cookie)).await).await;
        assert_eq!(deck["card_count"], 1);
        assert_eq!(deck["description"], "Basics");

        let listed = json_body(send(&app, get_request("/api/decks", &cookie)).await).await;
        assert_eq!(listed[0]["card_count"], 1);

        let foreign = send(&app, get_request(&format!("/api/decks/{}", deck_id), &other)).await;
        assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/decks/{}", deck_id))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, delete).await.status(), StatusCode::OK);

        let gone = send(&app, get_request(&format!("/api/cards/{}", card_id), &cookie)).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }
}
