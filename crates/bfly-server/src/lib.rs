//! HTTP server for the butterfly API.
//!
//! Serves butterflies, users, and ratings as JSON over HTTP. Writes are
//! validated strictly before they reach the store; clients only ever see
//! the fixed `Not found` and `Invalid request body` error messages.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::ButterflyServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use bfly_store::{InMemoryStore, JsonFileStore, RecordStore, StoreDocument};
    use bfly_types::{Butterfly, Collection, Rating, RecordId, SequentialIdGenerator, User};
    use serde_json::{json, Number, Value};
    use tower::util::ServiceExt;

    fn fixture() -> StoreDocument {
        StoreDocument {
            butterflies: vec![Butterfly {
                id: RecordId::new("wxyz9876"),
                common_name: "test-butterfly".into(),
                species: "Testium butterflius".into(),
                article: "https://example.com/testium_butterflius".into(),
                extra: Default::default(),
            }],
            users: vec![User {
                id: RecordId::new("abcd1234"),
                username: "test-user".into(),
                extra: Default::default(),
            }],
            ratings: vec![Rating {
                id: RecordId::new("abcd0987"),
                butterfly_id: "monarch".into(),
                user_id: "test-user-id".into(),
                rating: Number::from(5),
                extra: Default::default(),
            }],
        }
    }

    fn test_state(doc: StoreDocument) -> AppState {
        AppState::new(
            Arc::new(InMemoryStore::with_document(doc)),
            Arc::new(SequentialIdGenerator::new("new")),
        )
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let content_type = body.map(|_| "application/json");
        send_as(app, method, uri, content_type, body).await
    }

    async fn send_as(
        app: &Router,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            req = req.header("content-type", content_type);
        }
        let req = req
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri, None).await
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, "POST", uri, Some(&body.to_string())).await
    }

    fn not_found() -> Value {
        json!({ "error": "Not found" })
    }

    fn invalid_body() -> Value {
        json!({ "error": "Invalid request body" })
    }

    #[tokio::test]
    async fn root_reports_running() {
        let app = build_router(test_state(fixture()));
        let (status, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Server is running!" }));
    }

    #[tokio::test]
    async fn get_butterfly() {
        let app = build_router(test_state(fixture()));
        let (status, body) = get(&app, "/butterflies/wxyz9876").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": "wxyz9876",
                "commonName": "test-butterfly",
                "species": "Testium butterflius",
                "article": "https://example.com/testium_butterflius"
            })
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found_everywhere() {
        let app = build_router(test_state(fixture()));
        for uri in ["/butterflies/bad-id", "/users/bad-id", "/ratings/users/bad-id"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, not_found(), "{uri}");
        }
    }

    #[tokio::test]
    async fn ids_do_not_cross_collections() {
        let app = build_router(test_state(fixture()));
        let (status, _) = get(&app, "/butterflies/abcd1234").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_butterfly_then_get() {
        let app = build_router(test_state(fixture()));
        let submitted = json!({
            "commonName": "Boop",
            "species": "Boopi beepi",
            "article": "https://example.com/boopi_beepi"
        });
        let (status, created) = post(&app, "/butterflies", submitted).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            created,
            json!({
                "id": "new-1",
                "commonName": "Boop",
                "species": "Boopi beepi",
                "article": "https://example.com/boopi_beepi"
            })
        );

        let (status, fetched) = get(&app, "/butterflies/new-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn bad_butterfly_bodies_rejected_without_writing() {
        let state = test_state(fixture());
        let app = build_router(state.clone());

        let (status, body) = send(&app, "POST", "/butterflies", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, invalid_body());

        let bodies = [
            json!({}),
            json!({ "commonName": "boop" }),
            json!({ "commonName": 1, "species": "s", "article": "a" }),
            json!({ "commonName": "c", "species": "s", "article": "a", "extra": "field" }),
            json!([]),
        ];
        for b in bodies {
            let (status, body) = post(&app, "/butterflies", b.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{b}");
            assert_eq!(body, invalid_body(), "{b}");
        }

        let (status, body) = send(&app, "POST", "/butterflies", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, invalid_body());

        assert_eq!(state.store.count(Collection::Butterflies).unwrap(), 1);
    }

    #[tokio::test]
    async fn get_user() {
        let app = build_router(test_state(fixture()));
        let (status, body) = get(&app, "/users/abcd1234").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "abcd1234", "username": "test-user" }));
    }

    #[tokio::test]
    async fn post_user_then_get() {
        let app = build_router(test_state(fixture()));
        let (status, created) = post(&app, "/users", json!({ "username": "Buster" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created, json!({ "id": "new-1", "username": "Buster" }));

        let (status, fetched) = get(&app, "/users/new-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn bad_user_bodies_rejected() {
        let state = test_state(fixture());
        let app = build_router(state.clone());
        let (status, _) = send(&app, "POST", "/users", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        for b in [json!({}), json!({ "username": [555] }), json!({ "username": "a", "x": 1 })] {
            let (status, body) = post(&app, "/users", b).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, invalid_body());
        }
        assert_eq!(state.store.count(Collection::Users).unwrap(), 1);
    }

    #[tokio::test]
    async fn get_ratings_for_user() {
        let app = build_router(test_state(fixture()));
        let (status, body) = get(&app, "/ratings/users/test-user-id").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "id": "abcd0987",
                "butterflyId": "monarch",
                "userId": "test-user-id",
                "rating": 5
            }])
        );
    }

    #[tokio::test]
    async fn ratings_sorted_ascending() {
        let doc = StoreDocument {
            ratings: vec![
                Rating {
                    id: RecordId::new("a"),
                    butterfly_id: "x".into(),
                    user_id: "u".into(),
                    rating: Number::from(5),
                    extra: Default::default(),
                },
                Rating {
                    id: RecordId::new("b"),
                    butterfly_id: "y".into(),
                    user_id: "u".into(),
                    rating: Number::from(1),
                    extra: Default::default(),
                },
            ],
            ..StoreDocument::default()
        };
        let app = build_router(test_state(doc));
        let (status, body) = get(&app, "/ratings/users/u").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "id": "b", "butterflyId": "y", "userId": "u", "rating": 1 },
                { "id": "a", "butterflyId": "x", "userId": "u", "rating": 5 }
            ])
        );
    }

    #[tokio::test]
    async fn equal_ratings_keep_store_order() {
        let app = build_router(test_state(StoreDocument::default()));
        for (butterfly, score) in [("first", 3), ("low", 1), ("second", 3), ("third", 3)] {
            let (status, _) = post(
                &app,
                "/ratings",
                json!({ "butterflyId": butterfly, "userId": "u", "rating": score }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, body) = get(&app, "/ratings/users/u").await;
        let order: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["butterflyId"].as_str().unwrap())
            .collect();
        assert_eq!(order, vec!["low", "first", "second", "third"]);
    }

    #[tokio::test]
    async fn post_rating() {
        let app = build_router(test_state(fixture()));
        let (status, created) = post(
            &app,
            "/ratings",
            json!({ "butterflyId": "butterfly-id", "userId": "user-id", "rating": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            created,
            json!({
                "id": "new-1",
                "butterflyId": "butterfly-id",
                "userId": "user-id",
                "rating": 3
            })
        );
        let (status, listed) = get(&app, "/ratings/users/user-id").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }

    #[tokio::test]
    async fn bad_rating_bodies_rejected() {
        let state = test_state(fixture());
        let app = build_router(state.clone());
        let (status, _) = send(&app, "POST", "/ratings", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        for b in [
            json!({}),
            json!({ "rating": 1 }),
            json!({ "butterflyId": "b", "userId": "u", "rating": 6 }),
            json!({ "butterflyId": "b", "userId": "u", "rating": "3" }),
            json!({ "butterflyId": "b", "userId": "u", "rating": 1, "extra": "x" }),
        ] {
            let (status, body) = post(&app, "/ratings", b).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, invalid_body());
        }
        assert_eq!(state.store.count(Collection::Ratings).unwrap(), 1);
    }

    #[tokio::test]
    async fn non_json_content_type_rejected() {
        let state = test_state(fixture());
        let app = build_router(state.clone());
        let cases = [
            ("/butterflies", r#"{"commonName":"c","species":"s","article":"a"}"#),
            ("/users", r#"{"username":"Buster"}"#),
            ("/ratings", r#"{"butterflyId":"b","userId":"u","rating":3}"#),
        ];
        for (uri, body) in cases {
            for content_type in [Some("text/plain"), None] {
                let (status, response) = send_as(&app, "POST", uri, content_type, Some(body)).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {content_type:?}");
                assert_eq!(response, invalid_body());
            }
        }
        assert_eq!(state.store.snapshot().unwrap(), fixture());

        let (status, _) = send_as(
            &app,
            "POST",
            "/users",
            Some("application/json; charset=utf-8"),
            Some(r#"{"username":"Buster"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn writes_reach_the_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let store = Arc::new(JsonFileStore::create(&path, fixture()).unwrap());
        let app = build_router(AppState::new(
            store,
            Arc::new(SequentialIdGenerator::new("disk")),
        ));

        let (status, _) = post(&app, "/users", json!({ "username": "Buster" })).await;
        assert_eq!(status, StatusCode::OK);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.user("disk-1").unwrap().unwrap().username, "Buster");
    }

    #[tokio::test]
    async fn concurrent_posts_all_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let state = AppState::new(
            Arc::new(JsonFileStore::open(&path).unwrap()),
            Arc::new(SequentialIdGenerator::new("c")),
        );
        let app = build_router(state.clone());

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    post(&app, "/users", json!({ "username": format!("user{i}") })).await
                })
            })
            .collect();
        for t in tasks {
            assert_eq!(t.await.unwrap().0, StatusCode::OK);
        }

        assert_eq!(state.store.count(Collection::Users).unwrap(), 20);
        assert_eq!(JsonFileStore::open(&path).unwrap().count(Collection::Users).unwrap(), 20);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reads_and_writes_interleave_on_one_worker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let state = AppState::new(
            Arc::new(JsonFileStore::create(&path, fixture()).unwrap()),
            Arc::new(SequentialIdGenerator::new("mix")),
        );
        let app = build_router(state.clone());

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        get(&app, "/users/abcd1234").await.0
                    } else {
                        post(&app, "/users", json!({ "username": format!("user{i}") })).await.0
                    }
                })
            })
            .collect();
        for t in tasks {
            assert_eq!(t.await.unwrap(), StatusCode::OK);
        }
        assert_eq!(state.store.count(Collection::Users).unwrap(), 6);
    }
}
