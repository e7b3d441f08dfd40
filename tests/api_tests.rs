//! API integration tests
//!
//! Drive the full router in-process against a fresh in-memory store.
//! Run with: cargo test --test api_tests

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use notes_server::api::{create_router, NotesState, ServerState};
use notes_server::notes::{IdStrategy, InMemoryNoteStore, NoteIdGenerator, NoteStore};
use notes_server::render::Renderer;
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

/// Fresh state and router sharing it
fn test_app(strategy: IdStrategy) -> (NotesState, Router) {
    let state = Arc::new(ServerState::new(
        Arc::new(InMemoryNoteStore::new()),
        Renderer::embedded().unwrap(),
        NoteIdGenerator::new(strategy),
    ));
    (state.clone(), create_router(state))
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Create a note through the API and return the id it was stored under
async fn create(state: &NotesState, app: &Router, title: &str, content: &str) -> String {
    let before: HashSet<String> = state.store.list().await.into_iter().map(|n| n.id).collect();

    let resp = app
        .clone()
        .oneshot(form(
            "POST",
            "/notes",
            &format!("title={}&content={}", title, content),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");

    state
        .store
        .list()
        .await
        .into_iter()
        .map(|n| n.id)
        .find(|id| !before.contains(id))
        .expect("created note should be stored")
}

#[tokio::test]
async fn test_create_then_view_round_trip() {
    let (state, app) = test_app(IdStrategy::Timestamp);

    let id = create(&state, &app, "Hi", "World").await;

    let resp = app
        .oneshot(request("GET", &format!("/notes/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Hi"));
    assert!(body.contains("World"));
}

#[tokio::test]
async fn test_view_unknown_note_is_404() {
    let (_state, app) = test_app(IdStrategy::Timestamp);

    let resp = app
        .oneshot(request("GET", "/notes/doesnotexist"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_view_is_404() {
    let (state, app) = test_app(IdStrategy::Timestamp);
    let id = create(&state, &app, "Doomed", "soon").await;
    let path = format!("/notes/{}", id);

    let resp = app.clone().oneshot(request("DELETE", &path)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/notes");

    let resp = app.oneshot(request("GET", &path)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_is_404_every_time() {
    let (_state, app) = test_app(IdStrategy::Timestamp);

    for _ in 0..3 {
        let resp = app
            .clone()
            .oneshot(request("DELETE", "/notes/ghost"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_put_with_unsupported_body_on_missing_id_is_404() {
    let (state, app) = test_app(IdStrategy::Timestamp);
    let id = create(&state, &app, "Keep", "me").await;
    let mut before = state.store.list().await;
    before.sort_by(|a, b| a.id.cmp(&b.id));

    let req = Request::builder()
        .method("PUT")
        .uri("/notes/missing")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"x"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let mut after = state.store.list().await;
    after.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(after, before);
    assert_eq!(state.store.get(&id).await.unwrap().title, "Keep");
}

#[tokio::test]
async fn test_update_preserves_created() {
    let (state, app) = test_app(IdStrategy::Timestamp);
    let id = create(&state, &app, "Before", "old").await;
    let created = state.store.get(&id).await.unwrap().created;
    let path = format!("/notes/{}", id);

    let resp = app
        .clone()
        .oneshot(form("PUT", &path, "title=After&content=new"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], path.as_str());

    let note = state.store.get(&id).await.unwrap();
    assert_eq!(note.title, "After");
    assert_eq!(note.content, "new");
    assert_eq!(note.created, created);

    let body = body_string(app.oneshot(request("GET", &path)).await.unwrap()).await;
    assert!(body.contains("After"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_land_whole() {
    let (state, app) = test_app(IdStrategy::Timestamp);
    let id = create(&state, &app, "start", "start").await;
    let path = format!("/notes/{}", id);

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            let path = path.clone();
            tokio::spawn(async move {
                let resp = app
                    .oneshot(form(
                        "POST",
                        &path,
                        &format!("title=t{}&content=c{}", i, i),
                    ))
                    .await
                    .unwrap();
                assert_eq!(resp.status(), StatusCode::FOUND);
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let note = state.store.get(&id).await.unwrap();
    assert_eq!(
        note.title.trim_start_matches('t'),
        note.content.trim_start_matches('c')
    );
}

#[tokio::test]
async fn test_rapid_creates_get_unique_ids() {
    for strategy in [IdStrategy::Timestamp, IdStrategy::Uuid] {
        let (state, app) = test_app(strategy);

        for i in 0..50 {
            create(&state, &app, &format!("n{}", i), "x").await;
        }

        let ids: HashSet<String> = state.store.list().await.into_iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 50, "strategy {}", strategy);
    }
}

#[tokio::test]
async fn test_list_shows_created_notes() {
    let (state, app) = test_app(IdStrategy::Timestamp);
    create(&state, &app, "Alpha", "a").await;
    create(&state, &app, "Beta", "b").await;

    let resp = app.oneshot(request("GET", "/notes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    let alpha = body.find("Alpha").unwrap();
    let beta = body.find("Beta").unwrap();
    assert!(beta < alpha, "newest note should be listed first");
}
