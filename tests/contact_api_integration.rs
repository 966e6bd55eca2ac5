//! Integration tests for the contact REST API.
//!
//! Each test spins up an Axum server on a random port and exercises the
//! real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use uuid::Uuid;

use contact_store::contacts::{Contact, NewContact};
use contact_store::error::DatabaseError;
use contact_store::server;
use contact_store::store::{ContactStore, LibSqlBackend};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Store that behaves as if the database connection had dropped.
struct DisconnectedStore;

const DRIVER_MESSAGE: &str = "hrana: stream closed by peer";

#[async_trait]
impl ContactStore for DisconnectedStore {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
    async fn insert_contact(&self, _: &NewContact) -> Result<Contact, DatabaseError> {
        Err(DatabaseError::Query(DRIVER_MESSAGE.into()))
    }
    async fn list_contacts(&self) -> Result<Vec<Contact>, DatabaseError> {
        Err(DatabaseError::Query(DRIVER_MESSAGE.into()))
    }
    async fn update_contact(
        &self,
        _: Uuid,
        _: &NewContact,
    ) -> Result<Option<Contact>, DatabaseError> {
        Err(DatabaseError::Query(DRIVER_MESSAGE.into()))
    }
    async fn delete_contact(&self, _: Uuid) -> Result<Option<Contact>, DatabaseError> {
        Err(DatabaseError::Query(DRIVER_MESSAGE.into()))
    }
}

/// Start a server over `store` on a random port, return its base URL.
async fn start_server_with(store: Arc<dyn ContactStore>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        server::serve(listener, server::app(store), std::future::pending())
            .await
            .unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

async fn start_server() -> String {
    start_server_with(Arc::new(LibSqlBackend::new_memory().await.unwrap())).await
}

fn ana() -> Value {
    json!({"name": "Ana", "email": "ana@x.com", "message": "hi"})
}

// ── Scenario ─────────────────────────────────────────────────────────

#[tokio::test]
async fn full_contact_lifecycle() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        // Create
        let resp = client
            .post(format!("{base}/send/mail"))
            .json(&ana())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Message sent successfully!");
        let id = body["createdContact"]["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        // List
        let resp = client.get(format!("{base}/contacts")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list: Value = resp.json().await.unwrap();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], id);
        assert_eq!(list[0]["name"], "Ana");
        assert_eq!(list[0]["email"], "ana@x.com");
        assert_eq!(list[0]["message"], "hi");

        // Update
        let resp = client
            .put(format!("{base}/update/contact/{id}"))
            .json(&json!({"name": "Ana2", "email": "ana@x.com", "message": "hi"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Contact updated successfully!");
        assert_eq!(body["updatedContact"]["id"], id);
        assert_eq!(body["updatedContact"]["name"], "Ana2");

        // Delete
        let resp = client
            .delete(format!("{base}/delete/contact/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Contact deleted successfully!");
        assert_eq!(body["deletedContact"]["name"], "Ana2");

        // Delete again
        let resp = client
            .delete(format!("{base}/delete/contact/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Contact not found");

        let list: Value = client
            .get(format!("{base}/contacts"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(list.as_array().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

// ── Validation ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_without_each_field_returns_400() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        for field in ["name", "email", "message"] {
            let mut body = ana();
            body.as_object_mut().unwrap().remove(field);

            let resp = client
                .post(format!("{base}/send/mail"))
                .json(&body)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "missing {field}");
            let json: Value = resp.json().await.unwrap();
            assert_eq!(json["message"], "Error sending message");
            assert!(json["error"].as_str().unwrap().contains(field));
        }

        let list: Value = client
            .get(format!("{base}/contacts"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(list.as_array().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn create_without_json_content_type_returns_400() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let resp = reqwest::Client::new()
            .post(format!("{base}/send/mail"))
            .body("name=Ana&email=ana@x.com&message=hi")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    })
    .await
    .expect("test timed out");
}

// ── Not found ────────────────────────────────────────────────────────

#[tokio::test]
async fn update_unknown_id_returns_404_and_leaves_collection() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        client
            .post(format!("{base}/send/mail"))
            .json(&ana())
            .send()
            .await
            .unwrap();

        let resp = client
            .put(format!("{base}/update/contact/{}", Uuid::new_v4()))
            .json(&json!({"name": "Bo", "email": "bo@y.org", "message": "yo"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let list: Value = client
            .get(format!("{base}/contacts"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "Ana");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn delete_unknown_id_returns_404() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let resp = reqwest::Client::new()
            .delete(format!("{base}/delete/contact/{}", Uuid::new_v4()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    })
    .await
    .expect("test timed out");
}

// ── Storage failures ─────────────────────────────────────────────────

#[tokio::test]
async fn storage_failure_returns_500_without_driver_detail() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server_with(Arc::new(DisconnectedStore)).await;
        let client = reqwest::Client::new();
        let id = Uuid::new_v4();

        let responses = [
            client.get(format!("{base}/contacts")).send().await.unwrap(),
            client
                .put(format!("{base}/update/contact/{id}"))
                .json(&ana())
                .send()
                .await
                .unwrap(),
            client
                .delete(format!("{base}/delete/contact/{id}"))
                .send()
                .await
                .unwrap(),
            client
                .post(format!("{base}/send/mail"))
                .json(&ana())
                .send()
                .await
                .unwrap(),
        ];

        for resp in responses {
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let text = resp.text().await.unwrap();
            assert!(!text.contains(DRIVER_MESSAGE), "leaked: {text}");
            let json: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(json["error"], "Storage unavailable");
        }
    })
    .await
    .expect("test timed out");
}

// ── Plumbing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn cors_allows_any_origin() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let resp = reqwest::Client::new()
            .get(format!("{base}/contacts"))
            .header("Origin", "https://portfolio.example")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn server_stops_on_shutdown_signal() {
    timeout(TEST_TIMEOUT, async {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let store: Arc<dyn ContactStore> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server::serve(listener, server::app(store), async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    })
    .await
    .expect("test timed out");
}
