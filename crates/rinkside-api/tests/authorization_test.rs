//! Role gating across the player, invoice and user routes

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use rinkside_api::{error::ApiError, ApiServer, ApiServerConfig};
use rinkside_auth::{hash_password, Role, SigningKey, TokenIssuer};
use rinkside_db::entities::{prelude::User as UserEntity, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str = "authorization-test-secret";

struct TestApp {
    app: Router,
    db: DatabaseConnection,
    issuer: TokenIssuer,
}

impl TestApp {
    async fn new() -> Self {
        let db = rinkside_db::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        rinkside_db::migrate(&db)
            .await
            .expect("Failed to run migrations");

        let signing_key = SigningKey::new(TEST_SECRET).unwrap();
        let issuer = TokenIssuer::new(&signing_key);
        let config = ApiServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            enable_cors: false,
            signing_key,
            allow_signup: false,
        };
        let app = ApiServer::new(config, db.clone()).build_router();

        Self { app, db, issuer }
    }

    /// Insert an account directly and return a session token for it
    async fn account(&self, email: &str, role: Role) -> (Uuid, String) {
        let now = Utc::now();
        let id = Uuid::new_v4();
        user::ActiveModel {
            id: Set(id),
            name: Set(format!("{} user", role)),
            email: Set(email.to_string()),
            password_hash: Set(hash_password("password123").unwrap()),
            role: Set(role.into()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .unwrap();

        let token = self.issuer.issue(&id.to_string()).unwrap().token;
        (id, token)
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
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

    async fn user_count(&self) -> u64 {
        UserEntity::find().count(&self.db).await.unwrap()
    }
}

fn player_body(name: &str) -> Value {
    json!({
        "name": name,
        "position": "Centre",
        "team": "Oilers",
        "date_of_birth": "1997-01-13",
        "height": 185.0,
        "weight": 88.0,
        "nationality": "Canada",
        "stats": { "goals": 52, "assists": 101 },
        "contract_start": "2024-07-01",
        "contract_end": "2032-06-30",
        "contract_value": 14000000.0
    })
}

#[tokio::test]
async fn test_assistant_cannot_create_user() {
    let t = TestApp::new().await;
    let (_, token) = t.account("assistant@example.com", Role::Assistant).await;
    let before = t.user_count().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({
                "name": "Sneaky",
                "email": "sneaky@example.com",
                "password": "password123",
                "role": "ADMIN"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(body["error"].as_str().unwrap().contains("Insufficient permissions"));
    assert_eq!(t.user_count().await, before);
}

#[tokio::test]
async fn test_admin_manages_users() {
    let t = TestApp::new().await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;

    let (status, created) = t
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "name": "New Agent",
                "email": "New.Agent@Example.com",
                "password": "password123",
                "role": "AGENT"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "new.agent@example.com");
    assert_eq!(created["role"], "AGENT");
    assert!(created.get("password_hash").is_none());

    let (status, list) = t.send(Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);

    let id = created["id"].as_str().unwrap();
    let (status, updated) = t
        .send(
            Method::PUT,
            &format!("/api/users/{}", id),
            Some(&admin),
            Some(json!({
                "name": "Promoted Agent",
                "email": "new.agent@example.com",
                "role": "ADMIN"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "ADMIN");

    let (status, _) = t
        .send(Method::DELETE, &format!("/api/users/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t
        .send(Method::DELETE, &format!("/api/users/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let t = TestApp::new().await;
    let (admin_id, admin) = t.account("admin@example.com", Role::Admin).await;

    let (status, _) = t
        .send(
            Method::DELETE,
            &format!("/api/users/{}", admin_id),
            Some(&admin),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.user_count().await, 1);
}

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let t = TestApp::new().await;
    let (admin_id, admin) = t.account("admin@example.com", Role::Admin).await;

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/users/{}", admin_id),
            Some(&admin),
            Some(json!({
                "name": "Admin",
                "email": "admin@example.com",
                "role": "AGENT"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    // Still an admin
    let (status, _) = t.send(Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    // Renaming yourself while keeping the role is fine
    let (status, updated) = t
        .send(
            Method::PUT,
            &format!("/api/users/{}", admin_id),
            Some(&admin),
            Some(json!({
                "name": "Head Admin",
                "email": "admin@example.com",
                "role": "ADMIN"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Head Admin");
}

#[tokio::test]
async fn test_duplicate_email_insert_maps_to_bad_request() {
    let t = TestApp::new().await;
    t.account("racer@example.com", Role::Agent).await;

    // Simulates the losing side of two concurrent signups: the pre-check
    // passed, the unique index catches the insert
    let now = Utc::now();
    let err = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Racer".to_string()),
        email: Set("racer@example.com".to_string()),
        password_hash: Set(hash_password("password123").unwrap()),
        role: Set(Role::Agent.into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&t.db)
    .await
    .unwrap_err();

    let api_error = ApiError::from(err);
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(api_error.to_string(), "Email already in use");
}

#[tokio::test]
async fn test_user_email_must_be_unique() {
    let t = TestApp::new().await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "name": "Copy",
                "email": "ADMIN@example.com",
                "password": "password123",
                "role": "ASSISTANT"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already in use");
}

#[tokio::test]
async fn test_agent_can_write_players_but_not_delete() {
    let t = TestApp::new().await;
    let (_, agent) = t.account("agent@example.com", Role::Agent).await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;

    let (status, player) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&agent),
            Some(player_body("Connor McDavid")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(player["stats"]["goals"], 52);

    let uri = format!("/api/players/{}", player["id"].as_str().unwrap());

    let mut replacement = player_body("Connor McDavid");
    replacement["team"] = json!("Canada");
    let (status, updated) = t
        .send(Method::PUT, &uri, Some(&agent), Some(replacement))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["team"], "Canada");

    let (status, _) = t.send(Method::DELETE, &uri, Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t.send(Method::GET, &uri, Some(&agent), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assistant_is_read_only() {
    let t = TestApp::new().await;
    let (_, agent) = t.account("agent@example.com", Role::Agent).await;
    let (_, assistant) = t.account("assistant@example.com", Role::Assistant).await;

    let (_, player) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&agent),
            Some(player_body("Leon Draisaitl")),
        )
        .await;
    let uri = format!("/api/players/{}", player["id"].as_str().unwrap());

    let (status, list) = t.send(Method::GET, "/api/players", Some(&assistant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);

    let (status, _) = t.send(Method::GET, &uri, Some(&assistant), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&assistant),
            Some(player_body("Nope")),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .send(Method::PUT, &uri, Some(&assistant), Some(player_body("Nope")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.send(Method::GET, "/api/users", Some(&assistant), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let t = TestApp::new().await;

    for (method, uri) in [
        (Method::GET, "/api/players"),
        (Method::POST, "/api/players"),
        (Method::GET, "/api/invoices"),
        (Method::GET, "/api/users"),
    ] {
        let (status, body) = t.send(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_role_change_applies_to_existing_token() {
    let t = TestApp::new().await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;
    let (agent_id, agent) = t.account("agent@example.com", Role::Agent).await;

    let (status, _) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&agent),
            Some(player_body("First")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = t
        .send(
            Method::PUT,
            &format!("/api/users/{}", agent_id),
            Some(&admin),
            Some(json!({
                "name": "Demoted",
                "email": "agent@example.com",
                "role": "ASSISTANT"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Same token, new role
    let (status, _) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&agent),
            Some(player_body("Second")),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_account_token_rejected() {
    let t = TestApp::new().await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;
    let (agent_id, agent) = t.account("agent@example.com", Role::Agent).await;

    let (status, _) = t
        .send(
            Method::DELETE,
            &format!("/api/users/{}", agent_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t.send(Method::GET, "/api/players", Some(&agent), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invoice_lifecycle() {
    let t = TestApp::new().await;
    let (_, agent) = t.account("agent@example.com", Role::Agent).await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;

    let (_, player) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&agent),
            Some(player_body("Zach Hyman")),
        )
        .await;
    let player_id = player["id"].as_str().unwrap().to_string();

    let (status, invoice) = t
        .send(
            Method::POST,
            "/api/invoices",
            Some(&agent),
            Some(json!({
                "player_id": player_id,
                "amount": 2500.0,
                "description": "Representation fee",
                "due_date": "2026-12-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invoice["player_name"], "Zach Hyman");
    assert_eq!(invoice["is_paid"], false);

    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());
    let (status, updated) = t
        .send(
            Method::PUT,
            &uri,
            Some(&agent),
            Some(json!({
                "player_id": player_id,
                "amount": 2500.0,
                "description": "Representation fee",
                "due_date": "2026-12-01",
                "is_paid": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_paid"], true);

    let (status, list) = t.send(Method::GET, "/api/invoices", Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["invoices"][0]["player_name"], "Zach Hyman");

    let (status, _) = t.send(Method::DELETE, &uri, Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_invoice_for_unknown_player_rejected() {
    let t = TestApp::new().await;
    let (_, agent) = t.account("agent@example.com", Role::Agent).await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/invoices",
            Some(&agent),
            Some(json!({
                "player_id": Uuid::new_v4().to_string(),
                "amount": 100.0,
                "description": "Ghost",
                "due_date": "2026-12-01"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_deleting_player_removes_invoices() {
    let t = TestApp::new().await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;

    let (_, player) = t
        .send(
            Method::POST,
            "/api/players",
            Some(&admin),
            Some(player_body("Evan Bouchard")),
        )
        .await;
    let player_id = player["id"].as_str().unwrap().to_string();

    let (_, invoice) = t
        .send(
            Method::POST,
            "/api/invoices",
            Some(&admin),
            Some(json!({
                "player_id": player_id,
                "amount": 900.0,
                "description": "Travel",
                "due_date": "2026-11-15"
            })),
        )
        .await;

    let (status, _) = t
        .send(
            Method::DELETE,
            &format!("/api/players/{}", player_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t
        .send(
            Method::GET,
            &format!("/api/invoices/{}", invoice["id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_uuid_ids_are_not_found() {
    let t = TestApp::new().await;
    let (_, admin) = t.account("admin@example.com", Role::Admin).await;

    let (status, _) = t.send(Method::GET, "/api/players/42", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .send(Method::DELETE, "/api/invoices/not-a-uuid", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
