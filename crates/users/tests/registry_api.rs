use std::sync::Arc;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use feed_users::store::InMemoryUserStore;

const JWT_SECRET: &str = "test-secret";
const ISSUER: &str = "http://keycloak.local/realms/feed";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let store = Arc::new(InMemoryUserStore::new());
        let verifier = Arc::new(feed_auth::Hs256Verifier::new(JWT_SECRET.as_bytes(), ISSUER));
        let app = feed_users::build_app(store, verifier);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(subject: &str, username: Option<&str>, roles: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    let mut claims = json!({
        "sub": subject,
        "iss": ISSUER,
        "exp": now + 600,
        "email": format!("{subject}@example.com"),
        "realm_access": { "roles": roles },
    });
    if let Some(username) = username {
        claims["preferred_username"] = json!(username);
    }

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn registry_endpoints_require_authentication() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/users/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/v1/users/signup", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let srv = TestServer::spawn().await;
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "sub-exp",
        "iss": ISSUER,
        "exp": now - 600,
        "realm_access": { "roles": ["feed_user"] },
    });
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let res = reqwest::Client::new()
        .get(format!("{}/api/v1/users/me", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_is_idempotent_and_me_resolves_the_same_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt("sub-42", Some("alice"), &["feed_user"]);

    // Not registered yet: me is a definite 404.
    let res = client
        .get(format!("{}/api/v1/users/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // First signup creates.
    let res = client
        .post(format!("{}/api/v1/users/signup", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let first: serde_json::Value = res.json().await.unwrap();
    assert_eq!(first["created"], json!(true));
    assert_eq!(first["username"], json!("alice"));
    let id = first["id"].as_i64().unwrap();

    // Second signup returns the existing record unchanged.
    let res = client
        .post(format!("{}/api/v1/users/signup", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let second: serde_json::Value = res.json().await.unwrap();
    assert_eq!(second["created"], json!(false));
    assert_eq!(second["id"].as_i64().unwrap(), id);

    // me resolves to the same internal id.
    let res = client
        .get(format!("{}/api/v1/users/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["id"].as_i64().unwrap(), id);
    assert_eq!(me["subject"], json!("sub-42"));
}

#[tokio::test]
async fn missing_username_defaults_to_subject() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("sub-noname", None, &["feed_user"]);

    let res = reqwest::Client::new()
        .post(format!("{}/api/v1/users/signup", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["username"], json!("sub-noname"));
}

#[tokio::test]
async fn lookup_by_internal_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt("sub-77", Some("carol"), &["feed_user"]);

    let res = client
        .post(format!("{}/api/v1/users/signup", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    let res = client
        .get(format!("{}/api/v1/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: serde_json::Value = res.json().await.unwrap();
    assert_eq!(found["username"], json!("carol"));

    let res = client
        .get(format!("{}/api/v1/users/999999", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_signups_agree_on_one_identity() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("sub-racy", Some("dave"), &["feed_user"]);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let url = format!("{}/api/v1/users/signup", srv.base_url);
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let res = reqwest::Client::new()
                .post(url)
                .bearer_auth(token)
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            res.json::<serde_json::Value>().await.unwrap()
        }));
    }

    let mut created_count = 0;
    let mut ids = Vec::new();
    for handle in handles {
        let body = handle.await.unwrap();
        if body["created"] == json!(true) {
            created_count += 1;
        }
        ids.push(body["id"].as_i64().unwrap());
    }

    assert_eq!(created_count, 1);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 1);
}
