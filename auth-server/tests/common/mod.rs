use std::sync::Arc;

use auth_server::account::policy::AccountPolicy;
use auth_server::account::service::AccountService;
use auth_server::config::DEFAULT_CREDENTIAL_PATTERN;
use auth_server::inbound::http::router::create_router;
use auth_server::repositories::InMemoryUserStore;
use credentials::Authenticator;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application with tokens that never expire
    pub async fn spawn() -> Self {
        Self::spawn_with_ttl(chrono::Duration::zero()).await
    }

    /// Spawn the application in a background task with the given token ttl
    pub async fn spawn_with_ttl(ttl: chrono::Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET, ttl));
        let policy =
            AccountPolicy::new(DEFAULT_CREDENTIAL_PATTERN, DEFAULT_CREDENTIAL_PATTERN, true)
                .expect("Failed to compile account policy");

        let account_service = Arc::new(AccountService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::clone(&authenticator),
            policy,
        ));

        let router = create_router(account_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Create an account and assert it was accepted
    pub async fn create_account(&self, user: &str, pass: &str, name: &str) {
        let response = self
            .post("/users")
            .json(&json!({ "user": user, "pass": pass, "name": name }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Log in and return the issued token
    pub async fn login(&self, user: &str, pass: &str) -> String {
        let response = self
            .post("/login")
            .json(&json!({ "user": user, "pass": pass }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}
