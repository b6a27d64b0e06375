use std::sync::Arc;

use auth::Claims;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use auth_service::outbound::tokens::JwtTokenSigner;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repo = Arc::new(InMemoryUserRepository::new());
        let token_signer = Arc::new(JwtTokenSigner::new(JWT_SECRET, 24));

        // Cheap Argon2 parameters keep the suite fast
        let password_hasher =
            PasswordHasher::with_params(1024, 1, 1).expect("Failed to build password hasher");

        let auth_service = Arc::new(
            AuthService::new(user_repo, token_signer).with_password_hasher(password_hasher),
        );

        let router = create_router(auth_service, &[ALLOWED_ORIGIN.to_string()]);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Sign up a user and return the session token
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/signup")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in signup response")
            .to_string()
    }

    /// Sign a token with the server secret but an arbitrary subject and expiry
    pub fn forge_token(&self, subject: &str, exp: i64) -> String {
        let claims = Claims::for_user(subject, "forged", "forged@example.com", 1)
            .expect("Failed to build claims")
            .with_expiration(exp);
        self.jwt_handler
            .encode(&claims)
            .expect("Failed to encode token")
    }
}
