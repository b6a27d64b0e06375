use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use http::header;
use http::HeaderValue;
use http::Method;
use http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_profile::get_profile;
use super::handlers::health::health_check;
use super::handlers::health::root;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::sign_up::sign_up;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::ports::AuthServicePort;

const REQUEST_ID_HEADER: &str = "x-request-id";
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(1000);

/// Context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub started_at: Instant,
}

pub fn create_router(auth_service: Arc<dyn AuthServicePort>, allowed_origins: &[String]) -> Router {
    let state = AppState {
        auth_service,
        started_at: Instant::now(),
    };

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/auth/signup", post(sign_up))
        .route("/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/auth/profile", get(get_profile))
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                let status = response.status();
                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );

                if latency > SLOW_REQUEST_THRESHOLD {
                    tracing::warn!(
                        event = "performance",
                        latency_ms = latency.as_millis(),
                        threshold_ms = SLOW_REQUEST_THRESHOLD.as_millis(),
                        "Slow request"
                    );
                }

                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    tracing::warn!(
                        event = "security",
                        status = status.as_u16(),
                        "Access denied"
                    );
                }
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer(allowed_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// CORS for the browser client: listed origins only, credentials allowed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::service::AuthService;
    use crate::outbound::repositories::InMemoryUserRepository;
    use crate::outbound::tokens::JwtTokenSigner;

    const ORIGIN: &str = "http://localhost:5173";

    fn app() -> Router {
        let service = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(JwtTokenSigner::new(b"router-test-secret-at-least-32-bytes!", 24)),
        )
        .with_password_hasher(auth::PasswordHasher::with_params(1024, 1, 1).unwrap());

        create_router(Arc::new(service), &[ORIGIN.to_string()])
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].is_number());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        for (method, uri) in [("GET", "/auth/profile"), ("POST", "/auth/logout")] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), 401, "{} {}", method, uri);
            let body = json_body(response).await;
            assert_eq!(body["statusCode"], 401);
            assert_eq!(body["message"], "Login first to access this endpoint.");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Bad Request");
    }

    #[tokio::test]
    async fn test_responses_carry_generated_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("x-request-id header")
            .to_str()
            .unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/auth/profile")
                    .header(REQUEST_ID_HEADER, "client-supplied-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "client-supplied-id"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/auth/login")
                    .header(header::ORIGIN, ORIGIN)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            ORIGIN
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }
}
