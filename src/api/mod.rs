//! Mock Credential API
//!
//! Stand-in for the account backend the dashboard and CLI log in against,
//! built with Axum.
//!
//! # Endpoints
//!
//! ## Users
//! - `POST /users` - Register an account
//! - `GET /users?email=&password=` - Find matching accounts
//! - `GET /users/:id` - Get an account
//! - `DELETE /users/:id` - Delete an account
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use bi_tool::api::{serve, AppState};
//! use bi_tool::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::from_config(config.clone()).await?;
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, UserDirectory};

use axum::{http::HeaderValue, routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user).delete(routes::users::delete_user),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/users", user_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Any origin unless `cors_origins` names specific ones
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on `config.addr()` and run until Ctrl+C or SIGTERM
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    serve_on(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), ApiError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);
    let addr = listener.local_addr()?;

    tracing::info!("Mock credential API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Mock credential API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{
        CredentialError, CredentialService, HttpCredentialConfig, HttpCredentialService, NewUser,
    };
    use crate::session::{
        Destination, ManualScheduler, MemoryStore, SessionConfig, SessionManager,
    };
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use std::cell::RefCell;
    use std::rc::Rc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        build_router(AppState::new(UserDirectory::in_memory(), ApiConfig::default()))
    }

    fn post_user(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn jane() -> serde_json::Value {
        serde_json::json!({
            "email": "jane@example.com",
            "password": "secret2",
            "fullName": "Jane Smith"
        })
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app().oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let response = create_test_app().oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["ready"], true);
    }

    #[tokio::test]
    async fn test_full_health() {
        let app = create_test_app();
        app.clone().oneshot(post_user(jane())).await.unwrap();

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["users"], 1);
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_create_user() {
        let response = create_test_app().oneshot(post_user(jane())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["id"], "1");
        assert_eq!(body["fullName"], "Jane Smith");
        assert_eq!(body["password"], "secret2");
        assert!(body["createdAt"].is_string());
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let response = create_test_app()
            .oneshot(post_user(serde_json::json!({ "email": "jane@example.com" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("password, fullName"));
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let app = create_test_app();
        app.clone().oneshot(post_user(jane())).await.unwrap();

        let mut again = jane();
        again["email"] = "JANE@example.com".into();
        let response = app.oneshot(post_user(again)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_list_users_by_credentials() {
        let app = create_test_app();
        app.clone().oneshot(post_user(jane())).await.unwrap();

        let response = app
            .clone()
            .oneshot(get("/users?email=Jane%40example.com&password=secret2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["email"], "jane@example.com");

        let response = app
            .oneshot(get("/users?email=jane%40example.com&password=wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_get_and_delete_user() {
        let app = create_test_app();
        app.clone().oneshot(post_user(jane())).await.unwrap();

        let response = app.clone().oneshot(get("/users/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri("/users/1")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["email"], "jane@example.com");

        let response = app.oneshot(get("/users/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let request = Request::builder()
            .uri("/health/live")
            .header(header::ORIGIN, "http://localhost:8084")
            .body(Body::empty())
            .unwrap();
        let response = create_test_app().oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    async fn spawn_server() -> (String, tokio::sync::oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(UserDirectory::in_memory(), ApiConfig::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(serve_on(listener, state, async {
            let _ = rx.await;
        }));
        (format!("http://{}", addr), tx)
    }

    fn http_client(base_url: String) -> HttpCredentialService {
        HttpCredentialService::new(HttpCredentialConfig {
            base_url,
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_http_client_against_server() {
        let (base_url, _shutdown) = spawn_server().await;
        let client = http_client(base_url);

        let created = client
            .create_user(&NewUser::new("jane@example.com", "secret2", "Jane Smith"))
            .await
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("1"));

        let dup = client
            .create_user(&NewUser::new("jane@example.com", "other1", "Jane Again"))
            .await;
        assert_eq!(dup, Err(CredentialError::Conflict));

        assert_eq!(
            client.authenticate("nobody@example.com", "secret2").await,
            Ok(None)
        );
        let user = client
            .authenticate("jane@example.com", "secret2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.full_name, "Jane Smith");
        assert_eq!(user.token, crate::credentials::PLACEHOLDER_TOKEN);
    }

    #[tokio::test]
    async fn test_session_end_to_end() {
        let (base_url, _shutdown) = spawn_server().await;
        let store = MemoryStore::new();
        let scheduler = ManualScheduler::new();
        let visits: Rc<RefCell<Vec<Destination>>> = Rc::default();
        let log = visits.clone();

        let manager = SessionManager::new(
            store.clone(),
            http_client(base_url.clone()),
            scheduler.clone(),
            move |d: Destination| log.borrow_mut().push(d),
            SessionConfig::default(),
        );
        manager.initialize();

        assert!(manager.register("jane@example.com", "secret2", "Jane Smith").await);
        assert!(manager.is_authenticated());
        assert!(manager.timer_armed());
        manager.logout();

        assert!(!manager.register("jane@example.com", "secret2", "Jane Smith").await);
        assert!(!manager.is_authenticated());

        assert!(!manager.login("jane@example.com", "wrong1", false).await);
        assert!(manager.user().is_none());

        assert!(manager.login("jane@example.com", "secret2", true).await);
        assert!(!manager.timer_armed());
        manager.teardown();

        // Simulated reload over the same storage
        let reloaded = SessionManager::new(
            store,
            http_client(base_url),
            scheduler,
            |_: Destination| {},
            SessionConfig::default(),
        );
        reloaded.initialize();
        assert_eq!(
            reloaded.user().map(|u| u.email),
            Some("jane@example.com".to_string())
        );
        assert!(reloaded.keep_logged_in());
        assert!(!reloaded.timer_armed());

        assert_eq!(
            visits.borrow().as_slice(),
            &[
                Destination::Protected,
                Destination::Public,
                Destination::Protected
            ]
        );
    }
}
