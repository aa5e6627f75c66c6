//! `QuizServer` builder, router, and serve loop.
//!
//! Ties the layers together: HTTP (axum + tower-http) → handlers →
//! `RoomRegistry`.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use quizroom_room::{RoomLimits, RoomRegistry};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{HttpSettings, ServerConfig};
use crate::handler::{self, AppState};
use crate::QuizroomError;

/// Builds the full `/api` router around a registry.
///
/// Exposed so tests (and embedders) can drive the service without
/// binding a socket.
pub fn build_router(registry: Arc<RoomRegistry>, settings: &HttpSettings) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/api/health", get(handler::health))
        .route("/api/stats", get(handler::stats))
        .route("/api/rooms", post(handler::create_room))
        .route(
            "/api/rooms/{code}",
            get(handler::get_room).delete(handler::delete_room),
        )
        .route("/api/rooms/{code}/join", post(handler::join_room))
        .route("/api/rooms/{code}/leave", post(handler::leave_room))
        .route("/api/rooms/{code}/participants", get(handler::participants))
        .route("/api/rooms/{code}/start", post(handler::start_game))
        .route("/api/rooms/{code}/finish", post(handler::finish_game))
        .route(
            "/api/rooms/{code}/questions",
            get(handler::list_questions).post(handler::create_question),
        )
        .route(
            "/api/rooms/{code}/questions/current",
            get(handler::current_question).delete(handler::clear_current_question),
        )
        .route(
            "/api/rooms/{code}/questions/current/wrong",
            post(handler::mark_wrong),
        )
        .route(
            "/api/rooms/{code}/questions/next",
            post(handler::next_question),
        )
        .route(
            "/api/rooms/{code}/questions/{id}",
            delete(handler::delete_question),
        )
        .route(
            "/api/rooms/{code}/questions/{id}/select",
            post(handler::select_question),
        )
        .route(
            "/api/rooms/{code}/questions/{id}/reveal",
            post(handler::reveal_question),
        )
        .route("/api/rooms/{code}/answers", post(handler::submit_answer))
        .route(
            "/api/rooms/{code}/scores",
            get(handler::scores).post(handler::award_points),
        )
        .route(
            "/api/rooms/{code}/scores/{player}",
            get(handler::player_score),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            settings.request_timeout,
        ))
        .layer(middleware::map_response(envelope_layer_errors))
        .with_state(state)
}

/// Body-limit and timeout layers answer with bare bodies; give them the
/// same envelope handlers produce.
async fn envelope_layer_errors(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => QuizroomError::PayloadTooLarge.into_response(),
        StatusCode::REQUEST_TIMEOUT => QuizroomError::Timeout.into_response(),
        _ => response,
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    QuizroomError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Builder for configuring and starting a Quizroom server.
///
/// # Example
///
/// ```rust,ignore
/// let server = QuizServer::builder()
///     .bind("0.0.0.0:8080")
///     .limits(RoomLimits::default())
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct QuizServerBuilder {
    bind_addr: String,
    limits: RoomLimits,
    http: HttpSettings,
}

impl QuizServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            limits: RoomLimits::default(),
            http: HttpSettings::default(),
        }
    }

    /// Takes bind address and HTTP limits from parsed configuration.
    pub fn config(self, config: &ServerConfig) -> Self {
        self.bind(&config.bind_addr()).http(config.http_settings())
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room validation limits.
    pub fn limits(mut self, limits: RoomLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn http(mut self, settings: HttpSettings) -> Self {
        self.http = settings;
        self
    }

    /// Binds the listener and assembles the router.
    pub async fn build(self) -> Result<QuizServer, QuizroomError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        let registry = Arc::new(RoomRegistry::with_limits(self.limits));
        let router = build_router(Arc::clone(&registry), &self.http);
        Ok(QuizServer {
            listener,
            router,
            registry,
        })
    }
}

impl Default for QuizServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Quizroom server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct QuizServer {
    listener: TcpListener,
    router: Router,
    registry: Arc<RoomRegistry>,
}

impl QuizServer {
    /// Creates a new builder.
    pub fn builder() -> QuizServerBuilder {
        QuizServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The registry behind this server.
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Serves requests until Ctrl-C.
    pub async fn run(self) -> Result<(), QuizroomError> {
        let addr = self.listener.local_addr()?;
        tracing::info!(%addr, "quizroom server listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(rooms = self.registry.room_count(), "server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
