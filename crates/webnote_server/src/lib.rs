//! HTTP server wiring for WebNote (router, handlers, and shared state).

/// `auth` cookie helpers.
pub mod cookie;
/// Error envelopes and fallback pages.
pub mod error;
/// HTTP handlers for note, directory, and share endpoints.
pub mod handlers;
/// Language negotiation and UI strings.
pub mod i18n;
/// HTML page templates.
pub mod render;

pub use webnote_core::{config, models, store, AppError, Config, NoteRepository, Stores, TokenService};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, StatusCode},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notes: NoteRepository,
    pub tokens: TokenService,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration (secret and salt are taken from it).
    /// - `stores`: Open `NOTES`/`SHARE` namespaces.
    ///
    /// # Returns
    /// A new [`AppState`].
    ///
    /// # Errors
    /// Returns an error if the signing key cannot be built.
    pub fn new(config: Config, stores: Stores) -> Result<Self, AppError> {
        let tokens = TokenService::new(&config.secret)?;
        let notes = NoteRepository::new(stores, config.salt.clone());
        Ok(Self {
            config: Arc::new(config),
            notes,
            tokens,
        })
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    use handlers::{directory, note, share};

    let body_limit = state.config.max_note_size;

    Router::new()
        .route("/", get(directory::root))
        .route("/directory", get(directory::directory))
        .route("/new", get(directory::new_note))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .route("/api/notes", get(directory::api_notes))
        .route(
            "/share/:token",
            get(share::view_shared).fallback(share::unsupported_method),
        )
        .route("/:path", get(note::view_note).post(note::save_note))
        .route("/:path/auth", post(note::auth))
        .route("/:path/pw", post(note::set_password))
        .route("/:path/setting", post(note::update_setting))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(
                        "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'",
                    ),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

/// Resolve the listener address from `BIND` and the public-access policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `bind`: Raw `BIND` override, if set.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(
    config: &Config,
    bind: Option<&str>,
    allow_public_access: bool,
) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match bind {
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::resolve_bind_address;
    use std::net::SocketAddr;
    use webnote_core::Config;

    fn config_on_port(port: u16) -> Config {
        let mut config = Config::from_lookup(|_| None);
        config.port = port;
        config
    }

    #[test]
    fn resolve_bind_address_enforces_loopback_when_public_access_disabled() {
        let config = config_on_port(4040);
        let resolved = resolve_bind_address(&config, Some("0.0.0.0:4040"), false);
        assert_eq!(resolved, SocketAddr::from(([127, 0, 0, 1], 4040)));

        let public = resolve_bind_address(&config, Some("0.0.0.0:4040"), true);
        assert_eq!(public, SocketAddr::from(([0, 0, 0, 0], 4040)));
    }

    #[test]
    fn resolve_bind_address_allows_loopback_and_invalid_fallback() {
        let config = config_on_port(4041);
        let loopback = resolve_bind_address(&config, None, false);
        assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));

        let fallback = resolve_bind_address(&config, Some("bad:host"), false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
    }
}
