//! HTTP layer - storefront JSON API, admin API and storefront assets.
//!
//! This module wires the catalog into an axum [`Router`]. Storefront routes are
//! always mounted. Admin routes are only mounted when a live database is
//! configured, since the static snapshot is never written at runtime. Every other
//! path falls through to the storefront's static files.

/// Error-to-response mapping
pub mod error;
/// Route handlers (storefront and admin)
pub mod handlers;
/// Admin session tokens
pub mod session;

use crate::{
    core::catalog::Catalog,
    errors::{Error, Result},
    store::CatalogStore,
};
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post, put},
};
use handlers::{admin, storefront};
use sea_orm::DatabaseConnection;
use session::SessionStore;
use std::{path::Path, sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

/// Shared data available to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Storefront reads
    pub catalog: Arc<Catalog<CatalogStore>>,
    /// Live store for admin writes; `None` in static mode
    pub database: Option<Arc<DatabaseConnection>>,
    /// Logged-in admin sessions
    pub sessions: SessionStore,
    /// Page size used when a request gives none
    pub default_page_size: u64,
}

impl AppState {
    /// Creates the state shared by all requests.
    #[must_use]
    pub fn new(
        catalog: Catalog<CatalogStore>,
        database: Option<Arc<DatabaseConnection>>,
        default_page_size: u64,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            database,
            sessions: SessionStore::default(),
            default_page_size,
        }
    }
}

/// Builds the application router. Paths outside `/api` are served from
/// `assets_dir` when one is given.
pub fn router(state: AppState, assets_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/api/products", get(storefront::list_products))
        .route("/api/products/featured", get(storefront::featured_products))
        .route("/api/products/carousel", get(storefront::carousel_products))
        .route(
            "/api/products/best-sellers",
            get(storefront::best_seller_products),
        )
        .route("/api/products/:id", get(storefront::product_detail))
        .route(
            "/api/products/:id/recommendations",
            get(storefront::recommendations),
        )
        .route("/api/search", get(storefront::search_products));

    if state.database.is_some() {
        app = app
            .route("/api/admin/login", post(admin::login))
            .route("/api/admin/logout", post(admin::logout))
            .route(
                "/api/admin/products",
                get(admin::list_products).post(admin::create_product),
            )
            .route(
                "/api/admin/products/:id",
                get(admin::get_product)
                    .put(admin::update_product)
                    .delete(admin::delete_product),
            );
    } else {
        info!("No live database configured; admin routes are disabled");
    }

    if let Some(dir) = assets_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    app.with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds `address` and serves `app` until Ctrl+C or SIGTERM.
pub async fn serve(app: Router, address: &str) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}

/// Reloads the catalog each time the process receives SIGHUP, so a replaced
/// snapshot file is picked up without a restart.
#[cfg(unix)]
pub fn reload_on_hangup(catalog: Arc<Catalog<CatalogStore>>) {
    tokio::spawn(async move {
        let mut hangups = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to install SIGHUP handler: {}", e);
                return;
            }
        };
        while hangups.recv().await.is_some() {
            info!("Received SIGHUP, reloading catalog");
            if let Err(e) = catalog.refresh().await {
                error!("Catalog reload failed: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
