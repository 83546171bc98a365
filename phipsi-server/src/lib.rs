//! HTTP service for Ramachandran plots of RCSB PDB entries.
//!
//! - **Charts** — `/calculate_ramachandran/{pdb_id}` (chart item JSON),
//!   `/pdb/{pdb_id}` and `/?pdb_id=` (standalone HTML), `/angles/{pdb_id}`
//! - **Metadata** — `/rcsb`, `/uniprot`, `/quickgo`, `/pubmed` and `/emdb`
//!   relays
//! - **Operations** — `/health`, CORS allow-list, TOML + CLI configuration

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

pub use config::{Cli, ServerConfig};
pub use error::{ApiError, HtmlError};
pub use state::AppState;

use config::CorsConfig;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route(
            "/calculate_ramachandran",
            axum::routing::post(routes::calculate_ramachandran_post),
        )
        .route("/calculate_ramachandran/:pdb_id", get(routes::calculate_ramachandran))
        .route("/pdb/:pdb_id", get(routes::pdb_page))
        .route("/angles/:pdb_id", get(routes::angles))
        .route("/rcsb/:pdb_id", get(routes::rcsb_entry))
        .route("/uniprot/:accession", get(routes::uniprot_entry))
        .route("/quickgo/:go_id", get(routes::quickgo_term))
        .route("/pubmed/:pmid", get(routes::pubmed_summary))
        .route("/emdb/:emdb_id", get(routes::emdb_entry))
        .layer(cors)
        .with_state(state)
}

/// CORS policy. A `"*"` entry allows any origin, method and header, and
/// turns credentials off.
fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    if cfg.allowed_origins.iter().any(|o| o == "*") {
        if cfg.allow_credentials {
            log::warn!("cors: wildcard origin configured; credentials disabled");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("cors: skipping invalid origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cfg.allow_credentials)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    log::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutdown signal received");
}
