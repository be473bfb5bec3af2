//! OS-ROLES Platform Server
//!
//! Serves the OS-ROLES REST API and the identity collaborator's `/users`
//! endpoints from one process.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KS_CONFIG` | - | Path to a TOML config file |
//! | `KS_HTTP_PORT` | `5000` | HTTP API port |
//! | `KS_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `KS_CORS_ORIGINS` | `*` | Comma separated allowed origins |
//! | `KS_PUBLIC_ENDPOINT` | `http://localhost:5000/v3` | Base URL used in `links` |
//! | `KS_ROLES_ENFORCE_UNIQUE_NAMES` | `true` | Reject duplicate role/permission names |
//! | `KS_DEV_MODE` | `false` | Seed demo data on startup |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `json` for structured output |

use axum::{
    extract::Request,
    http::HeaderValue,
    response::Json,
    routing::get,
    Router,
    ServiceExt,
};
use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tower::Layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

use ks_config::{AppConfig, ConfigLoader};
use ks_platform::{DevDataSeeder, PlatformServices, PublicEndpoint, StoreOptions};

#[tokio::main]
async fn main() -> Result<()> {
    ks_common::logging::init_logging("ks-platform-server");

    info!("Starting OS-ROLES Platform Server");

    let config = ConfigLoader::new().load()?;

    let options = StoreOptions {
        enforce_unique_names: config.roles.enforce_unique_names,
    };
    let services = PlatformServices::new(options, PublicEndpoint::new(config.base_url()));

    // Seed development data if in dev mode
    if config.dev_mode {
        let seeder = DevDataSeeder::new(services.store.clone(), services.directory.clone());
        if let Err(e) = seeder.seed() {
            tracing::warn!("Dev data seeding skipped: {}", e);
        }
    }

    let (router, mut openapi) = services.router().split_for_parts();

    openapi.info.title = "OS-ROLES Platform API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some("Roles, permissions and user assignments".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    // Trailing slashes are trimmed before routing
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    let addr = config.http.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("Press Ctrl+C to shutdown");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("OS-ROLES Platform Server shutdown complete");
    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.http.cors_origins;
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received...");
}
