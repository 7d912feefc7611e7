//! GamePals user directory server.
//!
//! A small document-backed CRUD service that provides:
//!
//! 1. **Account lifecycle**: registration (with credential issuance),
//!    profile retrieval and update, account deletion.
//!
//! 2. **Friends graph**: each user keeps a list of friend references, added
//!    and removed symmetrically by username.
//!
//! 3. **Game recommendations**: every friendship carries a per-direction
//!    list of recommended game identifiers with set semantics.
//!
//! State lives in a concurrent in-process document store that can persist
//! itself to a JSON file; there is no external database process to run.

mod auth;
mod directory;
mod error;

use axum::http::Method;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::TokenIssuer;
use directory::{api, DirectoryConfig, UserDirectory, UserStore};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gamepals-server", version, about = "GamePals user directory server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000, env = "PORT")]
    port: u16,

    /// Directory for persisting user documents. In-memory only when unset.
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<String>,

    /// Hex-encoded 32-byte seed for the credential signing key.
    /// A random ephemeral key is generated when unset.
    #[arg(long, env = "TOKEN_SEED")]
    token_seed: Option<String>,
}

// ── Entry Point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamepals_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = DirectoryConfig {
        port: args.port,
        data_dir: args.data_dir,
        token_seed: args.token_seed,
    };

    let store = UserStore::new(&config);
    let loaded = store.load_from_disk();
    tracing::info!(users = loaded, "user store ready");

    let tokens = match config.token_seed.as_deref() {
        Some(seed) => {
            TokenIssuer::from_hex_seed(seed).expect("invalid TOKEN_SEED (expected 64 hex characters)")
        }
        None => {
            tracing::warn!("no TOKEN_SEED configured; issued tokens will not survive a restart");
            TokenIssuer::generate()
        }
    };

    let directory = UserDirectory::new(store, tokens);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let app = api::router(directory)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("gamepals server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server error");
}
