//! licshim — drop-in license lease/ticket server.
//!
//! Serves the lease and ticket licensing protocols with signatures the
//! vendor clients verify, plus a small console for generating activation
//! links and a token-guarded usage-history API.
//!
//! Usage:
//!   licshim-server --port 58080 --admin-token <token> --audit-db usage.db

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use licshim_audit::{AuditSink, AuditStore, MemoryStore, SqliteStore};
use licshim_server::{build_router, AppState};
use licshim_signing::{KeyStore, Protocol, SigningService};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "licshim-server")]
#[command(about = "Drop-in license lease/ticket server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "58080")]
    port: u16,

    /// Bearer token for the admin API (disabled when absent)
    #[arg(long)]
    admin_token: Option<String>,

    /// Path to the SQLite usage log (in-memory history when absent)
    #[arg(long)]
    audit_db: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("licshim starting...");

    let keys = Arc::new(KeyStore::from_embedded());
    for protocol in [Protocol::Lease, Protocol::Ticket] {
        if !keys.is_available(protocol) {
            warn!("{:?} key unavailable; responses will carry degraded signatures", protocol);
        }
    }
    let signer = SigningService::new(keys);

    let store: Arc<dyn AuditStore> = match &args.audit_db {
        Some(path) => match SqliteStore::open(path) {
            Ok(store) => {
                info!("usage log: {}", path.display());
                Arc::new(store)
            }
            Err(e) => {
                warn!("failed to open usage log, falling back to memory: {e}");
                Arc::new(MemoryStore::new())
            }
        },
        None => {
            info!("usage log: in-memory (no --audit-db)");
            Arc::new(MemoryStore::new())
        }
    };
    let audit = AuditSink::spawn(Arc::clone(&store));

    let state = AppState {
        signer,
        audit,
        store,
        admin_token: args.admin_token,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .context("failed to bind listen port")?;

    println!("\n========================================");
    println!("  licshim license server");
    println!("========================================");
    println!("  Console:          http://localhost:{}/", args.port);
    println!("  Lease endpoint:   http://localhost:{}/jrebel/leases", args.port);
    println!("  Ticket endpoint:  http://localhost:{}/rpc/ping.action", args.port);
    println!("========================================\n");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server failed")?;

    Ok(())
}
