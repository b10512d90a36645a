use std::{
    error::Error,
    net::{IpAddr, SocketAddr},
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{
    AppState, ExpenseStore, InMemoryExpenseStore, SQLiteExpenseStore, build_router,
    graceful_shutdown, initialize_db, logging_middleware,
};

/// The REST API server for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Expenses are kept in
    /// memory and lost on shutdown if this is not set.
    #[arg(long, env = "DATABASE_PATH")]
    db_path: Option<String>,

    /// The address to serve the API from.
    #[arg(short, long, env = "ADDRESS", default_value = "0.0.0.0")]
    address: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();
    let addr = SocketAddr::from((args.address, args.port));

    let router = match &args.db_path {
        Some(db_path) => {
            tracing::info!("Opening database at {db_path}");
            let connection = Connection::open(db_path)?;
            initialize_db(&connection)?;

            app_router(SQLiteExpenseStore::new(Arc::new(Mutex::new(connection))))
        }
        None => {
            tracing::warn!(
                "No database path was given, expenses will be kept in memory and lost on shutdown"
            );

            app_router(InMemoryExpenseStore::new())
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn app_router<S>(store: S) -> Router
where
    S: ExpenseStore + Clone + Send + Sync + 'static,
{
    let router = build_router(AppState::new(store)).layer(middleware::from_fn(logging_middleware));

    add_tracing_layer(router)
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
