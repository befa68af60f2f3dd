use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, EnvFilter};

use umbriel::settings::Settings;
use umbriel::visibility::{loader, web};

#[derive(Parser, Debug)]
#[command(
    name = "umbriel",
    version,
    about = "Per-viewer CSS visibility for forum profile custom fields"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    // load rules + field registry into immutable state
    let state = loader::load_state(&settings.content.rules_dir, &settings.content.field_registry)?;

    // start web server
    let app = web::router(Arc::new(state)).layer(TraceLayer::new_for_http());
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.into_diagnostic()?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}
