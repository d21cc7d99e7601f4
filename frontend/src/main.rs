use anyhow::Result;
use chrono::Local;
use lorawatch_frontend::config::ClientConfig;
use lorawatch_frontend::feed_client;
use lorawatch_frontend::telemetry_dashboard::terminal::TerminalSurface;
use lorawatch_frontend::telemetry_dashboard::DashboardController;
use std::io::{self, IsTerminal};

fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,lorawatch_frontend=info".into());
    // stdout belongs to the dashboard
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let config = ClientConfig::from_env(std::env::args().nth(1))?;

    let stdout = io::stdout();
    let surface = if stdout.is_terminal() {
        TerminalSurface::new(stdout)
    } else {
        TerminalSurface::new(stdout).without_clear()
    };
    let mut controller = DashboardController::new(surface);
    if let Err(err) = controller.surface_mut().flush() {
        tracing::warn!(error=%err, "failed to draw dashboard");
    }

    let feed = feed_client::supervise(&config, |text| {
        // Errors were already logged by the dashboard; the frame is dropped.
        controller.on_message(text, Local::now().naive_local()).ok();
        if let Err(err) = controller.surface_mut().flush() {
            tracing::warn!(error=%err, "failed to draw dashboard");
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
        _ = feed => {}
    }
    Ok(())
}
