//! ticket-aging: terminal ticket-aging table over a pre-aggregated snapshot.
//! Plain text, JSON, live-refresh and interactive views share one table model.

use clap::Parser;

mod cli;
mod cmd_json;
mod cmd_table;
mod cmd_watch;
mod context;
mod display;
mod interaction;
mod settings;
mod snapshot;
mod tui;

fn init_tracing() {
    let filter = std::env::var("TICKET_AGING_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_tracing();

    let config_path = args.config.as_ref();

    match args.command {
        cli::Command::Table(opts) => {
            let settings = settings::load_settings(config_path, &opts.view)?;
            let source = snapshot::SnapshotSource::open(&opts.view.snapshot)?;
            cmd_table::cmd_table(&settings, &source, &opts.color, opts.tooltips)?;
        }
        cli::Command::Json(opts) => {
            let settings = settings::load_settings(config_path, &opts.view)?;
            let source = snapshot::SnapshotSource::open(&opts.view.snapshot)?;
            cmd_json::cmd_json(&settings, &source, opts.tooltips)?;
        }
        cli::Command::Watch(opts) => {
            let settings = settings::load_settings(config_path, &opts.view)?;
            let source = snapshot::SnapshotSource::open(&opts.view.snapshot)?;
            cmd_watch::cmd_watch(&settings, source, opts.interval, &opts.color).await?;
        }
        cli::Command::Tui(opts) => {
            let settings = settings::load_settings(config_path, &opts.view)?;
            let source = snapshot::SnapshotSource::open(&opts.view.snapshot)?;
            tracing::info!(snapshot = %opts.view.snapshot.display(), "starting interactive table");
            tui::run_tui(settings, source, opts.reload_ms).await?;
        }
    }

    Ok(())
}
