//! Endless list demo - Entry Point

use clap::Parser;
use endless_list::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    CliOverrides, LayoutKind, ResolvedConfig,
};
use endless_list::model::AppError;
use std::path::PathBuf;
use tracing::info;

/// Endless list demo - scroll toward either end to page in more rows
#[derive(Parser, Debug)]
#[command(name = "endless-demo")]
#[command(version)]
#[command(about = "Terminal demo of a bidirectional endless list")]
pub struct Args {
    /// Rows from an edge at which the next page is requested (must be positive)
    #[arg(short, long)]
    pub threshold: Option<i64>,

    /// Layout of the list
    #[arg(long, value_parser = ["linear", "staggered"])]
    pub layout: Option<String>,

    /// Number of columns of the staggered layout
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub tracks: Option<usize>,

    /// Rows per loaded page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Pages available before the end of the data is reached
    #[arg(long)]
    pub pages: Option<usize>,

    /// Simulated latency of one page load, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Also load pages above the first one
    #[arg(short, long)]
    pub bidirectional: bool,

    /// Do not show a placeholder row while a page is loading
    #[arg(long)]
    pub no_placeholder: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Overrides carried by the command line. Unset flags leave lower layers alone.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threshold: self.threshold,
            page_size: self.page_size,
            total_pages: self.pages,
            load_delay_ms: self.delay_ms,
            layout: self.layout.as_deref().and_then(|l| l.parse::<LayoutKind>().ok()),
            tracks: self.tracks,
            bidirectional: self.bidirectional.then_some(true),
            placeholder: self.no_placeholder.then_some(false),
        }
    }
}

/// Resolve the configuration: Defaults → Config File → Env Vars → CLI Args.
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = load_config_with_precedence(args.config.clone())?;
    let merged = merge_config(config_file);
    let with_env = apply_env_overrides(merged)?;
    let config = apply_cli_overrides(with_env, args.overrides());
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    endless_list::logging::init(&config.log_file_path, &config.log_level)?;

    info!(config = ?config, "Configuration loaded and resolved");

    endless_list::view::run_with_config(&config)?;

    info!("Demo exited cleanly");
    Ok(())
}
