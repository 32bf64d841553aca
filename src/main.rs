//! Personality Atlas - per-country MBTI survey dashboard
//!
//! Loads a survey CSV once and shows a country's type distribution, the global
//! average per type, and a ranked comparison for one combined type pair.

mod args;
mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod stats;

#[cfg(test)]
mod testing;

use anyhow::{anyhow, Context, Result};
use args::Args;
use charts::{StaticChartRenderer, EXPORT_SIZE};
use clap::Parser;
use config::DashboardConfig;
use dashboard::{resolve_country, DashboardReport};
use data::DataLoader;
use eframe::egui;
use gui::AtlasApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = resolve_config(&args)?;
    info!(data = %config.data_path.display(), "startup");

    // Loaded once; every view borrows this table for the rest of the process
    let mut loader = DataLoader::new();
    let load_error = loader
        .load_csv(&config.data_path)
        .err()
        .map(|e| e.to_string());

    if let Some(dir) = &args.export {
        let report = build_report(
            &loader,
            load_error.as_deref(),
            args.country.as_deref(),
            &config,
        );
        let paths = StaticChartRenderer::export_report(&report, dir, EXPORT_SIZE)
            .with_context(|| format!("exporting charts to {}", dir.display()))?;
        for path in paths {
            println!("{}", path.display());
        }
        return Ok(());
    }

    if args.report {
        let report = build_report(
            &loader,
            load_error.as_deref(),
            args.country.as_deref(),
            &config,
        );
        print!("{}", report);
        return Ok(());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Personality Atlas"),
        ..Default::default()
    };

    let initial_country = args.country.clone();
    eframe::run_native(
        "Personality Atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(AtlasApp::new(
                cc,
                config,
                loader,
                load_error,
                initial_country,
            )))
        }),
    )
    .map_err(|e| anyhow!("failed to start window: {}", e))
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the config file, then command line flags.
fn resolve_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

fn build_report(
    loader: &DataLoader,
    load_error: Option<&str>,
    country: Option<&str>,
    config: &DashboardConfig,
) -> DashboardReport {
    match load_error {
        Some(error) => DashboardReport::unavailable(format!("Data unavailable: {}", error)),
        None => {
            let table = loader.table();
            let selected = resolve_country(table, country, &config.preferred_country);
            DashboardReport::build(table, selected.as_deref(), config)
        }
    }
}
