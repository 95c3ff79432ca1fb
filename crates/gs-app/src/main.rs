use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use gs_core::config::{DemoConfig, load_config};

pub mod app;
pub mod cli;
pub mod demo;
pub mod hotreload;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config et appliquer les overrides CLI
    let overrides = cli.overrides()?;
    let mut config = resolve_config(&cli)?;
    overrides.apply(&mut config);
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Mode sans terminal
    if let Some(frames) = cli.frames {
        let mut app = app::App::new(config, cli.cols, cli.rows);
        for line in app.run_headless(frames)? {
            println!("{line}");
        }
        return Ok(());
    }

    // 5. Hot-reload config (thread interne notify)
    let _watcher = if cli.config.exists() {
        Some(hotreload::spawn_config_watcher(&cli.config, &config, overrides)?)
    } else {
        None
    };

    // 6. Terminal ratatui, restauré même en cas d'erreur
    let terminal = ratatui::init();
    let result = run_interactive(config, terminal);
    ratatui::restore();

    result
}

fn run_interactive(config: Arc<ArcSwap<DemoConfig>>, terminal: ratatui::DefaultTerminal) -> Result<()> {
    let (width, height) = crossterm::terminal::size()?;
    let mut app = app::App::new(config, width, height);
    app.run(terminal)
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<DemoConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(DemoConfig::default())
    }
}
