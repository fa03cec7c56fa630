//! Browse presets and flip modes from the command line.
//!
//! Every command works on the real preferences file, so changes show up in
//! other tinct applications (and in a running `preset_gallery watch`).

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tinct::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "preset_gallery", about = "Browse tinct presets", version)]
struct Cli {
    /// Keep preferences in memory instead of the preferences file.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List presets, optionally filtered by label.
    List {
        /// Case-insensitive label filter.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Print the current state.
    Show,
    /// Select a preset by key.
    Select { key: String },
    /// Select the next preset.
    Next,
    /// Select the previous preset.
    Previous,
    /// Select a random preset.
    Random,
    /// Set the mode preference.
    Mode { mode: ModePreference },
    /// Toggle between light and dark, optionally from a click position.
    Toggle {
        #[arg(long, requires = "y")]
        x: Option<f32>,
        #[arg(long, requires = "x")]
        y: Option<f32>,
    },
    /// Print every change until interrupted or `--seconds` elapse.
    Watch {
        #[arg(long)]
        seconds: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ThemeConfig::from_env_or_default();
    let transition = config.transition;

    let mut builder = ThemeService::builder()
        .config(config)
        .transitions(RevealTransition::new(transition));
    if cli.ephemeral {
        builder = builder.storage(MemoryStorage::new());
    }
    let service = builder.build();

    match cli.command {
        Command::List { search } => list(&service, &search),
        Command::Show => show(&service.theme_state(), service.mode()),
        Command::Select { key } => {
            if !service.presets().has(&key) {
                bail!("unknown preset '{}'", key);
            }
            service.set_preset(&key);
            show(&service.theme_state(), service.mode());
        },
        Command::Next => {
            service.cycle_preset(CycleDirection::Next);
            show(&service.theme_state(), service.mode());
        },
        Command::Previous => {
            service.cycle_preset(CycleDirection::Previous);
            show(&service.theme_state(), service.mode());
        },
        Command::Random => {
            service.randomize_preset();
            show(&service.theme_state(), service.mode());
        },
        Command::Mode { mode } => {
            service.set_mode(mode);
            show(&service.theme_state(), service.mode());
        },
        Command::Toggle { x, y } => {
            let coords = x.zip(y).map(|(x, y)| Coords::new(x, y));
            service.toggle_mode(coords);
            show(&service.theme_state(), service.mode());
        },
        Command::Watch { seconds } => watch(&service, seconds.map(Duration::from_secs)),
    }

    service.dispose();
    Ok(())
}

fn list(service: &ThemeService, search: &str) {
    let now = Utc::now();
    let current = service.preset_key();
    let registry = service.presets();

    for key in registry.search(search) {
        let Some(preset) = registry.get(key) else { continue };
        let marker = if key == current { "*" } else { " " };
        let badge = if preset.is_new(now) { " [new]" } else { "" };
        println!("{} {:<20} {}{}", marker, key, preset.label(), badge);
    }
}

fn show(state: &ThemeState, mode: ModePreference) {
    println!("preset: {}", state.preset_key);
    println!("mode:   {} (resolved {})", mode, state.resolved_mode);
    for (role, value) in state.styles.iter() {
        println!("  {:<22} {}", role, value);
    }
}

fn watch(service: &ThemeService, limit: Option<Duration>) {
    let _sub = service.subscribe(|state| {
        println!("-> {} / {}", state.preset_key, state.resolved_mode);
    });

    println!("watching {} / {}", service.preset_key(), service.resolved_mode());
    let start = Instant::now();
    while limit.map_or(true, |limit| start.elapsed() < limit) {
        service.pump_storage_events();
        service.poll_system();
        thread::sleep(Duration::from_millis(500));
    }
}
