//! Resolve the persisted theme and print it as CSS custom properties.
//!
//! ```text
//! cargo run -p css_export -- --mode dark --preset ocean-breeze
//! ```

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tinct::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "css_export", about = "Print the current tinct theme as CSS")]
struct Args {
    /// Override the mode preference (light, dark or system). Persisted.
    #[arg(long)]
    mode: Option<ModePreference>,

    /// Select a preset. Persisted.
    #[arg(long)]
    preset: Option<String>,

    /// CSS selector of the rule.
    #[arg(long, default_value = ":root")]
    selector: String,

    /// Prefix of custom property names.
    #[arg(long, default_value = "--")]
    prefix: String,

    /// TOML configuration file, layered over TINCT_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep preferences in memory instead of the preferences file.
    #[arg(long)]
    ephemeral: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = ThemeConfig::from_env_or_default();
    if let Some(path) = &args.config {
        let file = ThemeConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?;
        config.merge(file);
    }

    let mut builder = ThemeService::builder()
        .config(config)
        .style_prefix(args.prefix.clone())
        .transitions(ImmediateTransitions);
    if args.ephemeral {
        builder = builder.storage(MemoryStorage::new());
    }
    let service = builder.build();

    if let Some(mode) = args.mode {
        service.set_mode(mode);
    }
    if let Some(preset) = &args.preset {
        if let Err(e) = service.presets().try_get(preset) {
            let known: Vec<&str> = service.presets().keys().collect();
            bail!("{} (known: {})", e, known.join(", "));
        }
        service.set_preset(preset);
    }

    let target = Rc::new(RefCell::new(CssVariables::with_selector(args.selector)));
    let _attached = service.attach_target(target.clone());

    let state = service.theme_state();
    log::info!("Exporting preset '{}' in {} mode", state.preset_key, state.resolved_mode);

    print!("{}", target.borrow().to_css());
    service.dispose();
    Ok(())
}
