// SPDX-License-Identifier: LGPL-3.0-only

//! Operating system appearance signals: dark color scheme and reduced motion.
//!
//! On GNOME-like desktops the values come from `gsettings`; everywhere the
//! `TINCT_COLOR_SCHEME` and `TINCT_REDUCED_MOTION` environment variables
//! override what the desktop reports.

use std::cell::Cell;
use std::process::{Command, Stdio};
use std::rc::Rc;

use tinct_theme::observer::{Observers, Subscription};

/// Environment override for the color scheme (`dark` or `light`).
pub const COLOR_SCHEME_ENV: &str = "TINCT_COLOR_SCHEME";
/// Environment override for reduced motion (`1`/`true`/`reduce` or `0`/`false`).
pub const REDUCED_MOTION_ENV: &str = "TINCT_REDUCED_MOTION";

const GNOME_INTERFACE: &str = "org.gnome.desktop.interface";

/// A subscribable "prefers dark" signal.
pub trait ColorSchemeSource {
    /// Whether the system currently prefers a dark color scheme.
    fn prefers_dark(&self) -> bool;

    /// Call `callback` with the new value every time the preference changes.
    fn watch(&self, callback: Box<dyn Fn(bool)>) -> Subscription;
}

struct SchemeCell {
    prefers_dark: Cell<bool>,
    observers: Observers<bool>,
}

impl SchemeCell {
    fn new(prefers_dark: bool) -> Rc<Self> {
        Rc::new(Self {
            prefers_dark: Cell::new(prefers_dark),
            observers: Observers::new(),
        })
    }

    fn update(&self, prefers_dark: bool) -> bool {
        if self.prefers_dark.replace(prefers_dark) == prefers_dark {
            return false;
        }
        self.observers.notify(&prefers_dark);
        true
    }

    fn watch(&self, callback: Box<dyn Fn(bool)>) -> Subscription {
        self.observers.subscribe(move |value| callback(*value))
    }
}

/// A color scheme driven by the application.
///
/// Windowing layers that receive appearance events forward them with
/// [ManualColorScheme::set_prefers_dark]. Clones share state.
#[derive(Clone)]
pub struct ManualColorScheme {
    cell: Rc<SchemeCell>,
}

impl ManualColorScheme {
    /// Create a source with an initial value.
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            cell: SchemeCell::new(prefers_dark),
        }
    }

    /// Change the value. Watchers are notified only if it actually changed.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.cell.update(prefers_dark);
    }

    /// Number of active watchers.
    pub fn watcher_count(&self) -> usize {
        self.cell.observers.len()
    }
}

impl Default for ManualColorScheme {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ColorSchemeSource for ManualColorScheme {
    fn prefers_dark(&self) -> bool {
        self.cell.prefers_dark.get()
    }

    fn watch(&self, callback: Box<dyn Fn(bool)>) -> Subscription {
        self.cell.watch(callback)
    }
}

impl std::fmt::Debug for ManualColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualColorScheme")
            .field("prefers_dark", &self.cell.prefers_dark.get())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

/// The desktop's color scheme setting.
///
/// There is no push channel from `gsettings`, so the host calls
/// [SystemColorScheme::poll] (for example once per frame or on focus) to pick
/// up changes.
#[derive(Clone)]
pub struct SystemColorScheme {
    cell: Rc<SchemeCell>,
    reader: Rc<dyn Fn() -> bool>,
}

impl SystemColorScheme {
    /// Read the desktop setting now.
    pub fn new() -> Self {
        Self::with_reader(detect_prefers_dark)
    }

    /// Use a custom reader instead of querying the desktop.
    pub fn with_reader(reader: impl Fn() -> bool + 'static) -> Self {
        let initial = reader();
        Self {
            cell: SchemeCell::new(initial),
            reader: Rc::new(reader),
        }
    }

    /// Re-read the setting. Returns `true` and notifies watchers if it changed.
    pub fn poll(&self) -> bool {
        let changed = self.cell.update((self.reader)());
        if changed {
            log::info!("System color scheme changed (prefers dark: {})", self.cell.prefers_dark.get());
        }
        changed
    }
}

impl Default for SystemColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSource for SystemColorScheme {
    fn prefers_dark(&self) -> bool {
        self.cell.prefers_dark.get()
    }

    fn watch(&self, callback: Box<dyn Fn(bool)>) -> Subscription {
        self.cell.watch(callback)
    }
}

/// Query whether the desktop prefers dark.
///
/// Order: `TINCT_COLOR_SCHEME`, then the `color-scheme` key, then whether the
/// GTK theme name contains "dark". Defaults to light.
pub fn detect_prefers_dark() -> bool {
    if let Ok(value) = std::env::var(COLOR_SCHEME_ENV) {
        match parse_scheme_override(&value) {
            Some(dark) => return dark,
            None => log::warn!("Ignoring invalid {}={:?}", COLOR_SCHEME_ENV, value),
        }
    }

    if let Some(output) = run_command("gsettings", &["get", GNOME_INTERFACE, "color-scheme"]) {
        if let Some(dark) = parse_color_scheme(&output) {
            return dark;
        }
    }

    run_command("gsettings", &["get", GNOME_INTERFACE, "gtk-theme"])
        .map(|output| gtk_theme_is_dark(&output))
        .unwrap_or(false)
}

/// Query whether the user asked for reduced motion.
///
/// `TINCT_REDUCED_MOTION` wins; otherwise disabled desktop animations count
/// as reduced motion.
pub fn detect_reduced_motion() -> bool {
    if let Ok(value) = std::env::var(REDUCED_MOTION_ENV) {
        match parse_flag(&value) {
            Some(reduced) => return reduced,
            None => log::warn!("Ignoring invalid {}={:?}", REDUCED_MOTION_ENV, value),
        }
    }

    run_command("gsettings", &["get", GNOME_INTERFACE, "enable-animations"])
        .map(|output| unquote(&output) == "false")
        .unwrap_or(false)
}

/// `'prefer-dark'` → dark, `'prefer-light'`/`'default'` → light.
fn parse_color_scheme(output: &str) -> Option<bool> {
    match unquote(output) {
        "prefer-dark" => Some(true),
        "prefer-light" | "default" => Some(false),
        _ => None,
    }
}

fn gtk_theme_is_dark(output: &str) -> bool {
    unquote(output).to_ascii_lowercase().contains("dark")
}

fn parse_scheme_override(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "dark" => Some(true),
        "light" => Some(false),
        _ => None,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "reduce" => Some(true),
        "0" | "false" | "no" | "no-preference" => Some(false),
        _ => None,
    }
}

fn unquote(output: &str) -> &str {
    output.trim().trim_matches('\'')
}

/// Run a command and return its stdout if it succeeded.
fn run_command(program: &str, arguments: &[&str]) -> Option<String> {
    log::trace!("[cmd] {} {}", program, arguments.join(" "));
    match Command::new(program)
        .args(arguments)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
    {
        Ok(output) if output.status.success() => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        Ok(output) => {
            log::debug!(
                "[cmd] FAILED (exit {}): {} {}: {}",
                output.status.code().unwrap_or(-1),
                program,
                arguments.join(" "),
                String::from_utf8_lossy(&output.stderr).trim(),
            );
            None
        },
        Err(e) => {
            log::debug!("[cmd] could not run {}: {}", program, e);
            None
        },
    }
}
