//! Runtime configuration for the display.
//!
//! Configuration is read from `LUMEN_*` environment variables, falling back
//! to defaults for anything missing or unparsable.

use core::time::Duration;
use std::env;

use crate::backend::{BackendKind, DisplayMode};
use crate::geometry::Size;

/// Frame budget used when none is configured: 100 frames per second.
pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_millis(10);

/// Runtime configuration for the display compositor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Minimum frame duration in milliseconds
    pub frame_budget_ms: u64,
    /// Screen width in pixels
    pub screen_width: u32,
    /// Screen height in pixels
    pub screen_height: u32,
    /// Presentation mode
    pub mode: DisplayMode,
    /// Surface backend
    pub backend: BackendKind,
    /// How long the demo binary keeps the display running, in milliseconds
    pub run_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl DisplayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `LUMEN_FRAME_BUDGET_MS`: Frame budget in milliseconds (default: 10, minimum 1)
    /// - `LUMEN_SCREEN_WIDTH`, `LUMEN_SCREEN_HEIGHT`: Screen size (default: 800x600)
    /// - `LUMEN_DISPLAY_MODE`: `windowed`, `fullscreen` or `seamless` (default: windowed)
    /// - `LUMEN_BACKEND`: `memory` or `null` (default: memory)
    /// - `LUMEN_RUN_MS`: Demo run time in milliseconds (default: 1000)
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let frame_budget_ms = lookup("LUMEN_FRAME_BUDGET_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(10)
            .max(1);
        let screen_width = lookup("LUMEN_SCREEN_WIDTH")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(800);
        let screen_height = lookup("LUMEN_SCREEN_HEIGHT")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(600);
        let mode = lookup("LUMEN_DISPLAY_MODE")
            .and_then(|val| val.trim().parse::<DisplayMode>().ok())
            .unwrap_or_default();
        let backend = lookup("LUMEN_BACKEND")
            .and_then(|val| val.trim().parse::<BackendKind>().ok())
            .unwrap_or_default();
        let run_ms = lookup("LUMEN_RUN_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(1000);
        Self {
            frame_budget_ms,
            screen_width,
            screen_height,
            mode,
            backend,
            run_ms,
        }
    }

    /// Get the frame budget as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }

    /// Get the configured screen size.
    #[inline]
    #[must_use]
    pub const fn screen_size(&self) -> Size {
        Size::new(self.screen_width, self.screen_height)
    }

    /// Get the demo run time as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn run_time(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, val)| ((*key).to_owned(), (*val).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    /// Test that an empty environment yields the defaults.
    ///
    /// # Panics
    /// Panics if a default differs.
    #[test]
    fn defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.frame_budget(), DEFAULT_FRAME_BUDGET);
        assert_eq!(config.screen_size(), Size::new(800, 600));
        assert_eq!(config.mode, DisplayMode::Windowed);
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.run_time(), Duration::from_secs(1));
    }

    /// Test that set variables override the defaults and bad ones are ignored.
    ///
    /// # Panics
    /// Panics if a variable is not applied as expected.
    #[test]
    fn overrides_and_fallbacks() {
        let config = DisplayConfig::from_lookup(lookup_in(&[
            ("LUMEN_FRAME_BUDGET_MS", "0"),
            ("LUMEN_SCREEN_WIDTH", " 1024 "),
            ("LUMEN_SCREEN_HEIGHT", "tall"),
            ("LUMEN_DISPLAY_MODE", "Seamless"),
            ("LUMEN_BACKEND", "null"),
        ]));
        assert_eq!(config.frame_budget_ms, 1);
        assert_eq!(config.screen_size(), Size::new(1024, 600));
        assert_eq!(config.mode, DisplayMode::Seamless);
        assert_eq!(config.backend, BackendKind::Null);
    }
}
