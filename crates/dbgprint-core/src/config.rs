//! # Configuration
//!
//! Defaults for the traceback formatter, optionally read from the
//! environment:
//!
//! - `DBGPRINT_TRACEBACK_DEPTH`: number of frames to show (default `3`)
//! - `DBGPRINT_FULL_PATHS`: show full file paths instead of basenames
//!   (default `false`)
//!
//! Path display can also be forced for the whole process with
//! [`set_full_paths_override`]. The override wins over every per-call
//! setting until it is cleared again with `None`.

use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::ConfigError;

/// Frames shown when nothing else is configured.
pub const DEFAULT_TRACEBACK_DEPTH: usize = 3;

/// Environment variable holding the traceback depth.
pub const DEPTH_ENV: &str = "DBGPRINT_TRACEBACK_DEPTH";

/// Environment variable holding the full-paths flag.
pub const FULL_PATHS_ENV: &str = "DBGPRINT_FULL_PATHS";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_BASENAME: u8 = 1;
const OVERRIDE_FULL: u8 = 2;

static FULL_PATHS_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

/// Formatter defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config
{
    /// Maximum number of frames in a traceback.
    pub traceback_depth: usize,
    /// Print full file paths instead of basenames.
    pub full_paths: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            traceback_depth: DEFAULT_TRACEBACK_DEPTH,
            full_paths: false,
        }
    }
}

impl Config
{
    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their default.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to
    /// something that does not parse.
    pub fn from_env() -> Result<Self, ConfigError>
    {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    ///
    /// ## Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError>
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEPTH_ENV) {
            config.traceback_depth = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: DEPTH_ENV,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(FULL_PATHS_ENV) {
            config.full_paths = parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: FULL_PATHS_ENV,
                value,
            })?;
        }

        tracing::trace!(?config, "loaded configuration");
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool>
{
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Force full paths (`Some(true)`) or basenames (`Some(false)`) for every
/// traceback in the process, or clear the override (`None`).
pub fn set_full_paths_override(full_paths: Option<bool>)
{
    let raw = match full_paths {
        None => OVERRIDE_UNSET,
        Some(false) => OVERRIDE_BASENAME,
        Some(true) => OVERRIDE_FULL,
    };
    FULL_PATHS_OVERRIDE.store(raw, Ordering::Relaxed);
}

/// Current process-wide override, if any.
pub fn full_paths_override() -> Option<bool>
{
    match FULL_PATHS_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_BASENAME => Some(false),
        OVERRIDE_FULL => Some(true),
        _ => None,
    }
}

/// Effective path display for a call that asked for `requested`.
pub fn resolve_full_paths(requested: bool) -> bool
{
    full_paths_override().unwrap_or(requested)
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String>
    {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults()
    {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.traceback_depth, 3);
        assert!(!config.full_paths);
    }

    #[test]
    fn test_from_lookup()
    {
        let config = Config::from_lookup(lookup(&[(DEPTH_ENV, " 10 "), (FULL_PATHS_ENV, "yes")])).unwrap();
        assert_eq!(config.traceback_depth, 10);
        assert!(config.full_paths);
    }

    #[test]
    fn test_invalid_depth()
    {
        let err = Config::from_lookup(lookup(&[(DEPTH_ENV, "-1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: DEPTH_ENV,
                value: "-1".to_string()
            }
        );
        assert!(err.to_string().contains(DEPTH_ENV));
    }

    #[test]
    fn test_invalid_bool()
    {
        assert!(Config::from_lookup(lookup(&[(FULL_PATHS_ENV, "maybe")])).is_err());
    }

    #[test]
    fn test_parse_bool()
    {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("nah"), None);
    }
}
