//! TOML configuration.
//!
//! ```toml
//! theme = "dusk"
//! line_numbers = true
//! tab_width = 4
//! default_file = "scratch.c"
//!
//! [limits]
//! max_lines = 5000
//! max_cols = 240
//! ```
//!
//! Every key is optional. The file is looked up in this order:
//!
//! 1. an explicit path (`--config`)
//! 2. `$CEDIT_CONFIG`
//! 3. `<config dir>/cedit/config.toml`
//!
//! An explicit path that doesn't exist is an error; a missing default file
//! just means defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::buffer::Limits;
use crate::error::ConfigError;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CEDIT_CONFIG";

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    /// Builtin theme name.
    pub theme: String,
    /// Show the line-number gutter.
    pub line_numbers: bool,
    /// Columns per tab stop.
    pub tab_width: u8,
    /// File name used when the editor starts without a path.
    pub default_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            theme: "terminal".to_string(),
            line_numbers: false,
            tab_width: 8,
            default_file: PathBuf::from("untitled.txt"),
        }
    }
}

impl Config {
    /// Parse and validate a config from TOML text. `path` is only used in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown value
    /// types, and [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read, plus the
    /// errors of [`Config::from_toml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content, path)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Find and load the config file, falling back to defaults.
    ///
    /// `explicit` wins over `$CEDIT_CONFIG`, which wins over the default
    /// location.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly named file is missing or any found file is
    /// invalid.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve_from(explicit, env.as_deref(), default_path().as_deref())
    }

    /// [`Config::resolve`] with the environment and default location
    /// passed in.
    ///
    /// # Errors
    ///
    /// Same as [`Config::resolve`].
    pub fn resolve_from(
        explicit: Option<&Path>,
        env: Option<&Path>,
        default: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.or(env) {
            return Self::load(path);
        }
        let Some(path) = default else {
            return Ok(Self::default());
        };
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_lines == 0 {
            return Err(ConfigError::Invalid("limits.max_lines must be at least 1".into()));
        }
        if self.limits.max_cols == 0 {
            return Err(ConfigError::Invalid("limits.max_cols must be at least 1".into()));
        }
        if self.tab_width == 0 {
            return Err(ConfigError::Invalid("tab_width must be at least 1".into()));
        }
        if self.default_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("default_file must not be empty".into()));
        }
        Ok(())
    }
}

/// `<config dir>/cedit/config.toml`, if the platform has a config dir.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cedit").join("config.toml"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        Config::from_toml(content, Path::new("test.toml"))
    }

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.limits, Limits { max_lines: 1000, max_cols: 1000 });
        assert_eq!(c.theme, "terminal");
        assert_eq!(c.default_file, PathBuf::from("untitled.txt"));
        assert!(!c.line_numbers);
        assert_eq!(c.tab_width, 8);
    }

    #[test]
    fn partial_limits_keep_other_defaults() {
        let c = parse("theme = \"dusk\"\n[limits]\nmax_cols = 80\n").unwrap();
        assert_eq!(c.theme, "dusk");
        assert_eq!(c.limits.max_cols, 80);
        assert_eq!(c.limits.max_lines, 1000);
    }

    #[test]
    fn full_config() {
        let c = parse(
            "theme = \"mono\"\nline_numbers = true\ntab_width = 2\ndefault_file = \"a.c\"\n\
             [limits]\nmax_lines = 10\nmax_cols = 20\n",
        )
        .unwrap();
        assert_eq!(
            c,
            Config {
                limits: Limits { max_lines: 10, max_cols: 20 },
                theme: "mono".into(),
                line_numbers: true,
                tab_width: 2,
                default_file: "a.c".into(),
            }
        );
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(parse("theme = "), Err(ConfigError::Parse { .. })));
        assert!(matches!(parse("line_numbers = \"yes\""), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn zero_limits_are_invalid() {
        let err = parse("[limits]\nmax_lines = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("max_lines"));
        assert!(matches!(parse("[limits]\nmax_cols = 0\n"), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse("tab_width = 0"), Err(ConfigError::Invalid(_))));
    }

    // -- Resolution ---------------------------------------------------------

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("a.toml");
        let env = dir.path().join("b.toml");
        fs::write(&explicit, "theme = \"mono\"").unwrap();
        fs::write(&env, "theme = \"dusk\"").unwrap();

        let c = Config::resolve_from(Some(&explicit), Some(&env), None).unwrap();
        assert_eq!(c.theme, "mono");
        let c = Config::resolve_from(None, Some(&env), None).unwrap();
        assert_eq!(c.theme, "dusk");
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::resolve_from(Some(&missing), None, None),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn missing_default_path_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("cedit/config.toml");
        assert_eq!(
            Config::resolve_from(None, None, Some(&missing)).unwrap(),
            Config::default()
        );
        assert_eq!(Config::resolve_from(None, None, None).unwrap(), Config::default());
    }

    #[test]
    fn invalid_default_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[limits]\nmax_cols = 0").unwrap();
        assert!(Config::resolve_from(None, None, Some(&path)).is_err());
    }
}
