//! CLI configuration

use rentprobe::SuiteConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CliResult;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - step-by-step progress
    Verbose,
    /// Debug - every driver interaction
    Debug,
}

impl Verbosity {
    /// From the `-q` flag and `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default tracing filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "rentprobe=info,warn",
            Self::Debug => "rentprobe=debug,info",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on detection of stderr, where status lines go
    #[must_use]
    pub fn should_color(self) -> bool {
        self.should_color_on(&console::Term::stderr())
    }

    /// Should use colors when writing to `term`
    #[must_use]
    pub fn should_color_on(self, term: &console::Term) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => term.features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Suite configuration file, if one was given
    pub suite_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the suite configuration file
    #[must_use]
    pub fn with_suite_path(mut self, path: Option<PathBuf>) -> Self {
        self.suite_path = path;
        self
    }

    /// Load the suite configuration: the file when given, otherwise defaults,
    /// with environment overrides either way
    pub fn suite(&self) -> CliResult<SuiteConfig> {
        let suite = match &self.suite_path {
            Some(path) => SuiteConfig::load(path)?,
            None => SuiteConfig::from_env()?,
        };
        Ok(suite)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        }

        #[test]
        fn test_log_filter() {
            assert_eq!(Verbosity::Quiet.log_filter(), "error");
            assert!(Verbosity::Debug.log_filter().contains("rentprobe=debug"));
        }

        #[test]
        fn test_is_verbose() {
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Verbose.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
        }
    }

    mod color_choice_tests {
        use super::*;

        #[test]
        fn test_should_color_fixed() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }

        #[test]
        fn test_auto_follows_stderr() {
            let stderr = console::Term::stderr();
            assert_eq!(
                ColorChoice::Auto.should_color(),
                stderr.features().colors_supported()
            );
            assert!(ColorChoice::Always.should_color_on(&stderr));
            assert!(!ColorChoice::Never.should_color_on(&console::Term::stdout()));
        }

        #[test]
        fn test_deserialize() {
            let c: ColorChoice = serde_json::from_str("\"Never\"").unwrap();
            assert_eq!(c, ColorChoice::Never);
        }
    }

    mod cli_config_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_suite_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "base_url: \"https://rentals.example\"").unwrap();
            let config = CliConfig::new().with_suite_path(Some(file.path().to_path_buf()));
            let suite = config.suite().unwrap();
            assert_eq!(suite.base_url, "https://rentals.example");
        }

        #[test]
        fn test_missing_file_is_an_error() {
            let config = CliConfig::new().with_suite_path(Some(PathBuf::from("/no/such/rentprobe.yaml")));
            assert!(config.suite().is_err());
        }
    }
}
