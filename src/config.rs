//! Process-wide settings, read once at startup.

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "INTCALC_LOG";

/// Filter used when `INTCALC_LOG` is unset or empty.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// The single integration variable.
pub const DEFAULT_VARIABLE: &str = "x";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub variable: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = lookup(LOG_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            log_filter,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_warn() {
        assert_eq!(Config::from_lookup(|_| None).log_filter, "warn");
        assert_eq!(Config::from_lookup(|_| Some("  ".into())).log_filter, "warn");
    }

    #[test]
    fn log_filter_reads_env_value() {
        let config = Config::from_lookup(|key| (key == LOG_ENV).then(|| "intcalc=debug".into()));
        assert_eq!(config.log_filter, "intcalc=debug");
        assert_eq!(config.variable, "x");
    }
}
