//! Engine process configuration.

use std::time::Duration;

/// Default engine executable, looked up on `PATH`.
pub const DEFAULT_ENGINE_COMMAND: &str = "ccs-verifier";

/// How to launch the checking engine and how long to let it run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Wall-clock limit per dispatch in seconds. 0 disables the limit.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_ENGINE_COMMAND.to_string(),
            args: Vec::new(),
            timeout_secs: 0,
        }
    }
}

impl EngineConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Read `CCSV_ENGINE`, `CCSV_ENGINE_ARGS`, and `CCSV_ENGINE_TIMEOUT_SECS`.
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            command: non_empty("CCSV_ENGINE").unwrap_or(defaults.command),
            args: non_empty("CCSV_ENGINE_ARGS")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or(defaults.args),
            timeout_secs: non_empty("CCSV_ENGINE_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.command, DEFAULT_ENGINE_COMMAND);
        assert!(config.args.is_empty());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("CCSV_ENGINE", "/opt/verifier"),
            ("CCSV_ENGINE_ARGS", "--stdio  --quiet"),
            ("CCSV_ENGINE_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.command, "/opt/verifier");
        assert_eq!(config.args, vec!["--stdio", "--quiet"]);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn unparsable_or_empty_values_fall_back() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("CCSV_ENGINE", "  "),
            ("CCSV_ENGINE_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn builder_methods() {
        let config = EngineConfig::new("sh")
            .with_args(["-c", "cat"])
            .with_timeout_secs(5);
        assert_eq!(config.command, "sh");
        assert_eq!(config.args, vec!["-c", "cat"]);
        assert_eq!(config.timeout_secs, 5);
    }
}
