use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_PROMPT: &str = ">>> ";
pub const CONTINUATION_PROMPT: &str = "... ";

/// Runtime settings for the `cinder` binary.
///
/// Resolved from the environment first; command-line flags are layered on
/// top with [`Config::with_overrides`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub history_file: PathBuf,
    pub log_filter: String,
    pub prompt: String,
    pub continuation_prompt: String,
    pub stdlib: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let history_file = lookup("CINDER_HISTORY")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = lookup("HOME").unwrap_or_else(|| ".".into());
                PathBuf::from(home).join(".cinder").join("history.txt")
            });
        Self {
            history_file,
            log_filter: lookup("CINDER_LOG")
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
            prompt: lookup("CINDER_PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.into()),
            continuation_prompt: CONTINUATION_PROMPT.into(),
            stdlib: true,
        }
    }

    /// Apply command-line flags; a flag that was given wins over the environment.
    pub fn with_overrides(
        mut self,
        history: Option<PathBuf>,
        log: Option<String>,
        no_stdlib: bool,
    ) -> Self {
        if let Some(path) = history {
            self.history_file = path;
        }
        if let Some(filter) = log {
            self.log_filter = filter;
        }
        if no_stdlib {
            self.stdlib = false;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/ada")]));
        assert_eq!(
            config.history_file,
            PathBuf::from("/home/ada/.cinder/history.txt")
        );
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.prompt, ">>> ");
        assert_eq!(config.continuation_prompt, "... ");
        assert!(config.stdlib);
    }

    #[test]
    fn test_env_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("CINDER_HISTORY", "/tmp/h.txt"),
            ("CINDER_LOG", "cinder_eval=trace"),
            ("CINDER_PROMPT", "λ "),
        ]));
        assert_eq!(config.history_file, PathBuf::from("/tmp/h.txt"));
        assert_eq!(config.log_filter, "cinder_eval=trace");
        assert_eq!(config.prompt, "λ ");
    }

    #[test]
    fn test_empty_vars_fall_back() {
        let config = Config::from_lookup(lookup_from(&[("CINDER_LOG", ""), ("CINDER_HISTORY", "")]));
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.history_file, PathBuf::from("./.cinder/history.txt"));
    }

    #[test]
    fn test_flags_override_env() {
        let config = Config::from_lookup(lookup_from(&[("CINDER_LOG", "debug")])).with_overrides(
            Some(PathBuf::from("hist")),
            Some("trace".into()),
            true,
        );
        assert_eq!(config.history_file, PathBuf::from("hist"));
        assert_eq!(config.log_filter, "trace");
        assert!(!config.stdlib);

        let untouched = Config::default().with_overrides(None, None, false);
        assert_eq!(untouched, Config::default());
    }
}
