//! Shell configuration from environment variables.

use stockbook_observability::LogFormat;
use stockbook_products::CodePolicy;

pub const LOG_FORMAT_VAR: &str = "STOCKBOOK_LOG_FORMAT";
pub const CODE_POLICY_VAR: &str = "STOCKBOOK_CODE_POLICY";
pub const PROMPT_VAR: &str = "STOCKBOOK_PROMPT";

pub const DEFAULT_PROMPT: &str = "stockbook> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub log_format: LogFormat,
    pub code_policy: CodePolicy,
    pub prompt: String,
    /// Values that were set but could not be used. Logged once tracing is up,
    /// since the log format itself comes from this config.
    pub warnings: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            code_policy: CodePolicy::default(),
            prompt: DEFAULT_PROMPT.to_string(),
            warnings: Vec::new(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset variables keep
    /// their defaults; unparseable ones keep their defaults and add a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            match raw.parse() {
                Ok(format) => config.log_format = format,
                Err(e) => config
                    .warnings
                    .push(format!("{LOG_FORMAT_VAR}: {e}; using {:?}", config.log_format)),
            }
        }

        if let Some(raw) = lookup(CODE_POLICY_VAR) {
            match raw.parse() {
                Ok(policy) => config.code_policy = policy,
                Err(e) => config
                    .warnings
                    .push(format!("{CODE_POLICY_VAR}: {e}; using {:?}", config.code_policy)),
            }
        }

        if let Some(prompt) = lookup(PROMPT_VAR) {
            config.prompt = prompt;
        }

        config
    }
}
