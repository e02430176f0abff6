use std::path::PathBuf;
use std::str::FromStr;

/// How verdicts are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One Check_MK local-check line per subaccount.
    #[default]
    Text,
    /// One JSON verdict report per sample.
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("SAPCC_OUTPUT must be 'text' or 'json', got '{other}'"),
        }
    }
}

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckConfig {
    /// JSON override document; without it only the built-in defaults apply.
    pub overrides_file: Option<PathBuf>,
    pub output: OutputFormat,
}

impl CheckConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `SAPCC_OVERRIDES_FILE` | unset   |
    /// | `SAPCC_OUTPUT`         | `text`  |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides_file = lookup("SAPCC_OVERRIDES_FILE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let output = match lookup("SAPCC_OUTPUT") {
            Some(v) => v.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            overrides_file,
            output,
        })
    }
}
