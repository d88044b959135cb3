use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;

pub const READECK_URL: &str = "READECK_URL";
pub const READECK_API_KEY: &str = "READECK_API_KEY";
pub const OMNIVORE_URL: &str = "OMNIVORE_URL";
pub const OMNIVORE_API_KEY: &str = "OMNIVORE_API_KEY";

#[derive(Parser, Debug)]
#[command(name = "readeck-omnivore")]
#[command(about = "Copies marked readeck bookmarks into omnivore", long_about = None)]
pub struct Cli {
    /// YAML config file. Falls back to READECK_* / OMNIVORE_* env vars when absent.
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Treat an omnivore SaveError result as a failed item.
    #[arg(long)]
    pub strict: bool,

    /// Build payloads and log them without calling omnivore.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Endpoint {
    url: String,
    api_key: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Endpoint {
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Base url without a trailing slash, ready for path joins.
    pub fn get_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn get_api_key(&self) -> &str {
        &self.api_key
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub readeck: Endpoint,
    pub omnivore: Endpoint,
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("environment variable {} is not set", key),
            }
        };

        Ok(Config {
            readeck: Endpoint::new(require(READECK_URL)?, require(READECK_API_KEY)?),
            omnivore: Endpoint::new(require(OMNIVORE_URL)?, require(OMNIVORE_API_KEY)?),
            strict: false,
        })
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)
            .with_context(|| format!("failed to parse {}", path))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("readeck.url", &self.readeck.url),
            ("readeck.api_key", &self.readeck.api_key),
            ("omnivore.url", &self.omnivore.url),
            ("omnivore.api_key", &self.omnivore.api_key),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                bail!("config field {} is empty", name);
            }
        }
        Ok(())
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!("environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
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
    fn from_lookup_reads_all_four_variables() {
        let cfg = Config::from_lookup(lookup_from(&[
            (READECK_URL, "https://readeck.local/"),
            (READECK_API_KEY, "rd-token"),
            (OMNIVORE_URL, "https://omnivore.local"),
            (OMNIVORE_API_KEY, "om-key"),
        ]))
        .unwrap();

        assert_eq!(cfg.readeck.get_url(), "https://readeck.local");
        assert_eq!(cfg.readeck.get_api_key(), "rd-token");
        assert_eq!(cfg.omnivore.get_url(), "https://omnivore.local");
        assert_eq!(cfg.omnivore.get_api_key(), "om-key");
        assert!(!cfg.strict);
    }

    #[test]
    fn from_lookup_names_the_missing_variable() {
        let err = Config::from_lookup(lookup_from(&[
            (READECK_URL, "https://readeck.local"),
            (READECK_API_KEY, "rd-token"),
            (OMNIVORE_URL, "https://omnivore.local"),
            (OMNIVORE_API_KEY, "  "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(OMNIVORE_API_KEY));
    }

    #[test]
    fn substitute_uses_defaults_for_unset_vars() {
        let out = Config::substitute_env_vars(
            "url: ${READECK_OMNIVORE_TEST_UNSET_VAR:-https://fallback.local}\n",
        )
        .unwrap();
        assert_eq!(out, "url: https://fallback.local\n");
    }

    #[test]
    fn new_loads_yaml_and_rejects_empty_fields() {
        let dir = env::temp_dir();

        let good = dir.join(format!("readeck-omnivore-good-{}.yaml", std::process::id()));
        fs::write(
            &good,
            "readeck:\n  url: https://readeck.local\n  api_key: rd\nomnivore:\n  url: https://omnivore.local\n  api_key: om\nstrict: true\n",
        )
        .unwrap();
        let cfg = Config::new(good.to_str().unwrap()).unwrap();
        assert!(cfg.strict);
        assert_eq!(cfg.omnivore.get_api_key(), "om");

        let bad = dir.join(format!("readeck-omnivore-bad-{}.yaml", std::process::id()));
        fs::write(
            &bad,
            "readeck:\n  url: https://readeck.local\n  api_key: ''\nomnivore:\n  url: https://omnivore.local\n  api_key: om\n",
        )
        .unwrap();
        let err = Config::new(bad.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("readeck.api_key"));

        let _ = fs::remove_file(good);
        let _ = fs::remove_file(bad);
    }
}
