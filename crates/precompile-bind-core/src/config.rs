use crate::matcher::MatchPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = ".precompile-bind.toml";

/// Configuration for precompile binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub matching: MatchingOptions,
    #[serde(default)]
    pub binding: BindingOptions,
    pub ignore: Option<IgnoreOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingOptions {
    #[serde(default)]
    pub policy: MatchPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingOptions {
    /// Every ABI method must be bound to a native method
    #[serde(default)]
    pub require_complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreOptions {
    pub methods: Option<Vec<String>>,
}

impl BindingConfig {
    /// Load config from file or use defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        if let Some(path) = config_path {
            let content = fs::read_to_string(path)
                .context(format!("Failed to read config file: {}", path))?;
            toml::from_str(&content).context("Failed to parse config file")
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            let content = fs::read_to_string(DEFAULT_CONFIG_FILE)?;
            toml::from_str(&content).context(format!("Failed to parse {}", DEFAULT_CONFIG_FILE))
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.matching.policy = policy;
        self
    }

    pub fn require_complete(mut self) -> Self {
        self.binding.require_complete = true;
        self
    }

    /// Check if a native method should be skipped
    pub fn should_ignore(&self, method_name: &str) -> bool {
        self.ignore
            .as_ref()
            .and_then(|ignore| ignore.methods.as_ref())
            .map_or(false, |methods| methods.iter().any(|m| m == method_name))
    }

    /// Save config to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BindingConfig::default();
        assert_eq!(config.matching.policy, MatchPolicy::FirstFound);
        assert!(!config.binding.require_complete);
        assert!(!config.should_ignore("ExampleFunc"));
    }

    #[test]
    fn test_parse_toml() {
        let config: BindingConfig = toml::from_str(
            r#"
            [matching]
            policy = "strict"

            [binding]
            require_complete = true

            [ignore]
            methods = ["MockMethod"]
            "#,
        )
        .unwrap();
        assert_eq!(config.matching.policy, MatchPolicy::Strict);
        assert!(config.binding.require_complete);
        assert!(config.should_ignore("MockMethod"));
        assert!(!config.should_ignore("mockMethod"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BindingConfig = toml::from_str("[binding]\nrequire_complete = true\n").unwrap();
        assert_eq!(config.matching.policy, MatchPolicy::FirstFound);
        assert!(config.ignore.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("precompile-bind-{}.toml", std::process::id()));
        let mut config = BindingConfig::default().with_policy(MatchPolicy::Strict);
        config.ignore = Some(IgnoreOptions {
            methods: Some(vec!["MockMethod".to_string()]),
        });
        config.save(&path).unwrap();

        let loaded = BindingConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_builders() {
        let config = BindingConfig::default()
            .with_policy(MatchPolicy::Strict)
            .require_complete();
        assert_eq!(config.matching.policy, MatchPolicy::Strict);
        assert!(config.binding.require_complete);
    }
}
