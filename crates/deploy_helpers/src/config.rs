use alloy_primitives::Address;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file looked up in the working directory when `DEPLOY_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "deploy-config.yaml";
/// Environment variable holding an explicit config file path
pub const CONFIG_PATH_ENV: &str = "DEPLOY_CONFIG";

static ENV_VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
});

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read config file {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse config: {source}"))]
    Parse { source: serde_yaml::Error },
    #[snafu(display("Failed to load dotenv file {}: {source}", path.display()))]
    Dotenv {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[snafu(display("Environment variable {name} referenced in config is not set"))]
    MissingEnvVar { name: String },
    #[snafu(display("No address configured for {contract} on network {network}"))]
    MissingAddress { network: String, contract: String },
    #[snafu(display("Invalid address for {contract} on network {network}: {message}"))]
    InvalidAddress {
        network: String,
        contract: String,
        message: String,
    },
}

/// Project level deployment configuration.
///
/// ```yaml
/// dotenv: .env
/// wallets:
///   from_key: ${PRIVATE_KEY}
/// environments:
///   local: [development, ganache-local]
///   forked: [mainnet-fork, mainnet-fork-dev]
/// networks:
///   default: development
///   rinkeby:
///     eth_usd_price_feed: "0x8A753747A1Fa494EC906cE90E9f37563A8AF630e"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployConfig {
    /// Dotenv file loaded before `${VAR}` references are expanded
    #[serde(default)]
    pub dotenv: Option<PathBuf>,
    #[serde(default)]
    pub wallets: WalletsConfig,
    #[serde(default)]
    pub environments: EnvironmentsConfig,
    #[serde(default)]
    pub networks: NetworksConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletsConfig {
    /// Private key used to sign on live networks
    #[serde(default)]
    pub from_key: Option<String>,
}

/// Network names that are simulated locally rather than live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentsConfig {
    #[serde(default = "default_local_environments")]
    pub local: Vec<String>,
    #[serde(default = "default_forked_environments")]
    pub forked: Vec<String>,
}

impl Default for EnvironmentsConfig {
    fn default() -> Self {
        Self {
            local: default_local_environments(),
            forked: default_forked_environments(),
        }
    }
}

fn default_local_environments() -> Vec<String> {
    vec!["development".to_string(), "ganache-local".to_string()]
}

fn default_forked_environments() -> Vec<String> {
    vec!["mainnet-fork".to_string(), "mainnet-fork-dev".to_string()]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworksConfig {
    /// Network scripts connect to when none is chosen explicitly
    #[serde(default)]
    pub default: Option<String>,
    #[serde(flatten)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// Per network settings: dependency addresses plus any other keys scripts read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    #[serde(flatten)]
    pub entries: BTreeMap<String, serde_yaml::Value>,
}

impl NetworkConfig {
    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.entries.get(key)
    }
}

impl DeployConfig {
    /// Load config from `DEPLOY_CONFIG`, then `deploy-config.yaml`, falling back to defaults.
    pub fn from_environment() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::load(Path::new(&path));
        }

        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No {DEFAULT_CONFIG_FILE} found, using default local-only config");
            Ok(Self::default())
        }
    }

    /// Load config from a YAML file.
    ///
    /// A relative `dotenv` path resolves against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).context(IoSnafu { path })?;
        Self::from_yaml_str(&contents, path.parent())
    }

    pub fn from_yaml_str(contents: &str, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut raw: serde_yaml::Value = serde_yaml::from_str(contents).context(ParseSnafu)?;

        if let Some(dotenv) = raw.get("dotenv").and_then(|v| v.as_str()) {
            let dotenv_path = match base_dir {
                Some(dir) => dir.join(dotenv),
                None => PathBuf::from(dotenv),
            };
            load_dotenv(&dotenv_path)?;
        }

        expand_env_vars(&mut raw)?;
        serde_yaml::from_value(raw).context(ParseSnafu)
    }

    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.networks.get(name)
    }

    pub fn default_network(&self) -> Option<&str> {
        self.networks.default.as_deref()
    }

    /// Address configured for a dependency on a network.
    pub fn contract_address(&self, network: &str, contract: &str) -> Result<Address, ConfigError> {
        let value = self
            .network(network)
            .and_then(|n| n.get(contract))
            .ok_or_else(|| ConfigError::MissingAddress {
                network: network.to_string(),
                contract: contract.to_string(),
            })?;

        let invalid = |message: String| ConfigError::InvalidAddress {
            network: network.to_string(),
            contract: contract.to_string(),
            message,
        };

        let text = value
            .as_str()
            .ok_or_else(|| invalid(format!("expected a hex string, found {value:?}")))?;
        Address::from_str(text.trim()).map_err(|e| invalid(e.to_string()))
    }
}

fn load_dotenv(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded dotenv file {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => {
            debug!("Dotenv file {} not found, skipping", path.display());
            Ok(())
        }
        Err(source) => Err(ConfigError::Dotenv {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace `${VAR}` references in every string value with the variable's value.
fn expand_env_vars(value: &mut serde_yaml::Value) -> Result<(), ConfigError> {
    match value {
        serde_yaml::Value::String(s) => {
            if let Some(expanded) = expand_str(s)? {
                *s = expanded;
            }
        }
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                expand_env_vars(item)?;
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for item in map.values_mut() {
                expand_env_vars(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn expand_str(s: &str) -> Result<Option<String>, ConfigError> {
    if !ENV_VAR_PATTERN.is_match(s) {
        return Ok(None);
    }

    let mut expanded = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let value = env::var(name).map_err(|_| ConfigError::MissingEnvVar {
            name: name.to_string(),
        })?;
        expanded.push_str(&s[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }
    expanded.push_str(&s[last..]);
    Ok(Some(expanded))
}
