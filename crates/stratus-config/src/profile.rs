//! Profile file parsing.
//!
//! ```kdl
//! default-profile "prod"
//!
//! profile "prod" {
//!     endpoint "https://devops.${region}.example.com/20210630"
//!     region "us-ashburn-1"
//!     auth-token-env "STRATUS_TOKEN"
//!     timeout-seconds 60
//!     waiter initial-interval-seconds=1 max-interval-seconds=30 max-wait-seconds=1200
//! }
//! ```

use crate::{ConfigError, ConfigResult, Variables};
use kdl::{KdlDocument, KdlNode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stratus_waiter::WaiterConfig;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for one service endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub endpoint: Url,
    pub region: Option<String>,
    /// Environment variable holding the bearer token.
    pub auth_token_env: Option<String>,
    /// Inline token. Prefer `auth_token_env`.
    pub auth_token: Option<String>,
    pub timeout: Duration,
    pub waiter: WaiterConfig,
}

impl Profile {
    /// Resolve the bearer token from the profile or the process environment.
    pub fn auth_token(&self) -> ConfigResult<Option<String>> {
        self.auth_token_from(|name| std::env::var(name).ok())
    }

    pub fn auth_token_from<F>(&self, lookup: F) -> ConfigResult<Option<String>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(var) = &self.auth_token_env {
            return lookup(var)
                .filter(|token| !token.is_empty())
                .map(Some)
                .ok_or_else(|| ConfigError::MissingEnv(var.clone()));
        }
        Ok(self.auth_token.clone())
    }
}

/// All profiles in a config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub default_profile: Option<String>,
    pub profiles: Vec<Profile>,
}

impl ConfigFile {
    pub fn profile(&self, name: &str) -> ConfigResult<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// The named profile, else the file's `default-profile`, else `default`.
    pub fn select(&self, name: Option<&str>) -> ConfigResult<&Profile> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profile(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }
}

/// `$HOME/.stratus/config.kdl`.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".stratus").join("config.kdl"))
}

pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ConfigFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading config");
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Parse a config file, interpolating `${env.*}` from the process environment.
pub fn parse_config(kdl: &str) -> ConfigResult<ConfigFile> {
    parse_config_with(kdl, &Variables::from_env())
}

pub fn parse_config_with(kdl: &str, vars: &Variables) -> ConfigResult<ConfigFile> {
    let doc: KdlDocument = kdl.parse()?;

    let mut config = ConfigFile::default();
    for node in doc.nodes() {
        match node.name().value() {
            "default-profile" => {
                config.default_profile = Some(
                    get_first_string_arg(node)
                        .ok_or_else(|| ConfigError::MissingField("default-profile name".to_string()))?,
                );
            }
            "profile" => {
                let profile = parse_profile(node, vars.clone())?;
                if config.profiles.iter().any(|p| p.name == profile.name) {
                    return Err(ConfigError::Duplicate(profile.name));
                }
                config.profiles.push(profile);
            }
            _ => {}
        }
    }

    if let Some(default) = &config.default_profile {
        if !config.profiles.iter().any(|p| &p.name == default) {
            return Err(ConfigError::InvalidValue {
                field: "default-profile".to_string(),
                message: format!("no profile named '{}'", default),
            });
        }
    }

    Ok(config)
}

fn parse_profile(node: &KdlNode, mut vars: Variables) -> ConfigResult<Profile> {
    let name = get_first_string_arg(node)
        .ok_or_else(|| ConfigError::MissingField("profile name".to_string()))?;
    vars.set("profile", name.clone());

    let mut endpoint = None;
    let mut region = None;
    let mut auth_token_env = None;
    let mut auth_token = None;
    let mut timeout = DEFAULT_TIMEOUT;
    let mut waiter = WaiterConfig::default();

    if let Some(children) = node.children() {
        // Region first so `${region}` resolves wherever it appears.
        if let Some(r) = children
            .nodes()
            .iter()
            .find(|c| c.name().value() == "region")
            .and_then(get_first_string_arg)
        {
            let r = vars.interpolate(&r);
            vars.set("region", r.clone());
            region = Some(r);
        }

        for child in children.nodes() {
            let field = child.name().value();
            match field {
                "endpoint" => {
                    let raw = get_first_string_arg(child)
                        .ok_or_else(|| missing(&name, "endpoint"))?;
                    endpoint = Some(parse_endpoint(&name, &vars.interpolate(&raw))?);
                }
                "auth-token-env" => {
                    auth_token_env = get_first_string_arg(child).map(|v| vars.interpolate(&v));
                }
                "auth-token" => {
                    auth_token = get_first_string_arg(child).map(|v| vars.interpolate(&v));
                }
                "timeout-seconds" => {
                    let secs = get_first_int_arg(child).ok_or_else(|| invalid(&name, field, "expected an integer"))?;
                    timeout = positive_secs(&name, field, secs)?;
                }
                "waiter" => {
                    waiter = parse_waiter(&name, child)?;
                }
                _ => {}
            }
        }
    }

    let endpoint = endpoint.ok_or_else(|| missing(&name, "endpoint"))?;

    Ok(Profile {
        name,
        endpoint,
        region,
        auth_token_env,
        auth_token,
        timeout,
        waiter,
    })
}

fn parse_waiter(profile: &str, node: &KdlNode) -> ConfigResult<WaiterConfig> {
    let mut waiter = WaiterConfig::default();
    if let Some(secs) = get_int_prop(node, "initial-interval-seconds") {
        waiter.initial_interval = positive_secs(profile, "initial-interval-seconds", secs)?;
    }
    if let Some(secs) = get_int_prop(node, "max-interval-seconds") {
        waiter.max_interval = positive_secs(profile, "max-interval-seconds", secs)?;
    }
    if let Some(secs) = get_int_prop(node, "max-wait-seconds") {
        waiter.max_wait = positive_secs(profile, "max-wait-seconds", secs)?;
    }
    if waiter.initial_interval > waiter.max_interval {
        return Err(invalid(
            profile,
            "waiter",
            "initial-interval-seconds exceeds max-interval-seconds",
        ));
    }
    Ok(waiter)
}

fn parse_endpoint(profile: &str, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw).map_err(|e| invalid(profile, "endpoint", &e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(
            profile,
            "endpoint",
            &format!("unsupported scheme '{}'", other),
        )),
    }
}

fn positive_secs(profile: &str, field: &str, secs: i128) -> ConfigResult<Duration> {
    u64::try_from(secs)
        .ok()
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| invalid(profile, field, "must be a positive number of seconds"))
}

fn missing(profile: &str, field: &str) -> ConfigError {
    ConfigError::MissingField(format!("{} for profile '{}'", field, profile))
}

fn invalid(profile: &str, field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: format!("{}.{}", profile, field),
        message: message.to_string(),
    }
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_int_arg(node: &KdlNode) -> Option<i128> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
}

fn get_int_prop(node: &KdlNode, name: &str) -> Option<i128> {
    node.get(name).and_then(|v| v.as_integer())
}
