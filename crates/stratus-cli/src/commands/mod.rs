//! CLI command implementations.

pub mod commits;
pub mod deployments;
pub mod pipelines;
pub mod projects;
pub mod repositories;
pub mod work_requests;

use anyhow::{Context as _, Result, anyhow, bail};
use clap::Args;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::time::Duration;
use stratus_client::{
    ActionOutcome, ApiResponse, CompositeOperations, CompositeResult, HttpClient, RequestOptions,
};
use stratus_config::{default_config_path, load_config};
use stratus_core::Model;
use stratus_waiter::{TargetStates, WaiterConfig};
use tracing::debug;
use url::Url;

/// Global connection flags, resolved lazily so `validate-config` needs no profile.
pub struct Connection {
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub endpoint: Option<Url>,
    pub auth_token: Option<String>,
}

impl Connection {
    pub fn context(&self) -> Result<Context> {
        let path = self.config.clone().or_else(default_config_path);

        let file = match &path {
            Some(path) if path.exists() => Some(
                load_config(path)
                    .with_context(|| format!("failed to load {}", path.display()))?,
            ),
            _ => None,
        };

        let (client, waiter) = match file {
            Some(file) => {
                let mut profile = file.select(self.profile.as_deref())?.clone();
                debug!(profile = %profile.name, "Using profile");
                if let Some(endpoint) = &self.endpoint {
                    profile.endpoint = endpoint.clone();
                }
                if let Some(token) = &self.auth_token {
                    profile.auth_token_env = None;
                    profile.auth_token = Some(token.clone());
                }
                (HttpClient::from_profile(&profile)?, profile.waiter)
            }
            None => {
                let Some(endpoint) = self.endpoint.clone() else {
                    bail!(
                        "no config file found at {} and no --endpoint given",
                        path.map(|p| p.display().to_string())
                            .unwrap_or_else(|| "~/.stratus/config.kdl".into())
                    );
                };
                let client = HttpClient::new(
                    endpoint,
                    self.auth_token.clone(),
                    stratus_config::profile::DEFAULT_TIMEOUT,
                )?;
                (client, WaiterConfig::default())
            }
        };

        Ok(Context {
            ops: CompositeOperations::new(client),
            waiter,
        })
    }
}

pub struct Context {
    pub ops: CompositeOperations<HttpClient>,
    pub waiter: WaiterConfig,
}

impl Context {
    pub fn client(&self) -> &HttpClient {
        self.ops.client()
    }
}

/// Flags shared by every mutating command.
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Lifecycle state to wait for (repeatable, case-insensitive)
    #[arg(long = "wait-for", value_name = "STATE")]
    pub wait_for: Vec<String>,

    /// Give up waiting after this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_wait_seconds: Option<u64>,

    /// Pause before the second poll
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub initial_interval_seconds: Option<u64>,

    /// Longest pause between polls
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_interval_seconds: Option<u64>,

    /// Idempotency token for the request
    #[arg(long)]
    pub retry_token: Option<String>,

    /// Only act if the resource's ETag matches
    #[arg(long)]
    pub if_match: Option<String>,
}

impl WaitArgs {
    pub fn targets(&self) -> TargetStates {
        TargetStates::new(self.wait_for.iter().map(String::as_str))
    }

    pub fn waiter(&self, base: WaiterConfig) -> WaiterConfig {
        let mut config = base;
        if let Some(secs) = self.max_wait_seconds {
            config = config.with_max_wait(Duration::from_secs(secs));
        }
        if let Some(secs) = self.initial_interval_seconds {
            config = config.with_initial_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = self.max_interval_seconds {
            config = config.with_max_interval(Duration::from_secs(secs));
        }
        config
    }

    pub fn options(&self) -> RequestOptions {
        let mut opts = RequestOptions::default();
        if let Some(token) = &self.retry_token {
            opts = opts.with_retry_token(token.clone());
        }
        if let Some(etag) = &self.if_match {
            opts = opts.with_if_match(etag.clone());
        }
        opts
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_model<T: Model>(model: &T) -> Result<()> {
    print_json(&model.to_value()?)
}

fn headers_json<T>(response: &ApiResponse<T>) -> Value {
    json!({
        "status": response.headers.status,
        "opcRequestId": response.headers.opc_request_id,
        "opcWorkRequestId": response.headers.opc_work_request_id,
        "etag": response.headers.etag,
    })
}

/// A response body plus the headers callers usually want.
pub fn response_json<T: Model>(response: &ApiResponse<T>) -> stratus_core::Result<Value> {
    Ok(json!({
        "data": response.data.to_value()?,
        "headers": headers_json(response),
    }))
}

pub fn empty_response_json(response: &ApiResponse<()>) -> stratus_core::Result<Value> {
    Ok(json!({ "headers": headers_json(response) }))
}

/// Print the outcome of an action-and-wait call. On a waiting failure the
/// action's own response is still printed before the error is returned.
pub fn report<I, P, F>(result: CompositeResult<I, P>, issued: F) -> Result<()>
where
    P: Model,
    F: Fn(&I) -> stratus_core::Result<Value>,
{
    match result {
        Ok(ActionOutcome::Issued(response)) => {
            print_json(&json!({ "outcome": "issued", "response": issued(&response)? }))
        }
        Ok(ActionOutcome::Reached(resource)) => {
            print_json(&json!({ "outcome": "reached", "resource": resource.to_value()? }))
        }
        Ok(ActionOutcome::Gone) => print_json(&json!({ "outcome": "gone" })),
        Err(err) => {
            if let Some(partial) = err.partial() {
                print_json(&json!({ "outcome": "failed", "response": issued(partial)? }))?;
            }
            Err(anyhow!("{}", err))
        }
    }
}

pub fn validate_config(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(default_config_path)
        .context("no config path given and HOME is not set")?;
    match load_config(&path) {
        Ok(file) => {
            println!("Configuration is valid");
            for profile in &file.profiles {
                let marker = if file.default_profile.as_deref() == Some(profile.name.as_str()) {
                    " (default)"
                } else {
                    ""
                };
                println!("  {}{}: {}", profile.name, marker, profile.endpoint);
            }
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse `KEY=VALUE`.
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("IMAGE=app:1.2").unwrap(),
            ("IMAGE".to_string(), "app:1.2".to_string())
        );
        assert_eq!(
            parse_key_val("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_wait_args_override_waiter() {
        let args = WaitArgs {
            wait_for: vec!["active".into(), "ACTIVE".into(), "failed".into()],
            max_wait_seconds: Some(30),
            ..Default::default()
        };
        let config = args.waiter(WaiterConfig::default());
        assert_eq!(config.max_wait, Duration::from_secs(30));
        assert_eq!(config.max_interval, WaiterConfig::DEFAULT_MAX_INTERVAL);
        assert_eq!(args.targets().to_string(), "ACTIVE|FAILED");
    }

    #[derive(clap::Parser)]
    struct WaitCli {
        #[command(flatten)]
        wait: WaitArgs,
    }

    #[test]
    fn test_wait_flags_reject_zero_seconds() {
        use clap::Parser;

        for flag in [
            "--max-wait-seconds",
            "--initial-interval-seconds",
            "--max-interval-seconds",
        ] {
            assert!(WaitCli::try_parse_from(["stratus", flag, "0"]).is_err(), "{flag}");
        }

        let cli = WaitCli::try_parse_from([
            "stratus",
            "--initial-interval-seconds",
            "2",
            "--max-interval-seconds",
            "8",
        ])
        .unwrap();
        let config = cli.wait.waiter(WaiterConfig::default());
        assert_eq!(config.initial_interval, Duration::from_secs(2));
        assert_eq!(config.max_interval, Duration::from_secs(8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_without_config_needs_endpoint() {
        let connection = Connection {
            config: Some(PathBuf::from("/nonexistent/stratus.kdl")),
            profile: None,
            endpoint: None,
            auth_token: None,
        };
        let err = connection.context().err().unwrap();
        assert!(err.to_string().contains("--endpoint"));

        let connection = Connection {
            endpoint: Some(Url::parse("http://localhost:8080/20210630").unwrap()),
            ..connection
        };
        let ctx = connection.context().unwrap();
        assert_eq!(ctx.client().endpoint().as_str(), "http://localhost:8080/20210630");
    }
}
