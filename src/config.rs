// This file is part of the terraform-provider-stackit project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use tf_provider::value::{Value, ValueString};
use tf_provider::Diagnostics;

use crate::api::{ApiClient, ApiError, Endpoints};
use crate::wait::{WaitHandler, DEFAULT_INTERVAL};

pub const DEFAULT_REGION: &str = "eu01";
pub const DEFAULT_IAAS_ENDPOINT: &str = "https://iaas.api.stackit.cloud";
pub const DEFAULT_MODELSERVING_ENDPOINT: &str = "https://model-serving.api.{region}.stackit.cloud";

pub const ENV_SERVICE_ACCOUNT_TOKEN: &str = "STACKIT_SERVICE_ACCOUNT_TOKEN";
pub const ENV_REGION: &str = "STACKIT_REGION";
pub const ENV_IAAS_ENDPOINT: &str = "STACKIT_IAAS_CUSTOM_ENDPOINT";
pub const ENV_MODELSERVING_ENDPOINT: &str = "STACKIT_MODELSERVING_CUSTOM_ENDPOINT";
pub const ENV_ENABLE_BETA: &str = "STACKIT_TF_ENABLE_BETA_RESOURCES";

/// Provider block as written in the Terraform configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub service_account_token: ValueString<'a>,
    pub default_region: ValueString<'a>,
    pub iaas_custom_endpoint: ValueString<'a>,
    pub modelserving_custom_endpoint: ValueString<'a>,
    pub enable_beta_resources: Value<bool>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no service account token configured, set `service_account_token` or {ENV_SERVICE_ACCOUNT_TOKEN}")]
    MissingToken,
    #[error("`{name}` must be an absolute http(s) URL, got {url:?}")]
    InvalidEndpoint { name: &'static str, url: String },
    #[error("{name} must be `true` or `false`, got {value:?}")]
    InvalidBoolean { name: &'static str, value: String },
}

/// Fully resolved provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_account_token: String,
    pub region: String,
    pub endpoints: Endpoints,
    pub enable_beta_resources: bool,
}

fn pick(value: &ValueString<'_>, env: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    value
        .as_deref_option()
        .map(str::to_owned)
        .or_else(|| env(var))
        .filter(|s| !s.is_empty())
}

fn endpoint(name: &'static str, url: Option<String>, default: &str) -> Result<String, ConfigError> {
    let Some(url) = url else {
        return Ok(default.to_owned());
    };
    match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            Ok(url.trim_end_matches('/').to_owned())
        }
        _ => Err(ConfigError::InvalidEndpoint { name, url }),
    }
}

impl Settings {
    /// Merge the provider block with the environment, the block taking precedence
    pub fn resolve(
        config: &ProviderConfig<'_>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let service_account_token =
            pick(&config.service_account_token, &env, ENV_SERVICE_ACCOUNT_TOKEN)
                .ok_or(ConfigError::MissingToken)?;
        let region = pick(&config.default_region, &env, ENV_REGION)
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());
        let endpoints = Endpoints {
            iaas: endpoint(
                "iaas_custom_endpoint",
                pick(&config.iaas_custom_endpoint, &env, ENV_IAAS_ENDPOINT),
                DEFAULT_IAAS_ENDPOINT,
            )?,
            modelserving: endpoint(
                "modelserving_custom_endpoint",
                pick(
                    &config.modelserving_custom_endpoint,
                    &env,
                    ENV_MODELSERVING_ENDPOINT,
                ),
                DEFAULT_MODELSERVING_ENDPOINT,
            )?,
        };
        let enable_beta_resources = match config.enable_beta_resources {
            Value::Value(enabled) => enabled,
            _ => match env(ENV_ENABLE_BETA) {
                None => false,
                Some(value) => match value.to_ascii_lowercase().as_str() {
                    "" | "false" => false,
                    "true" => true,
                    _ => {
                        return Err(ConfigError::InvalidBoolean {
                            name: ENV_ENABLE_BETA,
                            value,
                        })
                    }
                },
            },
        };

        Ok(Self {
            service_account_token,
            region,
            endpoints,
            enable_beta_resources,
        })
    }
}

/// One-time warnings for beta resources
///
/// Lives as long as the provider process: Terraform configures the provider
/// several times per run, but each beta resource type warns only once.
#[derive(Debug, Default)]
pub struct BetaGate {
    warned: Mutex<BTreeSet<&'static str>>,
}

impl BetaGate {
    /// Returns `false` when beta resources are disabled
    pub fn check(&self, diags: &mut Diagnostics, enabled: bool, resource_type: &'static str) -> bool {
        if !enabled {
            diags.root_error(
                format!("`{resource_type}` is a beta resource"),
                format!("Beta resources are disabled. Set `enable_beta_resources = true` in the provider block or {ENV_ENABLE_BETA}=true to use them."),
            );
            return false;
        }
        let mut warned = self.warned.lock().unwrap_or_else(PoisonError::into_inner);
        if warned.insert(resource_type) {
            diags.root_warning(
                format!("`{resource_type}` is a beta resource"),
                "This resource may change in breaking ways in future releases of the provider.",
            );
        }
        true
    }
}

/// Provider configuration as seen by the resources
#[derive(Debug, Clone)]
pub struct Configured {
    pub client: ApiClient,
    pub region: String,
    pub enable_beta_resources: bool,
}

impl Configured {
    /// Region of a resource, falling back to the provider region
    pub fn region<'a>(&self, region: &ValueString<'a>) -> ValueString<'a> {
        match region {
            Value::Value(region) => Value::Value(region.clone()),
            _ => Value::Value(Cow::Owned(self.region.clone())),
        }
    }
}

/// Shared between the provider and every resource it hands out
#[derive(Debug)]
pub struct ProviderData {
    configured: RwLock<Option<Configured>>,
    beta: BetaGate,
    wait_interval: Duration,
    shutdown: CancellationToken,
}

impl Default for ProviderData {
    fn default() -> Self {
        Self {
            configured: Default::default(),
            beta: Default::default(),
            wait_interval: DEFAULT_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }
}

impl ProviderData {
    /// Polling interval of the wait handlers
    pub fn with_wait_interval(mut self, interval: Duration) -> Self {
        self.wait_interval = interval;
        self
    }

    /// Replace the configuration, Terraform calls configure more than once
    pub async fn configure(&self, settings: Settings) -> Result<(), ApiError> {
        let client = ApiClient::new(settings.service_account_token, settings.endpoints)?;
        *self.configured.write().await = Some(Configured {
            client,
            region: settings.region,
            enable_beta_resources: settings.enable_beta_resources,
        });
        Ok(())
    }

    pub async fn get(&self, diags: &mut Diagnostics) -> Option<Configured> {
        let configured = self.configured.read().await.clone();
        if configured.is_none() {
            diags.root_error(
                "Provider not configured",
                "The provider must be configured before managing resources.",
            );
        }
        configured
    }

    pub async fn get_beta(
        &self,
        diags: &mut Diagnostics,
        resource_type: &'static str,
    ) -> Option<Configured> {
        let configured = self.get(diags).await?;
        self.beta
            .check(diags, configured.enable_beta_resources, resource_type)
            .then_some(configured)
    }

    /// Region used when a resource does not set one
    pub async fn default_region(&self) -> Option<String> {
        self.configured
            .read()
            .await
            .as_ref()
            .map(|configured| configured.region.clone())
    }

    /// Cancelling it interrupts every pending wait
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn wait_handler(&self, timeout: Duration) -> WaitHandler {
        WaitHandler::new(timeout)
            .with_interval(self.wait_interval)
            .with_cancellation(self.shutdown.child_token())
    }
}
