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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::ValueEmpty;
use tf_provider::{
    map, AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider,
};

use crate::config::{
    ProviderConfig, ProviderData, Settings, ENV_ENABLE_BETA, ENV_IAAS_ENDPOINT,
    ENV_MODELSERVING_ENDPOINT, ENV_REGION, ENV_SERVICE_ACCOUNT_TOKEN,
};
use crate::network_interface::{NetworkInterfaceDataSource, NetworkInterfaceResource};
use crate::route::{RouteDataSource, RouteResource};
use crate::token::TokenResource;
use crate::utils::{report_error, validate_no_separator};

#[derive(Debug, Default, Clone)]
pub struct StackitProvider {
    data: Arc<ProviderData>,
}

impl StackitProvider {
    /// Interrupts the waits of every resource handed out by this provider
    pub fn shutdown_token(&self) -> CancellationToken {
        self.data.shutdown_token()
    }
}

#[async_trait]
impl Provider for StackitProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        let string = |constraint, sensitive, description: String| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint,
            sensitive,
            ..Default::default()
        };
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain("STACKIT provider"),
                attributes: map! {
                    "service_account_token" => string(
                        AttributeConstraint::Optional,
                        true,
                        format!("Token used for authentication. Defaults to {ENV_SERVICE_ACCOUNT_TOKEN}."),
                    ),
                    "default_region" => string(
                        AttributeConstraint::Optional,
                        false,
                        format!("Region used by regional resources that do not set one. Defaults to {ENV_REGION}, then `eu01`."),
                    ),
                    "iaas_custom_endpoint" => string(
                        AttributeConstraint::Optional,
                        false,
                        format!("Custom endpoint for the IaaS service. Defaults to {ENV_IAAS_ENDPOINT}."),
                    ),
                    "modelserving_custom_endpoint" => string(
                        AttributeConstraint::Optional,
                        false,
                        format!("Custom endpoint for the AI Model Serving service. Defaults to {ENV_MODELSERVING_ENDPOINT}."),
                    ),
                    "enable_beta_resources" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain(format!(
                            "Enable beta resources. Defaults to {ENV_ENABLE_BETA}."
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        validate_no_separator(diags, &config.default_region, "default_region");
        for (name, endpoint) in [
            ("iaas_custom_endpoint", &config.iaas_custom_endpoint),
            ("modelserving_custom_endpoint", &config.modelserving_custom_endpoint),
        ] {
            if let Some(url) = endpoint.as_deref_option() {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    diags.error(
                        "Invalid endpoint",
                        format!("`{name}` must be an absolute http(s) URL, got {url:?}"),
                        AttributePath::new(name),
                    );
                }
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        tracing::debug!(%terraform_version, "configuring provider");

        let settings = match Settings::resolve(&config, |name| std::env::var(name).ok()) {
            Ok(settings) => settings,
            Err(err) => {
                report_error(diags, "Invalid provider configuration", err);
                return None;
            }
        };
        if let Err(err) = self.data.configure(settings).await {
            report_error(diags, "Cannot build the API client", err);
            return None;
        }

        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {
            "routing_table_route" => RouteResource::new(self.data.clone()),
            "modelserving_token" => TokenResource::new(self.data.clone()),
            "network_interface" => NetworkInterfaceResource::new(self.data.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "routing_table_route" => RouteDataSource::new(self.data.clone()),
            "network_interface" => NetworkInterfaceDataSource::new(self.data.clone()),
        })
    }
}
