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
use std::sync::Arc;

use async_trait::async_trait;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::schema::Schema;
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::config::ProviderData;
use crate::id::parse_id;
use crate::utils::{report_error, OrReport, WithResponse, WithSchema, WithValidate};

use super::state::NetworkInterfaceState;
use super::ID_FIELDS;

#[derive(Debug, Clone)]
pub struct NetworkInterfaceResource {
    provider: Arc<ProviderData>,
}

impl NetworkInterfaceResource {
    pub fn new(provider: Arc<ProviderData>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Resource for NetworkInterfaceResource {
    type State<'a> = NetworkInterfaceState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(NetworkInterfaceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        const SUMMARY: &str = "Error reading network interface";
        let configured = self.provider.get(diags).await?;
        let mut state = state;

        let response = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let network_id = state.network_id().or_report(diags, SUMMARY)?;
            let nic_id = state.network_interface_id().or_report(diags, SUMMARY)?;
            configured
                .client
                .get_network_interface(project_id, network_id, nic_id)
                .await
        };
        let nic = match response {
            Ok(nic) => nic,
            Err(err) if err.is_not_found() => {
                tracing::info!(
                    id = state.id.as_deref_option(),
                    "network interface not found, removing it from state"
                );
                return None;
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        };

        state.map_fields(Some(&nic)).or_report(diags, SUMMARY)?;
        tracing::info!(id = state.id.as_deref_option(), "network interface read");

        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = Value::Unknown;
        state.network_interface_id = Value::Unknown;
        state.device = Value::Unknown;
        state.mac = Value::Unknown;
        state.kind = Value::Unknown;
        if state.ipv4.is_null() {
            state.ipv4 = Value::Unknown;
        }
        if state.security.is_null() {
            state.security = Value::Unknown;
        }

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut state = proposed_state;
        let mut trigger_replace = Vec::new();

        for (name, prior, proposed) in [
            ("project_id", &prior_state.project_id, &state.project_id),
            ("network_id", &prior_state.network_id, &state.network_id),
            ("ipv4", &prior_state.ipv4, &state.ipv4),
        ] {
            if prior != proposed {
                trigger_replace.push(AttributePath::new(name));
            }
        }

        if !trigger_replace.is_empty() {
            state.id = Value::Unknown;
            state.network_interface_id = Value::Unknown;
            state.device = Value::Unknown;
            state.mac = Value::Unknown;
            state.kind = Value::Unknown;
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        const SUMMARY: &str = "Error creating network interface";
        let configured = self.provider.get(diags).await?;

        let mut state = planned_state;
        let payload = state.to_create_payload();
        let nic = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let network_id = state.network_id().or_report(diags, SUMMARY)?;
            configured
                .client
                .create_network_interface(project_id, network_id, &payload)
                .await
        }
        .or_report(diags, SUMMARY)?;

        if let Err(err) = state.map_fields(Some(&nic)) {
            report_error(diags, SUMMARY, format!("Processing API payload: {err:#}"));
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "network interface created");

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        const SUMMARY: &str = "Error updating network interface";
        let configured = self.provider.get(diags).await?;

        let mut state = planned_state;
        let payload = state.to_update_payload(&prior_state);
        let nic = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let network_id = state.network_id().or_report(diags, SUMMARY)?;
            let nic_id = state.network_interface_id().or_report(diags, SUMMARY)?;
            configured
                .client
                .update_network_interface(project_id, network_id, nic_id, &payload)
                .await
        }
        .or_report(diags, SUMMARY)?;

        if let Err(err) = state.map_fields(Some(&nic)) {
            report_error(diags, SUMMARY, format!("Processing API payload: {err:#}"));
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "network interface updated");

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        const SUMMARY: &str = "Error deleting network interface";
        let configured = self.provider.get(diags).await?;

        let project_id = state.project_id().or_report(diags, SUMMARY)?;
        let network_id = state.network_id().or_report(diags, SUMMARY)?;
        let nic_id = state.network_interface_id().or_report(diags, SUMMARY)?;
        match configured
            .client
            .delete_network_interface(project_id, network_id, nic_id)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::warn!(nic_id, "network interface already deleted");
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        }
        tracing::info!(id = state.id.as_deref_option(), "network interface deleted");

        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let [project_id, network_id, nic_id] =
            parse_id(&id, ID_FIELDS).or_report(diags, "Error importing network interface")?;
        let owned = |part: &str| Value::Value(Cow::Owned(part.to_owned()));

        let state = NetworkInterfaceState {
            project_id: owned(project_id),
            network_id: owned(network_id),
            network_interface_id: owned(nic_id),
            id: owned(&id),
            ..Default::default()
        };
        tracing::info!(%id, "network interface state imported");

        Some((state, Default::default()))
    }
}
