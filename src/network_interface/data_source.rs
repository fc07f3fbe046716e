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

use std::sync::Arc;

use async_trait::async_trait;

use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{DataSource, Diagnostics};

use crate::config::ProviderData;
use crate::utils::{report_error, OrReport, WithResponse, WithValidate};

use super::state::{data_source_schema, NetworkInterfaceState};

#[derive(Debug, Clone)]
pub struct NetworkInterfaceDataSource {
    provider: Arc<ProviderData>,
}

impl NetworkInterfaceDataSource {
    pub fn new(provider: Arc<ProviderData>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DataSource for NetworkInterfaceDataSource {
    type State<'a> = NetworkInterfaceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(data_source_schema())
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
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        const SUMMARY: &str = "Error reading network interface";
        let configured = self.provider.get(diags).await?;
        let mut state = config;

        let nic = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let network_id = state.network_id().or_report(diags, SUMMARY)?;
            let nic_id = state.network_interface_id().or_report(diags, SUMMARY)?;
            configured
                .client
                .get_network_interface(project_id, network_id, nic_id)
                .await
        };
        let nic = match nic {
            Ok(nic) => nic,
            Err(err) if err.is_not_found() => {
                report_error(diags, "Network interface not found", err);
                return None;
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        };

        state.map_fields(Some(&nic)).or_report(diags, SUMMARY)?;
        tracing::info!(id = state.id.as_deref_option(), "network interface read");

        Some(state)
    }
}
