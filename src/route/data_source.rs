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

use super::state::{data_source_schema, RouteState};
use super::TYPE_NAME;

#[derive(Debug, Clone)]
pub struct RouteDataSource {
    provider: Arc<ProviderData>,
}

impl RouteDataSource {
    pub fn new(provider: Arc<ProviderData>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DataSource for RouteDataSource {
    type State<'a> = RouteState<'a>;
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
        const SUMMARY: &str = "Error reading routing table route";
        let configured = self.provider.get_beta(diags, TYPE_NAME).await?;

        let mut state = config;
        state.region = configured.region(&state.region);

        let response = {
            let key = state.key().or_report(diags, SUMMARY)?;
            let route_id = state.route_id().or_report(diags, SUMMARY)?;
            configured.client.get_route(key, route_id).await
        };
        let route = match response {
            Ok(route) => route,
            Err(err) if err.is_not_found() => {
                report_error(diags, "Routing table route not found", err);
                return None;
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        };

        state.map_fields(Some(&route)).or_report(diags, SUMMARY)?;
        tracing::info!(id = state.id.as_deref_option(), "routing table route read");

        Some(state)
    }
}
