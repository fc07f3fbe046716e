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

use crate::api::modelserving::{
    wait_token_active, wait_token_deleted, CREATE_TIMEOUT, DELETE_TIMEOUT, STATE_INACTIVE,
    UPDATE_TIMEOUT,
};
use crate::config::ProviderData;
use crate::id::parse_id;
use crate::utils::{report_error, OrReport, WithResponse, WithSchema, WithValidate};

use super::state::TokenState;
use super::ID_FIELDS;

#[derive(Debug, Clone)]
pub struct TokenResource {
    provider: Arc<ProviderData>,
}

impl TokenResource {
    pub fn new(provider: Arc<ProviderData>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Resource for TokenResource {
    type State<'a> = TokenState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(TokenState::schema())
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
        const SUMMARY: &str = "Error reading AI model serving auth token";
        let configured = self.provider.get(diags).await?;

        let mut state = state;
        state.region = configured.region(&state.region);

        let response = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let region = state.region().or_report(diags, SUMMARY)?;
            let token_id = state.token_id().or_report(diags, SUMMARY)?;
            configured
                .client
                .get_token(project_id, region, token_id)
                .await
        };
        let token = match response {
            Ok(response) => response.token,
            Err(err) if err.is_not_found() => {
                tracing::info!(
                    id = state.id.as_deref_option(),
                    "AI model serving auth token not found, removing it from state"
                );
                return None;
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        };

        if let Some(token) = &token {
            if token.state.as_deref() == Some(STATE_INACTIVE) {
                diags.root_warning(
                    "AI model serving auth token has expired",
                    "The token is no longer valid. It has been removed from the state and will be recreated on the next apply.",
                );
                tracing::warn!(
                    id = state.id.as_deref_option(),
                    "AI model serving auth token expired, removing it from state"
                );
                return None;
            }
        }

        state
            .map_fields(token.as_ref())
            .or_report(diags, SUMMARY)?;
        tracing::info!(id = state.id.as_deref_option(), "AI model serving auth token read");

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
        state.token_id = Value::Unknown;
        state.state = Value::Unknown;
        state.valid_until = Value::Unknown;
        state.token = Value::Unknown;
        if state.region.is_null() {
            state.region = self
                .provider
                .default_region()
                .await
                .map_or(Value::Unknown, |region| Value::Value(Cow::Owned(region)));
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
            ("region", &prior_state.region, &state.region),
            ("ttl_duration", &prior_state.ttl_duration, &state.ttl_duration),
        ] {
            if prior != proposed {
                trigger_replace.push(AttributePath::new(name));
            }
        }

        if !trigger_replace.is_empty() {
            state.id = Value::Unknown;
            state.token_id = Value::Unknown;
            state.valid_until = Value::Unknown;
            state.token = Value::Unknown;
            state.state = Value::Unknown;
        } else if prior_state.name != state.name || prior_state.description != state.description {
            state.state = Value::Unknown;
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
        const SUMMARY: &str = "Error creating AI model serving auth token";
        let configured = self.provider.get(diags).await?;

        let mut state = planned_state;
        state.region = configured.region(&state.region);
        let payload = state.to_create_payload().or_report(diags, SUMMARY)?;

        let created = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let region = state.region().or_report(diags, SUMMARY)?;
            configured
                .client
                .create_token(project_id, region, &payload)
                .await
        }
        .or_report(diags, SUMMARY)?;

        if let Err(err) = state.map_fields(created.token.as_ref()) {
            report_error(diags, SUMMARY, format!("Processing API payload: {err:#}"));
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "AI model serving auth token created");

        let handler = self.provider.wait_handler(CREATE_TIMEOUT);
        let active = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let region = state.region().or_report(diags, SUMMARY)?;
            let token_id = state.token_id().or_report(diags, SUMMARY)?;
            wait_token_active(&configured.client, &handler, project_id, region, token_id).await
        };
        let active = match active {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(
                    token_id = state.token_id.as_deref_option(),
                    project_id = state.project_id.as_deref_option(),
                    "AI model serving auth token was created but never became active, it is not stored in the state"
                );
                report_error(
                    diags,
                    SUMMARY,
                    format!("Waiting for AI model serving auth token to be active: {err}"),
                );
                return None;
            }
        };

        if let Err(err) = state.map_fields(Some(&active)) {
            report_error(diags, SUMMARY, format!("Processing API payload: {err:#}"));
            return None;
        }

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        const SUMMARY: &str = "Error updating AI model serving auth token";
        let configured = self.provider.get(diags).await?;

        let mut state = planned_state;
        state.region = configured.region(&state.region);
        let payload = state.to_update_payload();
        let handler = self.provider.wait_handler(UPDATE_TIMEOUT);

        let active = {
            let project_id = state.project_id().or_report(diags, SUMMARY)?;
            let region = state.region().or_report(diags, SUMMARY)?;
            let token_id = state.token_id().or_report(diags, SUMMARY)?;
            configured
                .client
                .update_token(project_id, region, token_id, &payload)
                .await
                .or_report(diags, SUMMARY)?;
            wait_token_active(&configured.client, &handler, project_id, region, token_id).await
        };
        let active = match active {
            Ok(token) => token,
            Err(err) => {
                report_error(
                    diags,
                    SUMMARY,
                    format!("Waiting for AI model serving auth token to be active: {err}"),
                );
                return None;
            }
        };

        if let Err(err) = state.map_fields(Some(&active)) {
            report_error(diags, SUMMARY, format!("Processing API payload: {err:#}"));
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "AI model serving auth token updated");

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        const SUMMARY: &str = "Error deleting AI model serving auth token";
        let configured = self.provider.get(diags).await?;

        let region = state
            .region
            .as_deref_option()
            .unwrap_or(&configured.region);
        let project_id = state.project_id().or_report(diags, SUMMARY)?;
        let token_id = state.token_id().or_report(diags, SUMMARY)?;

        match configured
            .client
            .delete_token(project_id, region, token_id)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::warn!(token_id, "AI model serving auth token already deleted");
                return Some(());
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        }

        let handler = self.provider.wait_handler(DELETE_TIMEOUT);
        if let Err(err) =
            wait_token_deleted(&configured.client, &handler, project_id, region, token_id).await
        {
            report_error(
                diags,
                SUMMARY,
                format!("Waiting for AI model serving auth token to be deleted: {err}"),
            );
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "AI model serving auth token deleted");

        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let [project_id, token_id] = parse_id(&id, ID_FIELDS)
            .or_report(diags, "Error importing AI model serving auth token")?;

        let state = TokenState {
            project_id: Value::Value(Cow::Owned(project_id.to_owned())),
            token_id: Value::Value(Cow::Owned(token_id.to_owned())),
            id: Value::Value(Cow::Owned(id.clone())),
            ..Default::default()
        };
        tracing::info!(%id, "AI model serving auth token state imported");

        Some((state, Default::default()))
    }
}
