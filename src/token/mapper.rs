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

use anyhow::{Context, Result};
use tf_provider::value::{Value, ValueString};

use crate::api::modelserving::{CreateTokenPayload, Token, UpdateTokenPayload};
use crate::id::build_id;
use crate::utils::{known_string, string_value, timestamp_value, WithResponse};

use super::state::TokenState;

impl<'a> TokenState<'a> {
    pub fn project_id(&self) -> Result<&str> {
        self.project_id
            .as_deref_option()
            .context("`project_id` is not known")
    }

    pub fn region(&self) -> Result<&str> {
        self.region.as_deref_option().context("`region` is not known")
    }

    pub fn token_id(&self) -> Result<&str> {
        self.token_id
            .as_deref_option()
            .context("`token_id` is not known")
    }

    pub fn to_create_payload(&self) -> Result<CreateTokenPayload> {
        Ok(CreateTokenPayload {
            name: known_string(&self.name).context("`name` is not known")?,
            description: known_string(&self.description),
            ttl_duration: known_string(&self.ttl_duration),
        })
    }

    pub fn to_update_payload(&self) -> UpdateTokenPayload {
        UpdateTokenPayload {
            name: known_string(&self.name),
            description: known_string(&self.description),
        }
    }
}

impl<'a> WithResponse<Token> for TokenState<'a> {
    fn map_fields(&mut self, response: Option<&Token>) -> Result<()> {
        let token = response.context("token response is missing")?;
        let token_id = token
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .context("token id not present")?;
        let project_id = self.project_id()?;

        let region: ValueString<'a> = match token.region.as_deref() {
            Some(region) if !region.is_empty() => Value::Value(Cow::Owned(region.to_owned())),
            _ => match &self.region {
                Value::Value(region) => Value::Value(region.clone()),
                _ => anyhow::bail!("token region is not known"),
            },
        };
        let id = build_id([project_id, token_id]);
        let valid_until = timestamp_value(token.valid_until.as_deref()).context("valid_until")?;

        // Empty descriptions are not distinguishable from unset ones
        let description = match token.description.as_deref() {
            Some("") | None if self.description.is_null() => Value::Null,
            description => string_value(description.map(str::to_owned)),
        };

        self.id = Value::Value(Cow::Owned(id));
        self.token_id = Value::Value(Cow::Owned(token_id.to_owned()));
        self.region = region;
        self.name = string_value(token.name.clone());
        self.description = description;
        self.state = string_value(token.state.clone());
        self.valid_until = valid_until;
        if let Some(content) = &token.content {
            self.token = Value::Value(Cow::Owned(content.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> TokenState<'static> {
        TokenState {
            project_id: Value::Value(Cow::Borrowed("pid")),
            region: Value::Value(Cow::Borrowed("eu01")),
            name: Value::Value(Cow::Borrowed("name")),
            ..Default::default()
        }
    }

    #[test]
    fn maps_a_created_token() {
        let mut state = project();
        state
            .map_fields(Some(&Token {
                id: Some("tid".to_owned()),
                name: Some("name".to_owned()),
                description: Some("desc".to_owned()),
                state: Some("creating".to_owned()),
                valid_until: Some("2025-01-01T00:00:00Z".to_owned()),
                region: Some("eu01".to_owned()),
                content: Some("secret".to_owned()),
            }))
            .unwrap();

        assert_eq!(state.id.as_deref_option(), Some("pid,tid"));
        assert_eq!(state.token_id.as_deref_option(), Some("tid"));
        assert_eq!(state.description.as_deref_option(), Some("desc"));
        assert_eq!(state.state.as_deref_option(), Some("creating"));
        assert_eq!(state.token.as_deref_option(), Some("secret"));
    }

    #[test]
    fn token_content_is_kept_from_prior_state() {
        let mut state = TokenState {
            token: Value::Value(Cow::Borrowed("secret")),
            ..project()
        };
        state
            .map_fields(Some(&Token {
                id: Some("tid".to_owned()),
                name: Some("name".to_owned()),
                description: Some(String::new()),
                state: Some("active".to_owned()),
                ..Default::default()
            }))
            .unwrap();

        assert_eq!(state.token.as_deref_option(), Some("secret"));
        assert_eq!(state.region.as_deref_option(), Some("eu01"));
        assert!(state.description.is_null());
        assert!(state.valid_until.is_null());
    }

    #[test]
    fn missing_id_leaves_state_unchanged() {
        let mut state = project();
        assert!(state.map_fields(Some(&Token::default())).is_err());
        assert!(state.map_fields(None).is_err());
        assert_eq!(state, project());
    }

    #[test]
    fn payloads_carry_known_values() {
        let state = TokenState {
            ttl_duration: Value::Value(Cow::Borrowed("1h")),
            description: Value::Unknown,
            ..project()
        };

        assert_eq!(
            state.to_create_payload().unwrap(),
            CreateTokenPayload {
                name: "name".to_owned(),
                description: None,
                ttl_duration: Some("1h".to_owned()),
            }
        );
        assert_eq!(
            state.to_update_payload(),
            UpdateTokenPayload {
                name: Some("name".to_owned()),
                description: None,
            }
        );
        assert!(TokenState::default().to_create_payload().is_err());
    }
}
