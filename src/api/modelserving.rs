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

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::wait::{WaitError, WaitHandler, WaitStatus};

use super::{ApiClient, ApiError};

pub const STATE_ACTIVE: &str = "active";
pub const STATE_INACTIVE: &str = "inactive";

pub const CREATE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Only returned on creation
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateTokenPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiClient {
    fn tokens_url(&self, project_id: &str, region: &str) -> String {
        format!(
            "{}/v1/projects/{project_id}/regions/{region}/tokens",
            self.endpoints().modelserving(region).trim_end_matches('/'),
        )
    }

    pub async fn create_token(
        &self,
        project_id: &str,
        region: &str,
        payload: &CreateTokenPayload,
    ) -> Result<TokenResponse, ApiError> {
        self.post(&self.tokens_url(project_id, region), payload)
            .await
    }

    pub async fn get_token(
        &self,
        project_id: &str,
        region: &str,
        token_id: &str,
    ) -> Result<TokenResponse, ApiError> {
        self.get(&format!("{}/{token_id}", self.tokens_url(project_id, region)))
            .await
    }

    pub async fn update_token(
        &self,
        project_id: &str,
        region: &str,
        token_id: &str,
        payload: &UpdateTokenPayload,
    ) -> Result<TokenResponse, ApiError> {
        self.patch(
            &format!("{}/{token_id}", self.tokens_url(project_id, region)),
            payload,
        )
        .await
    }

    pub async fn delete_token(
        &self,
        project_id: &str,
        region: &str,
        token_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(&format!("{}/{token_id}", self.tokens_url(project_id, region)))
            .await
    }
}

/// Wait until a token is `active`
///
/// An `inactive` token has expired and will never become active.
pub async fn wait_token_active(
    client: &ApiClient,
    handler: &WaitHandler,
    project_id: &str,
    region: &str,
    token_id: &str,
) -> Result<Token, WaitError> {
    handler
        .wait(move || async move {
            let token = client
                .get_token(project_id, region, token_id)
                .await?
                .token
                .unwrap_or_default();
            Ok(match token.state.as_deref() {
                Some(STATE_ACTIVE) => WaitStatus::Done(token),
                Some(STATE_INACTIVE) => {
                    WaitStatus::Failed(format!("token {token_id} is {STATE_INACTIVE}"))
                }
                _ => WaitStatus::Pending,
            })
        })
        .await
}

/// Wait until the token is gone
pub async fn wait_token_deleted(
    client: &ApiClient,
    handler: &WaitHandler,
    project_id: &str,
    region: &str,
    token_id: &str,
) -> Result<(), WaitError> {
    handler
        .wait(move || async move {
            match client.get_token(project_id, region, token_id).await {
                Ok(_) => Ok(WaitStatus::Pending),
                Err(err) if err.is_not_found() => Ok(WaitStatus::Done(())),
                Err(err) => Err(err),
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::tests::client_for;

    const TOKEN_PATH: &str = "/v1/projects/pid/regions/eu01/tokens/tid";

    fn fast() -> WaitHandler {
        WaitHandler::new(Duration::from_secs(5)).with_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn waits_for_active_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": {"id": "tid", "state": "creating"}})),
            )
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": {"id": "tid", "state": "active"}})),
            )
            .mount(&server)
            .await;

        let token = wait_token_active(&client_for(&server), &fast(), "pid", "eu01", "tid")
            .await
            .unwrap();

        assert_eq!(token.state.as_deref(), Some(STATE_ACTIVE));
    }

    #[tokio::test]
    async fn inactive_token_fails_the_wait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": {"id": "tid", "state": "inactive"}})),
            )
            .mount(&server)
            .await;

        let err = wait_token_active(&client_for(&server), &fast(), "pid", "eu01", "tid")
            .await
            .unwrap_err();

        assert!(matches!(err, WaitError::Failed(_)));
    }

    #[tokio::test]
    async fn deletion_completes_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": {"id": "tid", "state": "deleting"}})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        wait_token_deleted(&client_for(&server), &fast(), "pid", "eu01", "tid")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn deletion_propagates_other_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = wait_token_deleted(&client_for(&server), &fast(), "pid", "eu01", "tid")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WaitError::Api(ApiError::Status {
                status_code: 403,
                ..
            })
        ));
    }
}
