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

//! Thin REST client for the STACKIT APIs used by the provider

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod iaas;
pub mod modelserving;
pub mod routing_table;

const MAX_ERROR_BODY_LENGTH: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API returned status {status_code}: {message}")]
    Status { status_code: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cannot decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Base URLs of the services, without trailing slash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub iaas: String,
    /// May contain a `{region}` placeholder
    pub modelserving: String,
}

impl Endpoints {
    pub fn modelserving(&self, region: &str) -> String {
        self.modelserving.replace("{region}", region)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    token: String,
    endpoints: Endpoints,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str(body)
    {
        return message;
    }
    let body: String = body
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    if body.len() > MAX_ERROR_BODY_LENGTH {
        format!("{}... [truncated]", &body[..MAX_ERROR_BODY_LENGTH])
    } else {
        body
    }
}

impl ApiClient {
    pub fn new(token: impl Into<String>, endpoints: Endpoints) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!(
                "terraform-provider-stackit/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            http,
            token: token.into(),
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!("{method} {url}");
        self.http.request(method, url).bearer_auth(&self.token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::debug!("API error: {status} - {message}");
            return Err(ApiError::Status {
                status_code: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            Ok(serde_json::from_str("null")?)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, url)).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, url).json(body)).await
    }

    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::PATCH, url).json(body)).await
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<(), ApiError> {
        self.send::<serde_json::Value>(self.request(Method::DELETE, url))
            .await
            .map(|_| ())
    }
}
