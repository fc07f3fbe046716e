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

//! Polling of asynchronous API operations

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::api::ApiError;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Outcome of a single status check
#[derive(Debug, PartialEq, Eq)]
pub enum WaitStatus<T> {
    Pending,
    Done(T),
    Failed(String),
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("operation did not complete within {0:?}")]
    Timeout(Duration),
    #[error("operation wait was cancelled")]
    Cancelled,
    #[error("operation failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct WaitHandler {
    interval: Duration,
    timeout: Duration,
    cancel: CancellationToken,
}

impl WaitHandler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Call `check` until it reports a terminal status
    ///
    /// The first check happens immediately. Errors from `check` are not retried.
    pub async fn wait<T, F, Fut>(&self, mut check: F) -> Result<T, WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<WaitStatus<T>, ApiError>>,
    {
        let poll = async {
            loop {
                match check().await? {
                    WaitStatus::Done(value) => return Ok(value),
                    WaitStatus::Failed(reason) => return Err(WaitError::Failed(reason)),
                    WaitStatus::Pending => (),
                }
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(WaitError::Cancelled),
                    _ = tokio::time::sleep(self.interval) => (),
                }
            }
        };

        match tokio::time::timeout(self.timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(WaitError::Timeout(self.timeout)),
        }
    }
}
