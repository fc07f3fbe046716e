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

use tf_provider::serve;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod id;
mod labels;
mod network_interface;
mod provider;
mod route;
mod token;
mod utils;
mod wait;

use crate::provider::StackitProvider;

/// Environment variable holding the log filter, eg: `terraform_provider_stackit=debug`
const LOG_ENV: &str = "STACKIT_TF_LOG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the plugin handshake
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();

    let provider = StackitProvider::default();
    let shutdown = provider.shutdown_token();
    // Terraform forwards Ctrl-C as SIGINT: stop polling, report, then exit normally
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling pending waits");
            shutdown.cancel();
        }
    });

    serve("stackit", provider).await?;
    Ok(())
}
