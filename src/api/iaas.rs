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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::labels::LabelsPatch;

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub allowed_addresses: Option<Vec<String>>,
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub nic_security: Option<bool>,
    #[serde(default)]
    pub security_groups: Option<Vec<String>>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkInterfacePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic_security: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNetworkInterfacePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic_security: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<String>>,
}

impl ApiClient {
    fn nics_url(&self, project_id: &str, network_id: &str) -> String {
        format!(
            "{}/v1/projects/{project_id}/networks/{network_id}/nics",
            self.endpoints().iaas.trim_end_matches('/'),
        )
    }

    pub async fn create_network_interface(
        &self,
        project_id: &str,
        network_id: &str,
        payload: &CreateNetworkInterfacePayload,
    ) -> Result<NetworkInterface, ApiError> {
        self.post(&self.nics_url(project_id, network_id), payload)
            .await
    }

    pub async fn get_network_interface(
        &self,
        project_id: &str,
        network_id: &str,
        nic_id: &str,
    ) -> Result<NetworkInterface, ApiError> {
        self.get(&format!("{}/{nic_id}", self.nics_url(project_id, network_id)))
            .await
    }

    pub async fn update_network_interface(
        &self,
        project_id: &str,
        network_id: &str,
        nic_id: &str,
        payload: &UpdateNetworkInterfacePayload,
    ) -> Result<NetworkInterface, ApiError> {
        self.patch(
            &format!("{}/{nic_id}", self.nics_url(project_id, network_id)),
            payload,
        )
        .await
    }

    pub async fn delete_network_interface(
        &self,
        project_id: &str,
        network_id: &str,
        nic_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(&format!("{}/{nic_id}", self.nics_url(project_id, network_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::tests::client_for;

    #[tokio::test]
    async fn update_sends_only_set_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/projects/pid/networks/nid/nics/nic"))
            .and(body_json(json!({
                "name": "renamed",
                "labels": {"env": "prod", "old": null},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "nic",
                "name": "renamed",
                "labels": {"env": "prod"},
                "type": "server",
            })))
            .mount(&server)
            .await;

        let nic = client_for(&server)
            .update_network_interface(
                "pid",
                "nid",
                "nic",
                &UpdateNetworkInterfacePayload {
                    name: Some("renamed".to_owned()),
                    labels: Some(LabelsPatch::from([
                        ("env".to_owned(), Some("prod".to_owned())),
                        ("old".to_owned(), None),
                    ])),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(nic.kind.as_deref(), Some("server"));
        assert_eq!(nic.nic_security, None);
    }
}
