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
use tf_provider::value::{Value, ValueList, ValueString};

use crate::api::iaas::{
    CreateNetworkInterfacePayload, NetworkInterface, UpdateNetworkInterfacePayload,
};
use crate::id::build_id;
use crate::labels::{diff_labels, labels_payload, labels_value};
use crate::utils::{known_string, known_string_list, string_list, string_value, WithResponse};

use super::state::NetworkInterfaceState;

/// An absent list is null, an empty one stays null when it was not configured
fn list_value<'a>(
    values: Option<&Vec<String>>,
    previous: &ValueList<ValueString<'a>>,
) -> ValueList<ValueString<'a>> {
    match values {
        None => Value::Null,
        Some(values) if values.is_empty() && previous.is_null() => Value::Null,
        values => string_list(values.cloned()),
    }
}

/// Lists are cleared with an empty list
fn list_update(desired: &ValueList<ValueString<'_>>) -> Option<Vec<String>> {
    match desired {
        Value::Null => Some(Vec::new()),
        desired => known_string_list(desired),
    }
}

impl<'a> NetworkInterfaceState<'a> {
    pub fn project_id(&self) -> Result<&str> {
        self.project_id
            .as_deref_option()
            .context("`project_id` is not known")
    }

    pub fn network_id(&self) -> Result<&str> {
        self.network_id
            .as_deref_option()
            .context("`network_id` is not known")
    }

    pub fn network_interface_id(&self) -> Result<&str> {
        self.network_interface_id
            .as_deref_option()
            .context("`network_interface_id` is not known")
    }

    pub fn to_create_payload(&self) -> CreateNetworkInterfacePayload {
        CreateNetworkInterfacePayload {
            name: known_string(&self.name),
            allowed_addresses: known_string_list(&self.allowed_addresses),
            ipv4: known_string(&self.ipv4),
            labels: labels_payload(&self.labels),
            nic_security: self.security.as_ref_option().copied(),
            security_groups: known_string_list(&self.security_group_ids),
        }
    }

    pub fn to_update_payload(&self, prior: &NetworkInterfaceState<'_>) -> UpdateNetworkInterfacePayload {
        let labels = if self.labels.is_unknown() {
            None
        } else {
            Some(diff_labels(&self.labels, &prior.labels)).filter(|patch| !patch.is_empty())
        };
        UpdateNetworkInterfacePayload {
            name: known_string(&self.name),
            allowed_addresses: list_update(&self.allowed_addresses),
            labels,
            nic_security: self.security.as_ref_option().copied(),
            security_groups: list_update(&self.security_group_ids),
        }
    }
}

impl<'a> WithResponse<NetworkInterface> for NetworkInterfaceState<'a> {
    fn map_fields(&mut self, response: Option<&NetworkInterface>) -> Result<()> {
        let nic = response.context("network interface response is missing")?;
        let nic_id = nic
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .context("network interface id not present")?;
        let network_id = match nic.network_id.as_deref() {
            Some(network_id) if !network_id.is_empty() => network_id,
            _ => self.network_id()?,
        };
        let id = build_id([self.project_id()?, network_id, nic_id]);
        let network_id = network_id.to_owned();

        self.id = Value::Value(Cow::Owned(id));
        self.network_id = Value::Value(Cow::Owned(network_id));
        self.network_interface_id = Value::Value(Cow::Owned(nic_id.to_owned()));
        self.name = string_value(nic.name.clone());
        self.allowed_addresses = list_value(nic.allowed_addresses.as_ref(), &self.allowed_addresses);
        self.ipv4 = string_value(nic.ipv4.clone());
        self.labels = labels_value(nic.labels.as_ref(), &self.labels);
        self.security = nic.nic_security.map_or(Value::Null, Value::Value);
        self.security_group_ids =
            list_value(nic.security_groups.as_ref(), &self.security_group_ids);
        self.device = string_value(nic.device.clone());
        self.mac = string_value(nic.mac.clone());
        self.kind = string_value(nic.kind.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::labels::{labels_from, LabelsPatch};

    fn keyed() -> NetworkInterfaceState<'static> {
        NetworkInterfaceState {
            project_id: Value::Value(Cow::Borrowed("pid")),
            network_id: Value::Value(Cow::Borrowed("nid")),
            ..Default::default()
        }
    }

    #[test]
    fn maps_a_network_interface() {
        let mut state = keyed();
        state
            .map_fields(Some(&NetworkInterface {
                id: Some("nic".to_owned()),
                network_id: Some("nid".to_owned()),
                name: Some("eth0".to_owned()),
                allowed_addresses: Some(vec!["10.0.0.0/24".to_owned()]),
                ipv4: Some("10.0.0.5".to_owned()),
                labels: Some(BTreeMap::from([("env".to_owned(), "prod".to_owned())])),
                nic_security: Some(true),
                security_groups: Some(vec![]),
                device: None,
                mac: Some("fa:16:3e:00:00:01".to_owned()),
                kind: Some("server".to_owned()),
            }))
            .unwrap();

        assert_eq!(state.id.as_deref_option(), Some("pid,nid,nic"));
        assert_eq!(
            state.allowed_addresses,
            string_list(Some(vec!["10.0.0.0/24".to_owned()]))
        );
        assert_eq!(state.labels, labels_from(&[("env", "prod")]));
        assert_eq!(state.security, Value::Value(true));
        assert!(state.security_group_ids.is_null());
        assert!(state.device.is_null());
        assert_eq!(state.kind.as_deref_option(), Some("server"));
    }

    #[test]
    fn configured_empty_lists_stay_empty() {
        let mut state = NetworkInterfaceState {
            security_group_ids: Value::Value(vec![]),
            ..keyed()
        };
        state
            .map_fields(Some(&NetworkInterface {
                id: Some("nic".to_owned()),
                security_groups: Some(vec![]),
                ..Default::default()
            }))
            .unwrap();

        assert_eq!(state.security_group_ids, Value::Value(vec![]));
        assert_eq!(state.network_id.as_deref_option(), Some("nid"));
    }

    #[test]
    fn absent_lists_become_null() {
        let mut state = NetworkInterfaceState {
            allowed_addresses: string_list(Some(vec!["10.0.0.0/24".to_owned()])),
            ..keyed()
        };
        state
            .map_fields(Some(&NetworkInterface {
                id: Some("nic".to_owned()),
                ..Default::default()
            }))
            .unwrap();

        assert!(state.allowed_addresses.is_null());
        assert!(state.security_group_ids.is_null());
    }

    #[test]
    fn missing_id_leaves_state_unchanged() {
        let mut state = keyed();
        assert!(state
            .map_fields(Some(&NetworkInterface::default()))
            .is_err());
        assert_eq!(state, keyed());

        assert!(state.map_fields(None).is_err());
        assert_eq!(state, keyed());
    }

    #[test]
    fn update_payload() {
        let prior = NetworkInterfaceState {
            labels: labels_from(&[("env", "dev"), ("team", "net")]),
            allowed_addresses: string_list(Some(vec!["10.0.0.0/24".to_owned()])),
            ..keyed()
        };
        let planned = NetworkInterfaceState {
            name: Value::Value(Cow::Borrowed("eth1")),
            labels: labels_from(&[("env", "prod")]),
            security: Value::Value(false),
            ..keyed()
        };

        let payload = planned.to_update_payload(&prior);

        assert_eq!(
            payload,
            UpdateNetworkInterfacePayload {
                name: Some("eth1".to_owned()),
                allowed_addresses: Some(vec![]),
                labels: Some(LabelsPatch::from([
                    ("env".to_owned(), Some("prod".to_owned())),
                    ("team".to_owned(), None),
                ])),
                nic_security: Some(false),
                security_groups: Some(vec![]),
            }
        );
    }
}
