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

use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::{validate_uuid, WithValidate};

use super::state::NetworkInterfaceState;

impl<'a> WithValidate for NetworkInterfaceState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        validate_uuid(diags, &self.project_id, "project_id");
        validate_uuid(diags, &self.network_id, "network_id");
        validate_uuid(diags, &self.network_interface_id, "network_interface_id");

        if let Some(ipv4) = self.ipv4.as_deref_option() {
            if ipv4.parse::<std::net::Ipv4Addr>().is_err() {
                diags.error(
                    "Invalid `ipv4`",
                    format!("{ipv4:?} is not an IPv4 address"),
                    AttributePath::new("ipv4"),
                );
            }
        }

        for (i, group) in self.security_group_ids.iter().flatten().enumerate() {
            if let Some(group) = group.as_deref_option() {
                if uuid::Uuid::parse_str(group).is_err() {
                    diags.error(
                        "Invalid UUID",
                        format!("security group ids must be UUIDs, got {group:?}"),
                        AttributePath::new("security_group_ids").index(i as i64),
                    );
                }
            }
        }

        let has_groups = self
            .security_group_ids
            .as_ref_option()
            .is_some_and(|groups| !groups.is_empty());
        if self.security == Value::Value(false) && has_groups {
            diags.error(
                "Invalid `security_group_ids`",
                "Security groups cannot be set when `security` is false",
                AttributePath::new("security_group_ids"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    const UUID: &str = "3a5b0c1e-8f0a-4b1c-9d2e-7f6a5b4c3d2e";

    #[test]
    fn valid_configuration() {
        let mut diags = Diagnostics::default();
        NetworkInterfaceState {
            project_id: Value::Value(Cow::Borrowed(UUID)),
            network_id: Value::Value(Cow::Borrowed(UUID)),
            ipv4: Value::Value(Cow::Borrowed("10.0.0.5")),
            security: Value::Value(true),
            security_group_ids: Value::Value(vec![Value::Value(Cow::Borrowed(UUID)), Value::Unknown]),
            ..Default::default()
        }
        .validate(&mut diags);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn security_groups_require_security() {
        let mut diags = Diagnostics::default();
        NetworkInterfaceState {
            ipv4: Value::Value(Cow::Borrowed("10.0.0")),
            security: Value::Value(false),
            security_group_ids: Value::Value(vec![Value::Value(Cow::Borrowed("sg"))]),
            ..Default::default()
        }
        .validate(&mut diags);
        assert_eq!(diags.errors.len(), 3);
    }
}
