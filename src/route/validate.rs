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

use crate::utils::{validate_no_separator, validate_uuid, WithValidate};

use super::state::{RouteState, TypedObject};

fn validate_object(
    diags: &mut Diagnostics,
    object: &Value<TypedObject<'_>>,
    attr: &'static str,
    check: impl Fn(&TypedObject<'_>) -> anyhow::Result<()>,
) {
    let Value::Value(object) = object else {
        return;
    };
    // Checked again at apply time once everything is known
    if object.kind.is_unknown() || object.value.is_unknown() {
        return;
    }
    if let Err(err) = check(object) {
        diags.error(
            format!("Invalid `{attr}`"),
            format!("{err:#}"),
            AttributePath::new(attr),
        );
    }
}

impl<'a> WithValidate for RouteState<'a> {
    fn validate(&self, diags: &mut Diagnostics) {
        validate_uuid(diags, &self.organization_id, "organization_id");
        validate_uuid(diags, &self.network_area_id, "network_area_id");
        validate_uuid(diags, &self.routing_table_id, "routing_table_id");
        validate_uuid(diags, &self.route_id, "route_id");
        validate_no_separator(diags, &self.region, "region");

        validate_object(diags, &self.destination, "destination", |object| {
            object.destination().map(|_| ())
        });
        validate_object(diags, &self.next_hop, "next_hop", |object| {
            object.next_hop().map(|_| ())
        });
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    const UUID: &str = "3a5b0c1e-8f0a-4b1c-9d2e-7f6a5b4c3d2e";

    fn valid() -> RouteState<'static> {
        RouteState {
            organization_id: Value::Value(Cow::Borrowed(UUID)),
            network_area_id: Value::Value(Cow::Borrowed(UUID)),
            routing_table_id: Value::Value(Cow::Borrowed(UUID)),
            region: Value::Value(Cow::Borrowed("eu01")),
            destination: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("cidrv4")),
                value: Value::Value(Cow::Borrowed("10.0.0.0/8")),
            }),
            next_hop: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("internet")),
                value: Value::Null,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn valid_configuration() {
        let mut diags = Diagnostics::default();
        valid().validate(&mut diags);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn unknown_objects_are_not_checked() {
        let mut diags = Diagnostics::default();
        RouteState {
            destination: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("cidrv4")),
                value: Value::Unknown,
            }),
            next_hop: Value::Unknown,
            ..valid()
        }
        .validate(&mut diags);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn invalid_configuration() {
        let mut diags = Diagnostics::default();
        RouteState {
            organization_id: Value::Value(Cow::Borrowed("org")),
            region: Value::Value(Cow::Borrowed("eu01,eu02")),
            next_hop: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("blackhole")),
                value: Value::Value(Cow::Borrowed("10.0.0.1")),
            }),
            ..valid()
        }
        .validate(&mut diags);
        assert_eq!(diags.errors.len(), 3);
    }
}
