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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::value::{Value, ValueList, ValueString};
use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};

use crate::labels::Labels;
use crate::utils::WithSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterfaceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub project_id: ValueString<'a>,
    pub network_id: ValueString<'a>,
    pub network_interface_id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub allowed_addresses: ValueList<ValueString<'a>>,
    pub ipv4: ValueString<'a>,
    pub labels: Labels<'a>,
    pub security: Value<bool>,
    pub security_group_ids: ValueList<ValueString<'a>>,
    pub device: ValueString<'a>,
    pub mac: ValueString<'a>,
    #[serde(rename = "type")]
    pub kind: ValueString<'a>,
}

fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

/// Attributes set by the resource and only read by the data source
fn configurable_attributes(data_source: bool) -> HashMap<String, Attribute> {
    let list = || AttributeType::List(AttributeType::String.into());
    let optional = || {
        if data_source {
            AttributeConstraint::Computed
        } else {
            AttributeConstraint::Optional
        }
    };
    let optional_computed = || {
        if data_source {
            AttributeConstraint::Computed
        } else {
            AttributeConstraint::OptionalComputed
        }
    };
    map! {
        "name" => attribute(AttributeType::String, optional(), "The name of the network interface."),
        "allowed_addresses" => attribute(list(), optional(), "The list of CIDR (Classless Inter-Domain Routing) notations."),
        "ipv4" => attribute(AttributeType::String, optional_computed(), "The IPv4 address."),
        "labels" => attribute(
            AttributeType::Map(AttributeType::String.into()),
            optional(),
            "Labels are key-value string pairs which can be attached to a network interface.",
        ),
        "security" => attribute(AttributeType::Bool, optional_computed(), "The Network Interface Security. If set to false, then no security groups will apply to this network interface."),
        "security_group_ids" => attribute(list(), optional(), "The list of security group UUIDs. If security is set to false, setting this field will lead to an error."),
    }
}

fn computed_attributes() -> HashMap<String, Attribute> {
    map! {
        "id" => attribute(
            AttributeType::String,
            AttributeConstraint::Computed,
            "Terraform's internal resource ID. It is structured as \"`project_id`,`network_id`,`network_interface_id`\".",
        ),
        "project_id" => attribute(AttributeType::String, AttributeConstraint::Required, "STACKIT project ID to which the network is associated."),
        "network_id" => attribute(AttributeType::String, AttributeConstraint::Required, "The network ID to which the network interface is associated."),
        "device" => attribute(AttributeType::String, AttributeConstraint::Computed, "The device UUID of the network interface."),
        "mac" => attribute(AttributeType::String, AttributeConstraint::Computed, "The MAC address of network interface."),
        "type" => attribute(AttributeType::String, AttributeConstraint::Computed, "Type of network interface. Some of the possible values are: `server`, `metadata`, `gateway`."),
    }
}

impl<'a> WithSchema for NetworkInterfaceState<'a> {
    fn schema() -> Schema {
        let mut attributes = computed_attributes();
        attributes.extend(configurable_attributes(false));
        attributes.insert(
            "network_interface_id".to_owned(),
            attribute(
                AttributeType::String,
                AttributeConstraint::Computed,
                "The network interface ID.",
            ),
        );

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Network interface resource schema."),
                attributes,
                ..Default::default()
            },
        }
    }
}

pub(super) fn data_source_schema() -> Schema {
    let mut attributes = computed_attributes();
    attributes.extend(configurable_attributes(true));
    attributes.insert(
        "network_interface_id".to_owned(),
        attribute(
            AttributeType::String,
            AttributeConstraint::Required,
            "The network interface ID.",
        ),
    );

    Schema {
        version: 1,
        block: Block {
            version: 1,
            description: Description::plain("Network interface datasource schema."),
            attributes,
            ..Default::default()
        },
    }
}
