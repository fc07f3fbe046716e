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
use tf_provider::value::{Value, ValueString};
use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};

use crate::labels::Labels;
use crate::utils::WithSchema;

/// `{type, value}` object of a destination or a next hop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedObject<'a> {
    #[serde(borrow = "'a", rename = "type")]
    pub kind: ValueString<'a>,
    pub value: ValueString<'a>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub organization_id: ValueString<'a>,
    pub region: ValueString<'a>,
    pub network_area_id: ValueString<'a>,
    pub routing_table_id: ValueString<'a>,
    pub route_id: ValueString<'a>,
    pub destination: Value<TypedObject<'a>>,
    pub next_hop: Value<TypedObject<'a>>,
    pub labels: Labels<'a>,
    pub created_at: ValueString<'a>,
    pub updated_at: ValueString<'a>,
}

fn typed_object_type() -> AttributeType {
    AttributeType::Object(map! {
        "type" => AttributeType::String,
        "value" => AttributeType::String,
    })
}

/// Attributes shared by the resource and the data source
fn common_attributes() -> HashMap<String, Attribute> {
    map! {
        "id" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(
                "Terraform's internal resource ID. It is structured as \"`organization_id`,`region`,`network_area_id`,`routing_table_id`,`route_id`\".",
            ),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
        "organization_id" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("STACKIT organization ID to which the routing table is associated."),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "region" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("The resource region. If not defined, the provider region is used."),
            constraint: AttributeConstraint::OptionalComputed,
            ..Default::default()
        },
        "network_area_id" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("The network area ID to which the routing table is associated."),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "routing_table_id" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("The routing tables ID."),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "created_at" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("Date-time when the route was created."),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
        "updated_at" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("Date-time when the route was updated."),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
    }
}

impl<'a> WithSchema for RouteState<'a> {
    fn schema() -> Schema {
        let mut attributes = common_attributes();
        let specific: HashMap<String, Attribute> = map! {
            "route_id" => Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("The ID of the route."),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
            "destination" => Attribute {
                attr_type: typed_object_type(),
                description: Description::markdown(
                    "Destination of the route. `type` is one of `cidrv4`, `cidrv6`, `value` is the CIDR.",
                ),
                constraint: AttributeConstraint::Required,
                ..Default::default()
            },
            "next_hop" => Attribute {
                attr_type: typed_object_type(),
                description: Description::markdown(
                    "Next hop destination. `type` is one of `ipv4`, `ipv6`, `internet`, `blackhole`. `value` is the IP address for `ipv4` and `ipv6`, and must be null otherwise.",
                ),
                constraint: AttributeConstraint::Required,
                ..Default::default()
            },
            "labels" => Attribute {
                attr_type: AttributeType::Map(AttributeType::String.into()),
                description: Description::plain("Labels are key-value string pairs which can be attached to a resource container."),
                constraint: AttributeConstraint::Optional,
                ..Default::default()
            },
        };
        attributes.extend(specific);

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::markdown(
                    "Routing table route resource schema. Must have the `region` specified in the provider configuration.\n\n~> This resource is in beta and may be subject to breaking changes in the future.",
                ),
                attributes,
                ..Default::default()
            },
        }
    }
}

pub(super) fn data_source_schema() -> Schema {
    let mut attributes = common_attributes();
    let specific: HashMap<String, Attribute> = map! {
        "route_id" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("The ID of the route."),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "destination" => Attribute {
            attr_type: typed_object_type(),
            description: Description::plain("Destination of the route."),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
        "next_hop" => Attribute {
            attr_type: typed_object_type(),
            description: Description::plain("Next hop destination."),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
        "labels" => Attribute {
            attr_type: AttributeType::Map(AttributeType::String.into()),
            description: Description::plain("Labels are key-value string pairs which can be attached to a resource container."),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
    };
    attributes.extend(specific);

    Schema {
        version: 1,
        block: Block {
            version: 1,
            description: Description::markdown(
                "Routing table route datasource schema.\n\n~> This datasource is in beta and may be subject to breaking changes in the future.",
            ),
            attributes,
            ..Default::default()
        },
    }
}
