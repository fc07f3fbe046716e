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

use serde::{Deserialize, Serialize};
use tf_provider::value::ValueString;
use tf_provider::map;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};

use crate::utils::WithSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub project_id: ValueString<'a>,
    pub region: ValueString<'a>,
    pub token_id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub ttl_duration: ValueString<'a>,
    pub state: ValueString<'a>,
    pub valid_until: ValueString<'a>,
    pub token: ValueString<'a>,
}

impl<'a> WithSchema for TokenState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::markdown(
                    "AI Model Serving Auth Token Resource schema.\n\n\
                     Tokens are only returned once, on creation. An expired token is removed from the state and recreated on the next apply.",
                ),
                attributes: map! {
                    "id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Terraform's internal resource ID. It is structured as \"`project_id`,`token_id`\".",
                        ),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "project_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("STACKIT project ID to which the AI model serving auth token is associated."),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "region" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Region to which the AI model serving auth token is associated. If not defined, the provider region is used."),
                        constraint: AttributeConstraint::OptionalComputed,
                        ..Default::default()
                    },
                    "token_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("The AI model serving auth token ID."),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Name of the AI model serving auth token."),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "description" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("The description of the AI model serving auth token."),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "ttl_duration" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::markdown(
                            "The TTL duration of the AI model serving auth token. E.g. `5h30m40s`, `5h`, `5h30m`, `30m`, `30s`. Changing it recreates the token.",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "state" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("State of the AI model serving auth token."),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "valid_until" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("The time until the AI model serving auth token is valid."),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "token" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Content of the AI model serving auth token."),
                        constraint: AttributeConstraint::Computed,
                        sensitive: true,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        }
    }
}
