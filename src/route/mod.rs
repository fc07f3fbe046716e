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

//! `stackit_routing_table_route` resource and data source

mod data_source;
mod mapper;
mod resource;
mod state;
mod validate;

pub use data_source::RouteDataSource;
pub use resource::RouteResource;

pub(crate) const TYPE_NAME: &str = "stackit_routing_table_route";

/// Layout of the identifier, also used by `terraform import`
const ID_FIELDS: [&str; 5] = [
    "organization_id",
    "region",
    "network_area_id",
    "routing_table_id",
    "route_id",
];
