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

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::labels::LabelsPatch;

use super::{ApiClient, ApiError};

/// Wire form of the one-of objects of the routing table API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TypedValue {
    pub fn new(kind: &str, value: Option<&str>) -> Self {
        Self {
            kind: Some(kind.to_owned()),
            value: value.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    CidrV4(String),
    CidrV6(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHop {
    Ipv4(String),
    Ipv6(String),
    Internet,
    Blackhole,
}

fn required_value<'a>(object: &'a str, kind: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("{object} of type {kind:?} requires a value"),
    }
}

fn no_value(object: &str, kind: &str, value: Option<&str>) -> Result<()> {
    match value {
        None => Ok(()),
        Some(_) => bail!("{object} of type {kind:?} must not have a value"),
    }
}

impl Destination {
    pub const TYPES: [&'static str; 2] = ["cidrv4", "cidrv6"];

    pub fn parse(kind: Option<&str>, value: Option<&str>) -> Result<Self> {
        match kind {
            Some(kind @ "cidrv4") => Ok(Self::CidrV4(
                required_value("destination", kind, value)?.to_owned(),
            )),
            Some(kind @ "cidrv6") => Ok(Self::CidrV6(
                required_value("destination", kind, value)?.to_owned(),
            )),
            Some(kind) => bail!(
                "unknown destination type {kind:?}, expected one of {:?}",
                Self::TYPES
            ),
            None => bail!("destination has no type"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::CidrV4(_) => "cidrv4",
            Self::CidrV6(_) => "cidrv6",
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::CidrV4(value) | Self::CidrV6(value) => Some(value),
        }
    }
}

impl TryFrom<&TypedValue> for Destination {
    type Error = anyhow::Error;

    fn try_from(wire: &TypedValue) -> Result<Self> {
        Self::parse(wire.kind.as_deref(), wire.value.as_deref())
    }
}

impl From<&Destination> for TypedValue {
    fn from(destination: &Destination) -> Self {
        TypedValue::new(destination.kind(), destination.value())
    }
}

impl NextHop {
    pub const TYPES: [&'static str; 4] = ["ipv4", "ipv6", "internet", "blackhole"];

    pub fn parse(kind: Option<&str>, value: Option<&str>) -> Result<Self> {
        match kind {
            Some(kind @ "ipv4") => Ok(Self::Ipv4(
                required_value("next hop", kind, value)?.to_owned(),
            )),
            Some(kind @ "ipv6") => Ok(Self::Ipv6(
                required_value("next hop", kind, value)?.to_owned(),
            )),
            Some(kind @ "internet") => {
                no_value("next hop", kind, value)?;
                Ok(Self::Internet)
            }
            Some(kind @ "blackhole") => {
                no_value("next hop", kind, value)?;
                Ok(Self::Blackhole)
            }
            Some(kind) => bail!(
                "unknown next hop type {kind:?}, expected one of {:?}",
                Self::TYPES
            ),
            None => bail!("next hop has no type"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ipv4(_) => "ipv4",
            Self::Ipv6(_) => "ipv6",
            Self::Internet => "internet",
            Self::Blackhole => "blackhole",
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Ipv4(value) | Self::Ipv6(value) => Some(value),
            Self::Internet | Self::Blackhole => None,
        }
    }
}

impl TryFrom<&TypedValue> for NextHop {
    type Error = anyhow::Error;

    fn try_from(wire: &TypedValue) -> Result<Self> {
        Self::parse(wire.kind.as_deref(), wire.value.as_deref())
    }
}

impl From<&NextHop> for TypedValue {
    fn from(next_hop: &NextHop) -> Self {
        TypedValue::new(next_hop.kind(), next_hop.value())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub destination: Option<TypedValue>,
    #[serde(default)]
    pub nexthop: Option<TypedValue>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePayload {
    pub destination: TypedValue,
    pub nexthop: TypedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddRoutesPayload {
    pub items: Vec<RoutePayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRoutePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteList {
    #[serde(default)]
    pub items: Option<Vec<Route>>,
}

/// Path of a routing table inside a network area
#[derive(Debug, Clone, Copy)]
pub struct RoutingTableKey<'a> {
    pub organization_id: &'a str,
    pub network_area_id: &'a str,
    pub region: &'a str,
    pub routing_table_id: &'a str,
}

impl ApiClient {
    fn routes_url(&self, key: RoutingTableKey<'_>) -> String {
        format!(
            "{}/v2alpha1/organizations/{}/network-areas/{}/regions/{}/routing-tables/{}/routes",
            self.endpoints().iaas.trim_end_matches('/'),
            key.organization_id,
            key.network_area_id,
            key.region,
            key.routing_table_id,
        )
    }

    pub async fn add_routes(
        &self,
        key: RoutingTableKey<'_>,
        payload: &AddRoutesPayload,
    ) -> Result<RouteList, ApiError> {
        self.post(&self.routes_url(key), payload).await
    }

    pub async fn get_route(
        &self,
        key: RoutingTableKey<'_>,
        route_id: &str,
    ) -> Result<Route, ApiError> {
        self.get(&format!("{}/{route_id}", self.routes_url(key)))
            .await
    }

    pub async fn update_route(
        &self,
        key: RoutingTableKey<'_>,
        route_id: &str,
        payload: &UpdateRoutePayload,
    ) -> Result<Route, ApiError> {
        self.patch(&format!("{}/{route_id}", self.routes_url(key)), payload)
            .await
    }

    pub async fn delete_route(
        &self,
        key: RoutingTableKey<'_>,
        route_id: &str,
    ) -> Result<(), ApiError> {
        self.delete(&format!("{}/{route_id}", self.routes_url(key)))
            .await
    }
}
