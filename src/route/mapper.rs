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
use tf_provider::value::{Value, ValueString};

use crate::api::routing_table::{
    AddRoutesPayload, Destination, NextHop, Route, RoutePayload, RoutingTableKey, TypedValue,
    UpdateRoutePayload,
};
use crate::id::build_id;
use crate::labels::{diff_labels, labels_payload, labels_value, Labels};
use crate::utils::{string_value, timestamp_value, WithResponse};

use super::state::{RouteState, TypedObject};

fn typed_object<'a>(kind: &str, value: Option<&str>) -> TypedObject<'a> {
    TypedObject {
        kind: Value::Value(Cow::Owned(kind.to_owned())),
        value: string_value(value.map(str::to_owned)),
    }
}

fn destination_value<'a>(wire: Option<&TypedValue>) -> Result<Value<TypedObject<'a>>> {
    let Some(wire) = wire else {
        return Ok(Value::Null);
    };
    let destination = Destination::try_from(wire)?;
    Ok(Value::Value(typed_object(
        destination.kind(),
        destination.value(),
    )))
}

fn next_hop_value<'a>(wire: Option<&TypedValue>) -> Result<Value<TypedObject<'a>>> {
    let Some(wire) = wire else {
        return Ok(Value::Null);
    };
    let next_hop = NextHop::try_from(wire)?;
    Ok(Value::Value(typed_object(next_hop.kind(), next_hop.value())))
}

fn known<'b>(value: &'b ValueString<'_>, name: &str) -> Result<&'b str> {
    value
        .as_deref_option()
        .with_context(|| format!("`{name}` is not known"))
}

impl<'a> TypedObject<'a> {
    pub fn destination(&self) -> Result<Destination> {
        Destination::parse(self.kind.as_deref_option(), self.value.as_deref_option())
    }

    pub fn next_hop(&self) -> Result<NextHop> {
        NextHop::parse(self.kind.as_deref_option(), self.value.as_deref_option())
    }
}

impl<'a> RouteState<'a> {
    pub fn key(&self) -> Result<RoutingTableKey<'_>> {
        Ok(RoutingTableKey {
            organization_id: known(&self.organization_id, "organization_id")?,
            network_area_id: known(&self.network_area_id, "network_area_id")?,
            region: known(&self.region, "region")?,
            routing_table_id: known(&self.routing_table_id, "routing_table_id")?,
        })
    }

    pub fn route_id(&self) -> Result<&str> {
        known(&self.route_id, "route_id")
    }

    pub fn to_create_payload(&self) -> Result<AddRoutesPayload> {
        let destination = self
            .destination
            .as_ref_option()
            .context("destination is not set")?
            .destination()?;
        let next_hop = self
            .next_hop
            .as_ref_option()
            .context("next hop is not set")?
            .next_hop()?;

        Ok(AddRoutesPayload {
            items: vec![RoutePayload {
                destination: TypedValue::from(&destination),
                nexthop: TypedValue::from(&next_hop),
                labels: labels_payload(&self.labels),
            }],
        })
    }

    /// Only labels can be changed in place
    pub fn to_update_payload(&self, current_labels: &Labels<'_>) -> Result<UpdateRoutePayload> {
        if self.labels.is_unknown() {
            return Ok(UpdateRoutePayload::default());
        }
        let patch = diff_labels(&self.labels, current_labels);
        Ok(UpdateRoutePayload {
            labels: (!patch.is_empty()).then_some(patch),
        })
    }
}

impl<'a> WithResponse<Route> for RouteState<'a> {
    fn map_fields(&mut self, response: Option<&Route>) -> Result<()> {
        let route = response.context("route response is missing")?;
        let route_id = route
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .context("route id not present")?;

        let key = self.key()?;
        let id = build_id([
            key.organization_id,
            key.region,
            key.network_area_id,
            key.routing_table_id,
            route_id,
        ]);

        let destination = destination_value(route.destination.as_ref()).context("destination")?;
        let next_hop = next_hop_value(route.nexthop.as_ref()).context("next hop")?;
        let created_at = timestamp_value(route.created_at.as_deref()).context("created_at")?;
        let updated_at = timestamp_value(route.updated_at.as_deref()).context("updated_at")?;
        let labels = labels_value(route.labels.as_ref(), &self.labels);

        self.id = Value::Value(Cow::Owned(id));
        self.route_id = Value::Value(Cow::Owned(route_id.to_owned()));
        self.destination = destination;
        self.next_hop = next_hop;
        self.labels = labels;
        self.created_at = created_at;
        self.updated_at = updated_at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::labels::{labels_from, LabelsPatch};

    fn keyed_state() -> RouteState<'static> {
        RouteState {
            organization_id: Value::Value(Cow::Borrowed("orgId")),
            region: Value::Value(Cow::Borrowed("eu02")),
            network_area_id: Value::Value(Cow::Borrowed("areaId")),
            routing_table_id: Value::Value(Cow::Borrowed("tableId")),
            ..Default::default()
        }
    }

    fn object(kind: &'static str, value: Option<&'static str>) -> Value<TypedObject<'static>> {
        Value::Value(TypedObject {
            kind: Value::Value(Cow::Borrowed(kind)),
            value: value.map_or(Value::Null, |v| Value::Value(Cow::Borrowed(v))),
        })
    }

    #[test]
    fn maps_a_complete_route() {
        let route = Route {
            id: Some("routeId".to_owned()),
            destination: Some(TypedValue::new("cidrv4", Some("58.251.236.138/32"))),
            nexthop: Some(TypedValue::new("ipv4", Some("10.20.42.2"))),
            labels: Some(BTreeMap::from([
                ("foo1".to_owned(), "bar1".to_owned()),
                ("foo2".to_owned(), "bar2".to_owned()),
            ])),
            created_at: Some("2024-05-01T10:00:00Z".to_owned()),
            updated_at: None,
        };
        let mut state = keyed_state();

        state.map_fields(Some(&route)).unwrap();

        assert_eq!(state.id.as_deref_option(), Some("orgId,eu02,areaId,tableId,routeId"));
        assert_eq!(state.route_id.as_deref_option(), Some("routeId"));
        assert_eq!(state.destination, object("cidrv4", Some("58.251.236.138/32")));
        assert_eq!(state.next_hop, object("ipv4", Some("10.20.42.2")));
        assert_eq!(state.labels, labels_from(&[("foo1", "bar1"), ("foo2", "bar2")]));
        assert_eq!(state.created_at.as_deref_option(), Some("2024-05-01T10:00:00Z"));
        assert!(state.updated_at.is_null());
    }

    #[test]
    fn payload_less_next_hop_has_null_value() {
        let route = Route {
            id: Some("routeId".to_owned()),
            destination: Some(TypedValue::new("cidrv6", Some("2001:db8::/32"))),
            nexthop: Some(TypedValue::new("internet", None)),
            ..Default::default()
        };
        let mut state = keyed_state();

        state.map_fields(Some(&route)).unwrap();

        assert_eq!(state.next_hop, object("internet", None));
        assert!(state.labels.is_null());
    }

    #[test]
    fn missing_wrappers_are_null() {
        let route = Route {
            id: Some("routeId".to_owned()),
            ..Default::default()
        };
        let mut state = keyed_state();

        state.map_fields(Some(&route)).unwrap();

        assert!(state.destination.is_null());
        assert!(state.next_hop.is_null());
    }

    #[test]
    fn missing_response_is_an_error() {
        let mut state = keyed_state();
        assert!(state.map_fields(None).is_err());
        assert_eq!(state, keyed_state());
    }

    #[test]
    fn missing_id_leaves_state_unchanged() {
        let route = Route {
            id: None,
            destination: Some(TypedValue::new("cidrv4", Some("10.0.0.0/8"))),
            ..Default::default()
        };
        let mut state = keyed_state();

        assert!(state.map_fields(Some(&route)).is_err());
        assert_eq!(state, keyed_state());
    }

    #[test]
    fn empty_next_hop_wrapper_is_an_error() {
        let route = Route {
            id: Some("routeId".to_owned()),
            nexthop: Some(TypedValue::default()),
            ..Default::default()
        };
        let mut state = keyed_state();

        assert!(state.map_fields(Some(&route)).is_err());
        assert_eq!(state, keyed_state());
    }

    #[test]
    fn create_payload_from_state() {
        let state = RouteState {
            destination: object("cidrv4", Some("10.0.0.0/8")),
            next_hop: object("blackhole", None),
            labels: labels_from(&[("env", "prod")]),
            ..keyed_state()
        };

        let payload = state.to_create_payload().unwrap();

        assert_eq!(
            payload.items,
            vec![RoutePayload {
                destination: TypedValue::new("cidrv4", Some("10.0.0.0/8")),
                nexthop: TypedValue::new("blackhole", None),
                labels: Some(BTreeMap::from([("env".to_owned(), "prod".to_owned())])),
            }]
        );
    }

    #[test]
    fn create_payload_rejects_inconsistent_objects() {
        let state = RouteState {
            destination: object("cidrv4", None),
            next_hop: object("ipv4", Some("10.0.0.1")),
            ..keyed_state()
        };
        assert!(state.to_create_payload().is_err());

        let state = RouteState {
            destination: Value::Null,
            next_hop: object("ipv4", Some("10.0.0.1")),
            ..keyed_state()
        };
        assert!(state.to_create_payload().is_err());
    }

    #[test]
    fn update_payload_diffs_labels() {
        let state = RouteState {
            labels: labels_from(&[("foo1", "bar1"), ("foo2", "bar2")]),
            ..keyed_state()
        };
        let current = labels_from(&[("foo1", "foobar"), ("foo3", "bar3")]);

        let payload = state.to_update_payload(&current).unwrap();

        assert_eq!(
            payload.labels,
            Some(LabelsPatch::from([
                ("foo1".to_owned(), Some("bar1".to_owned())),
                ("foo2".to_owned(), Some("bar2".to_owned())),
                ("foo3".to_owned(), None),
            ]))
        );

        let unchanged = state.to_update_payload(&state.labels).unwrap();
        assert_eq!(unchanged.labels, None);
    }
}
