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
use std::sync::Arc;

use async_trait::async_trait;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::schema::Schema;
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::config::ProviderData;
use crate::id::parse_id;
use crate::utils::{report_error, OrReport, WithResponse, WithSchema, WithValidate};

use super::state::RouteState;
use super::{ID_FIELDS, TYPE_NAME};

#[derive(Debug, Clone)]
pub struct RouteResource {
    provider: Arc<ProviderData>,
}

impl RouteResource {
    pub fn new(provider: Arc<ProviderData>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Resource for RouteResource {
    type State<'a> = RouteState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(RouteState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let configured = self.provider.get_beta(diags, TYPE_NAME).await?;
        let mut state = state;

        let response = {
            let key = state.key().or_report(diags, "Error reading routing table route")?;
            let route_id = state
                .route_id()
                .or_report(diags, "Error reading routing table route")?;
            configured.client.get_route(key, route_id).await
        };
        let route = match response {
            Ok(route) => route,
            Err(err) if err.is_not_found() => {
                tracing::info!(
                    id = state.id.as_deref_option(),
                    "routing table route not found, removing it from state"
                );
                return None;
            }
            Err(err) => {
                report_error(diags, "Error reading routing table route", err);
                return None;
            }
        };

        state
            .map_fields(Some(&route))
            .or_report(diags, "Error reading routing table route")?;
        tracing::info!(id = state.id.as_deref_option(), "routing table route read");

        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        self.provider.get_beta(diags, TYPE_NAME).await?;

        let mut state = proposed_state;
        state.id = Value::Unknown;
        state.route_id = Value::Unknown;
        state.created_at = Value::Unknown;
        state.updated_at = Value::Unknown;
        if state.region.is_null() {
            state.region = self
                .provider
                .default_region()
                .await
                .map_or(Value::Unknown, |region| Value::Value(Cow::Owned(region)));
        }

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut state = proposed_state;
        let mut trigger_replace = Vec::new();

        for (name, prior, proposed) in [
            ("organization_id", &prior_state.organization_id, &state.organization_id),
            ("region", &prior_state.region, &state.region),
            ("network_area_id", &prior_state.network_area_id, &state.network_area_id),
            ("routing_table_id", &prior_state.routing_table_id, &state.routing_table_id),
        ] {
            if prior != proposed {
                trigger_replace.push(AttributePath::new(name));
            }
        }
        if prior_state.destination != state.destination {
            trigger_replace.push(AttributePath::new("destination"));
        }
        if prior_state.next_hop != state.next_hop {
            trigger_replace.push(AttributePath::new("next_hop"));
        }

        if !trigger_replace.is_empty() {
            state.id = Value::Unknown;
            state.route_id = Value::Unknown;
            state.created_at = Value::Unknown;
            state.updated_at = Value::Unknown;
        } else if prior_state.labels != state.labels {
            state.updated_at = Value::Unknown;
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        const SUMMARY: &str = "Error creating routing table route";
        let configured = self.provider.get_beta(diags, TYPE_NAME).await?;

        let mut state = planned_state;
        state.region = configured.region(&state.region);
        let payload = state.to_create_payload().or_report(diags, SUMMARY)?;

        let routes = {
            let key = state.key().or_report(diags, SUMMARY)?;
            configured.client.add_routes(key, &payload).await
        }
        .or_report(diags, SUMMARY)?;

        let Some(route) = routes.items.unwrap_or_default().into_iter().next() else {
            report_error(diags, SUMMARY, "Empty response from the API");
            return None;
        };

        if let Err(err) = state.map_fields(Some(&route)) {
            report_error(
                diags,
                SUMMARY,
                format!("Processing API payload: {err:#}"),
            );
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "routing table route created");

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        const SUMMARY: &str = "Error updating routing table route";
        let configured = self.provider.get_beta(diags, TYPE_NAME).await?;

        let mut state = planned_state;
        let payload = state
            .to_update_payload(&prior_state.labels)
            .or_report(diags, SUMMARY)?;

        let route = {
            let key = state.key().or_report(diags, SUMMARY)?;
            let route_id = state.route_id().or_report(diags, SUMMARY)?;
            configured.client.update_route(key, route_id, &payload).await
        }
        .or_report(diags, SUMMARY)?;

        if let Err(err) = state.map_fields(Some(&route)) {
            report_error(
                diags,
                SUMMARY,
                format!("Processing API payload: {err:#}"),
            );
            return None;
        }
        tracing::info!(id = state.id.as_deref_option(), "routing table route updated");

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        const SUMMARY: &str = "Error deleting routing table route";
        let configured = self.provider.get_beta(diags, TYPE_NAME).await?;

        let key = state.key().or_report(diags, SUMMARY)?;
        let route_id = state.route_id().or_report(diags, SUMMARY)?;
        match configured.client.delete_route(key, route_id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::warn!(route_id, "routing table route already deleted");
            }
            Err(err) => {
                report_error(diags, SUMMARY, err);
                return None;
            }
        }
        tracing::info!(id = state.id.as_deref_option(), "routing table route deleted");

        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let [organization_id, region, network_area_id, routing_table_id, route_id] =
            parse_id(&id, ID_FIELDS).or_report(diags, "Error importing routing table route")?;
        let owned = |part: &str| Value::Value(Cow::Owned(part.to_owned()));

        let state = RouteState {
            organization_id: owned(organization_id),
            region: owned(region),
            network_area_id: owned(network_area_id),
            routing_table_id: owned(routing_table_id),
            route_id: owned(route_id),
            id: owned(&id),
            ..Default::default()
        };
        tracing::info!(%id, "routing table route state imported");

        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::tests::test_settings;
    use crate::labels::labels_from;
    use crate::route::state::TypedObject;

    const ROUTES_PATH: &str =
        "/v2alpha1/organizations/orgId/network-areas/areaId/regions/eu02/routing-tables/tableId/routes";

    async fn resource(server: &MockServer, enable_beta_resources: bool) -> RouteResource {
        let provider = ProviderData::default().with_wait_interval(Duration::from_millis(5));
        provider
            .configure(test_settings(&server.uri(), enable_beta_resources))
            .await
            .unwrap();
        RouteResource::new(Arc::new(provider))
    }

    fn planned() -> RouteState<'static> {
        RouteState {
            organization_id: Value::Value(Cow::Borrowed("orgId")),
            region: Value::Value(Cow::Borrowed("eu02")),
            network_area_id: Value::Value(Cow::Borrowed("areaId")),
            routing_table_id: Value::Value(Cow::Borrowed("tableId")),
            destination: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("cidrv4")),
                value: Value::Value(Cow::Borrowed("58.251.236.138/32")),
            }),
            next_hop: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("ipv4")),
                value: Value::Value(Cow::Borrowed("10.20.42.2")),
            }),
            labels: labels_from(&[("foo1", "bar1")]),
            ..Default::default()
        }
    }

    fn route_body(labels: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "routeId",
            "destination": {"type": "cidrv4", "value": "58.251.236.138/32"},
            "nexthop": {"type": "ipv4", "value": "10.20.42.2"},
            "labels": labels,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z",
        })
    }

    #[tokio::test]
    async fn create_maps_the_first_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ROUTES_PATH))
            .and(body_json(json!({
                "items": [{
                    "destination": {"type": "cidrv4", "value": "58.251.236.138/32"},
                    "nexthop": {"type": "ipv4", "value": "10.20.42.2"},
                    "labels": {"foo1": "bar1"},
                }]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [route_body(json!({"foo1": "bar1"}))]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server, true).await;
        let mut diags = Diagnostics::default();
        let (state, _) = Resource::create(
            &resource,
            &mut diags,
            planned(),
            planned(),
            Default::default(),
            Default::default(),
        )
        .await
        .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(diags.warnings.len(), 1);
        assert_eq!(
            state.id.as_deref_option(),
            Some("orgId,eu02,areaId,tableId,routeId")
        );
        assert_eq!(state.labels, labels_from(&[("foo1", "bar1")]));
    }

    #[tokio::test]
    async fn create_fails_on_empty_item_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ROUTES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let resource = resource(&server, true).await;
        let mut diags = Diagnostics::default();
        let created = Resource::create(
            &resource,
            &mut diags,
            planned(),
            planned(),
            Default::default(),
            Default::default(),
        )
        .await;

        assert!(created.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn beta_resources_must_be_enabled() {
        let server = MockServer::start().await;
        let resource = resource(&server, false).await;
        let mut diags = Diagnostics::default();

        let created = Resource::create(
            &resource,
            &mut diags,
            planned(),
            planned(),
            Default::default(),
            Default::default(),
        )
        .await;

        assert!(created.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn read_removes_missing_route() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ROUTES_PATH}/routeId")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = resource(&server, true).await;
        let mut diags = Diagnostics::default();
        let state = RouteState {
            route_id: Value::Value(Cow::Borrowed("routeId")),
            ..planned()
        };
        let read =
            Resource::read(&resource, &mut diags, state, Default::default(), Default::default())
                .await;

        assert!(read.is_none());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn update_sends_label_diff() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("{ROUTES_PATH}/routeId")))
            .and(body_json(json!({
                "labels": {"foo1": "bar1", "foo2": "bar2", "foo3": null}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(route_body(json!({"foo1": "bar1", "foo2": "bar2"}))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resource = resource(&server, true).await;
        let prior = RouteState {
            route_id: Value::Value(Cow::Borrowed("routeId")),
            labels: labels_from(&[("foo1", "foobar"), ("foo3", "bar3")]),
            ..planned()
        };
        let planned = RouteState {
            labels: labels_from(&[("foo1", "bar1"), ("foo2", "bar2")]),
            ..prior.clone()
        };
        let mut diags = Diagnostics::default();
        let (state, _) = Resource::update(
            &resource,
            &mut diags,
            prior,
            planned.clone(),
            planned,
            Default::default(),
            Default::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            state.labels,
            labels_from(&[("foo1", "bar1"), ("foo2", "bar2")])
        );
    }

    #[tokio::test]
    async fn destroy_tolerates_missing_route() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{ROUTES_PATH}/routeId")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resource = resource(&server, true).await;
        let mut diags = Diagnostics::default();
        let state = RouteState {
            route_id: Value::Value(Cow::Borrowed("routeId")),
            ..planned()
        };

        assert!(Resource::destroy(
            &resource,
            &mut diags,
            state,
            Default::default(),
            Default::default()
        )
        .await
        .is_some());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn plan_update_replaces_on_next_hop_change() {
        let server = MockServer::start().await;
        let resource = resource(&server, true).await;
        let prior = RouteState {
            id: Value::Value(Cow::Borrowed("orgId,eu02,areaId,tableId,routeId")),
            route_id: Value::Value(Cow::Borrowed("routeId")),
            ..planned()
        };
        let proposed = RouteState {
            next_hop: Value::Value(TypedObject {
                kind: Value::Value(Cow::Borrowed("internet")),
                value: Value::Null,
            }),
            ..prior.clone()
        };
        let mut diags = Diagnostics::default();

        let (state, _, replace) = Resource::plan_update(
            &resource,
            &mut diags,
            prior.clone(),
            proposed.clone(),
            proposed,
            Default::default(),
            Default::default(),
        )
        .await
        .unwrap();

        assert_eq!(replace.len(), 1);
        assert!(state.route_id.is_unknown());

        let labels_only = RouteState {
            labels: labels_from(&[("foo2", "bar2")]),
            ..prior.clone()
        };
        let (state, _, replace) = Resource::plan_update(
            &resource,
            &mut diags,
            prior,
            labels_only.clone(),
            labels_only,
            Default::default(),
            Default::default(),
        )
        .await
        .unwrap();

        assert!(replace.is_empty());
        assert!(state.updated_at.is_unknown());
        assert_eq!(state.route_id.as_deref_option(), Some("routeId"));
    }

    #[tokio::test]
    async fn import_splits_the_identifier() {
        let server = MockServer::start().await;
        let resource = resource(&server, true).await;
        let mut diags = Diagnostics::default();

        let (state, _) = Resource::import(
            &resource,
            &mut diags,
            "orgId,eu02,areaId,tableId,routeId".to_owned(),
        )
        .await
        .unwrap();
        assert_eq!(state.region.as_deref_option(), Some("eu02"));
        assert_eq!(state.route_id.as_deref_option(), Some("routeId"));

        let imported =
            Resource::import(&resource, &mut diags, "orgId,eu02,areaId".to_owned()).await;
        assert!(imported.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
