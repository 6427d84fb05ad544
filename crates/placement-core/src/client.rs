//! Placement API transport seam and response shapes.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::graph::Attrs;
use crate::{Error, Result};

/// Read-only access to the placement API.
///
/// `get` returns the decoded JSON body for a path relative to the service
/// endpoint (e.g. `/resource_providers`) and fails on any non-success
/// response. Timeouts and retries belong to the implementation.
pub trait PlacementClient: Sync {
    fn get(&self, path: &str) -> Result<Value>;
}

impl<C: PlacementClient + ?Sized> PlacementClient for &C {
    fn get(&self, path: &str) -> Result<Value> {
        (**self).get(path)
    }
}

impl<C: PlacementClient + ?Sized> PlacementClient for Box<C> {
    fn get(&self, path: &str) -> Result<Value> {
        (**self).get(path)
    }
}

pub fn providers_path() -> String {
    "/resource_providers".to_string()
}

pub fn in_tree_path(uuid: &str) -> String {
    format!("/resource_providers?in_tree={uuid}")
}

pub fn inventories_path(uuid: &str) -> String {
    format!("/resource_providers/{uuid}/inventories")
}

pub fn traits_path(uuid: &str) -> String {
    format!("/resource_providers/{uuid}/traits")
}

pub fn aggregates_path(uuid: &str) -> String {
    format!("/resource_providers/{uuid}/aggregates")
}

pub fn usages_path(uuid: &str) -> String {
    format!("/resource_providers/{uuid}/usages")
}

pub fn provider_allocations_path(uuid: &str) -> String {
    format!("/resource_providers/{uuid}/allocations")
}

pub fn consumer_allocations_path(uuid: &str) -> String {
    format!("/allocations/{uuid}")
}

/// `GET /resource_providers`
#[derive(Debug, Deserialize)]
pub struct ProviderList {
    pub resource_providers: Vec<Attrs>,
}

/// `GET /resource_providers/<uuid>/usages`
#[derive(Debug, Deserialize)]
pub struct UsageList {
    pub usages: Attrs,
}

/// `GET /resource_providers/<uuid>/allocations`
#[derive(Debug, Deserialize)]
pub struct ProviderAllocations {
    pub allocations: Attrs,
}

/// Fetch `path` and decode the body into `T`.
pub fn fetch<T, C>(client: &C, path: &str) -> Result<T>
where
    T: DeserializeOwned,
    C: PlacementClient + ?Sized,
{
    debug!(path, "GET");
    let body = client.get(path)?;
    serde_json::from_value(body).map_err(|err| {
        Error::from(err)
            .with_operation("client::fetch")
            .with_context("path", path)
    })
}

/// Fetch `path` as a JSON object that must contain `member`.
pub fn fetch_object<C>(client: &C, path: &str, member: &str) -> Result<Attrs>
where
    C: PlacementClient + ?Sized,
{
    let body: Attrs = fetch(client, path)?;
    if !body.contains_key(member) {
        return Err(Error::new(
            crate::ErrorKind::DeserializationFailed,
            format!("response has no '{member}' member"),
        )
        .with_operation("client::fetch_object")
        .with_context("path", path));
    }
    Ok(body)
}
