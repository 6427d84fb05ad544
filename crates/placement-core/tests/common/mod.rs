use std::collections::HashMap;

use parking_lot::Mutex;
use placement_core::{Error, PlacementClient, Result};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Namespace for deterministic fixture uuids.
const TEST_NAMESPACE: Uuid = Uuid::from_u128(0xbba8b4ac_5e1e_5a54_825d_0ebaf96d60b3);

/// Stable uuid derived from `name`, e.g. `uuid("root_rp_A")`.
#[allow(dead_code)]
pub fn uuid(name: &str) -> String {
    Uuid::new_v5(&TEST_NAMESPACE, name.as_bytes()).to_string()
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory placement API answering canned bodies per path.
///
/// Unknown paths fail like a 404 would. Every request is recorded.
#[derive(Default)]
pub struct FakeClient {
    responses: HashMap<String, Value>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: impl Into<String>, body: Value) -> Self {
        self.responses.insert(path.into(), body);
        self
    }

    pub fn fail(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(path.into(), message.into());
        self
    }

    /// Answer the four enrichment requests of `uuid` with empty data.
    pub fn empty_enrichment(self, uuid: &str) -> Self {
        self.enrichment(uuid, json!({}), json!({}))
    }

    /// Answer the enrichment requests of `uuid` with the given inventories and usages.
    pub fn enrichment(self, uuid: &str, inventories: Value, usages: Value) -> Self {
        self.respond(
            format!("/resource_providers/{uuid}/inventories"),
            json!({"inventories": inventories, "resource_provider_generation": 1}),
        )
        .respond(
            format!("/resource_providers/{uuid}/traits"),
            json!({"traits": [], "resource_provider_generation": 1}),
        )
        .respond(
            format!("/resource_providers/{uuid}/aggregates"),
            json!({"aggregates": [], "resource_provider_generation": 1}),
        )
        .respond(
            format!("/resource_providers/{uuid}/usages"),
            json!({"usages": usages, "resource_provider_generation": 1}),
        )
    }

    /// Serve `providers` as `(uuid, parent)` pairs from `path`, each with empty enrichment.
    pub fn providers(mut self, path: &str, providers: &[(&str, Option<&str>)]) -> Self {
        let records: Vec<Value> = providers
            .iter()
            .map(|(uuid, parent)| {
                json!({
                    "uuid": uuid,
                    "name": format!("name-{uuid}"),
                    "generation": 0,
                    "parent_provider_uuid": parent,
                    "root_provider_uuid": null,
                    "links": [],
                })
            })
            .collect();
        self = self.respond(path, json!({"resource_providers": records}));
        for (uuid, _) in providers {
            self = self.empty_enrichment(uuid);
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|call| *call == path).count()
    }
}

impl PlacementClient for FakeClient {
    fn get(&self, path: &str) -> Result<Value> {
        self.calls.lock().push(path.to_string());
        if let Some(message) = self.failures.get(path) {
            return Err(Error::transport_failed(path, message.clone()).with_operation("fake::get"));
        }
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| {
                Error::transport_failed(path, "404 Not Found").with_operation("fake::get")
            })
    }
}
