use std::collections::HashMap;

use placement_core::{Error, PlacementClient, Result};
use serde_json::{Value, json};

/// Canned placement API: one compute node with a NUMA child and one instance.
pub struct FakePlacement {
    responses: HashMap<String, Value>,
}

pub const COMPUTE: &str = "0a3e0f3c-7c8e-4d0a-9a53-0d6f5f8e2b11";
pub const NUMA: &str = "5b1c4d2e-3f60-4a7b-8c9d-0e1f2a3b4c5d";
pub const INSTANCE: &str = "9d8c7b6a-5f4e-4d3c-2b1a-0f9e8d7c6b5a";

impl FakePlacement {
    pub fn new() -> Self {
        let providers = json!({"resource_providers": [
            {
                "uuid": COMPUTE,
                "name": "compute-0",
                "generation": 3,
                "parent_provider_uuid": null,
                "root_provider_uuid": COMPUTE,
                "links": [{"rel": "self", "href": "/resource_providers/x"}],
            },
            {
                "uuid": NUMA,
                "name": "compute-0_numa0",
                "generation": 5,
                "parent_provider_uuid": COMPUTE,
                "root_provider_uuid": COMPUTE,
                "links": [],
            },
        ]});

        let mut responses = HashMap::new();
        responses.insert("/resource_providers".to_string(), providers.clone());
        responses.insert(format!("/resource_providers?in_tree={COMPUTE}"), providers.clone());
        responses.insert(format!("/resource_providers?in_tree={NUMA}"), providers);

        for (uuid, inventories, usages, traits) in [
            (
                COMPUTE,
                json!({"DISK_GB": {"total": 100}}),
                json!({"DISK_GB": 10}),
                json!(["COMPUTE_STATUS_ENABLED"]),
            ),
            (NUMA, json!({"VCPU": {"total": 8}}), json!({"VCPU": 2}), json!([])),
        ] {
            let rp = format!("/resource_providers/{uuid}");
            responses.insert(
                format!("{rp}/inventories"),
                json!({"inventories": inventories, "resource_provider_generation": 1}),
            );
            responses.insert(
                format!("{rp}/traits"),
                json!({"traits": traits, "resource_provider_generation": 1}),
            );
            responses.insert(
                format!("{rp}/aggregates"),
                json!({"aggregates": [], "resource_provider_generation": 1}),
            );
            responses.insert(
                format!("{rp}/usages"),
                json!({"usages": usages, "resource_provider_generation": 1}),
            );
        }

        responses.insert(
            format!("/resource_providers/{COMPUTE}/allocations"),
            json!({"allocations": {INSTANCE: {"resources": {"DISK_GB": 10}}}}),
        );
        responses.insert(
            format!("/resource_providers/{NUMA}/allocations"),
            json!({"allocations": {INSTANCE: {"resources": {"VCPU": 2}}}}),
        );
        responses.insert(
            format!("/allocations/{INSTANCE}"),
            json!({
                "allocations": {
                    COMPUTE: {"generation": 3, "resources": {"DISK_GB": 10}},
                    NUMA: {"generation": 5, "resources": {"VCPU": 2}},
                },
                "project_id": "demo",
                "user_id": "admin",
            }),
        );

        Self { responses }
    }
}

impl FakePlacement {
    /// Answer `path` with `body`, replacing any canned response.
    pub fn respond(mut self, path: impl Into<String>, body: Value) -> Self {
        self.responses.insert(path.into(), body);
        self
    }
}

impl PlacementClient for FakePlacement {
    fn get(&self, path: &str) -> Result<Value> {
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| Error::transport_failed(path, "404 Not Found"))
    }
}
