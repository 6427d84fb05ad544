mod common;

use common::{FakeClient, uuid};
use placement_core::{
    BuildOptions, Edge, ErrorKind, build_provider_forest, build_provider_tree,
    collect_consumer_ids, extend_graph_with_consumers, fetch_consumers,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const PROJECT_ID: &str = "7e67cbf7-7c38-4a32-b85b-0739c690991a";
const USER_ID: &str = "067f691e-725a-451a-83e2-5c3d13e1dffc";

fn consumer_record(allocations: Value) -> Value {
    json!({"allocations": allocations, "project_id": PROJECT_ID, "user_id": USER_ID})
}

fn disk(amount: u64) -> Value {
    json!({"generation": 2, "resources": {"DISK_GB": amount}})
}

#[test]
fn consumer_ids_are_collected_once_from_every_provider() {
    let (rp1, rp2) = (uuid("rp1"), uuid("rp2"));
    let (c1, c2, c3) = (uuid("consumer1"), uuid("consumer2"), uuid("consumer3"));
    let client = FakeClient::new()
        .respond(
            format!("/resource_providers/{rp1}/allocations"),
            json!({"allocations": {&c1: {"resources": {}}, &c2: {"resources": {}}}}),
        )
        .respond(
            format!("/resource_providers/{rp2}/allocations"),
            json!({"allocations": {&c2: {"resources": {}}, &c3: {"resources": {}}}}),
        )
        .respond(format!("/allocations/{c1}"), consumer_record(json!({&rp1: disk(5)})))
        .respond(
            format!("/allocations/{c2}"),
            consumer_record(json!({&rp1: disk(5), &rp2: disk(5)})),
        )
        .respond(format!("/allocations/{c3}"), consumer_record(json!({&rp2: disk(5)})));

    let consumer_ids = collect_consumer_ids(&client, &[&rp1, &rp2]).unwrap();
    assert_eq!(
        client.calls(),
        vec![
            format!("/resource_providers/{rp1}/allocations"),
            format!("/resource_providers/{rp2}/allocations"),
        ]
    );
    assert_eq!(consumer_ids.len(), 3);

    let consumers = fetch_consumers(&client, &consumer_ids).unwrap();
    let mut ids: Vec<&str> = consumers.iter().map(|c| c.id()).collect();
    ids.sort();
    let mut expected = vec![c1.as_str(), c2.as_str(), c3.as_str()];
    expected.sort();
    assert_eq!(ids, expected);

    for consumer_id in [&c1, &c2, &c3] {
        assert_eq!(client.calls_to(&format!("/allocations/{consumer_id}")), 1);
    }
    assert_eq!(client.call_count(), 5);
}

#[test]
fn shared_consumer_yields_one_node_and_two_edges() {
    let (rp1, rp2) = (uuid("rp1"), uuid("rp2"));
    let shared = uuid("consumer2");
    let client = FakeClient::new()
        .providers("/resource_providers", &[(rp1.as_str(), None), (rp2.as_str(), None)])
        .respond(
            format!("/resource_providers/{rp1}/allocations"),
            json!({"allocations": {&shared: {"resources": {"DISK_GB": 5}}}}),
        )
        .respond(
            format!("/resource_providers/{rp2}/allocations"),
            json!({"allocations": {&shared: {"resources": {"DISK_GB": 7}}}}),
        )
        .respond(
            format!("/allocations/{shared}"),
            consumer_record(json!({&rp1: disk(5), &rp2: disk(7)})),
        );

    let mut graph = build_provider_forest(&client, &BuildOptions::new()).unwrap();
    extend_graph_with_consumers(&client, &mut graph).unwrap();

    assert_eq!(graph.consumers().count(), 1);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(client.calls_to(&format!("/allocations/{shared}")), 1);

    let consumer = graph.find_node_by_id(&shared).unwrap();
    let mut amounts: Vec<(String, Value)> = graph
        .allocation_edges()
        .map(|edge| {
            assert_eq!(edge.consumer, consumer);
            (
                graph.node(edge.provider).id().to_string(),
                edge.resources["DISK_GB"].clone(),
            )
        })
        .collect();
    amounts.sort_by(|a, b| a.0.cmp(&b.0));
    let mut expected = vec![(rp1.clone(), json!(5)), (rp2.clone(), json!(7))];
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(amounts, expected);

    let node = graph.node(consumer);
    assert_eq!(node.attrs()["consumer_uuid"], json!(&shared));
    assert_eq!(node.attrs()["project_id"], json!(PROJECT_ID));
    assert!(graph.edges().iter().all(|edge| matches!(edge, Edge::Allocation(_))));
}

#[test]
fn consumer_outside_the_subtree_is_reported() {
    let (root, other) = (uuid("root_rp_A"), uuid("root_rp_B"));
    let consumer = uuid("consumer1");
    let in_tree = format!("/resource_providers?in_tree={root}");
    let client = FakeClient::new()
        .providers(&in_tree, &[(root.as_str(), None)])
        .respond(
            format!("/resource_providers/{root}/allocations"),
            json!({"allocations": {&consumer: {"resources": {"VCPU": 1}}}}),
        )
        .respond(
            format!("/allocations/{consumer}"),
            consumer_record(json!({&root: disk(1), &other: disk(1)})),
        );

    let mut graph = build_provider_tree(&client, &root, &BuildOptions::new()).unwrap();
    let err = extend_graph_with_consumers(&client, &mut graph).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().contains(&other), "{err}");
    assert_eq!(err.context_value("consumer"), Some(consumer.as_str()));
    assert_eq!(graph.consumers().count(), 0);
    assert_eq!(graph.allocation_edges().count(), 0);
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn consumer_fetch_failure_propagates() {
    let rp = uuid("rp1");
    let consumer = uuid("consumer1");
    let client = FakeClient::new()
        .providers("/resource_providers", &[(rp.as_str(), None)])
        .respond(
            format!("/resource_providers/{rp}/allocations"),
            json!({"allocations": {&consumer: {}}}),
        )
        .fail(format!("/allocations/{consumer}"), "500 Internal Server Error");

    let mut graph = build_provider_forest(&client, &BuildOptions::new()).unwrap();
    let err = extend_graph_with_consumers(&client, &mut graph).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFailed);
    assert_eq!(graph.consumers().count(), 0);
}
