//! Consumer discovery and allocation linking.
//!
//! Consumers are found through the allocation listing of every provider in
//! the graph. A consumer that allocates from several providers shows up in
//! several listings but is fetched and added once, so the request count is
//! one per provider plus one per distinct consumer.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info};

use crate::client::{
    PlacementClient, ProviderAllocations, consumer_allocations_path, fetch,
    provider_allocations_path,
};
use crate::graph::{AllocationEdge, Attrs, ConsumerNode, Edge, Graph, Node, NodeIndex};
use crate::{Error, Result};

/// Add every consumer allocating from a provider of `graph`, with one
/// allocation edge per (consumer, provider) pair.
///
/// Fails with `NotFound` when a consumer also allocates from a provider that
/// is not part of the graph, which happens when only one tree was built.
pub fn extend_graph_with_consumers<C>(client: &C, graph: &mut Graph) -> Result<()>
where
    C: PlacementClient + ?Sized,
{
    let start = Instant::now();
    let provider_ids = graph.provider_ids();
    let consumer_ids = collect_consumer_ids(client, &provider_ids)?;
    let consumers = fetch_consumers(client, &consumer_ids)?;
    add_consumers_to_graph(graph, consumers)?;
    info!(
        "Consumer linking: {:.2}s ({} consumers from {} providers)",
        start.elapsed().as_secs_f64(),
        consumer_ids.len(),
        provider_ids.len()
    );
    Ok(())
}

/// Distinct consumer ids allocating from any of `provider_ids`, in the order
/// they were first seen.
pub fn collect_consumer_ids<C, S>(client: &C, provider_ids: &[S]) -> Result<Vec<String>>
where
    C: PlacementClient + ?Sized,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut consumer_ids = Vec::new();
    for provider_id in provider_ids {
        let listing: ProviderAllocations =
            fetch(client, &provider_allocations_path(provider_id.as_ref()))?;
        for consumer_id in listing.allocations.keys() {
            if seen.insert(consumer_id.clone()) {
                consumer_ids.push(consumer_id.clone());
            }
        }
    }
    debug!(count = consumer_ids.len(), "collected consumer ids");
    Ok(consumer_ids)
}

/// Fetch the full allocation record of every consumer.
pub fn fetch_consumers<C, S>(client: &C, consumer_ids: &[S]) -> Result<Vec<ConsumerNode>>
where
    C: PlacementClient + ?Sized,
    S: AsRef<str>,
{
    consumer_ids
        .iter()
        .map(|consumer_id| {
            let consumer_id = consumer_id.as_ref();
            let record: Attrs = fetch(client, &consumer_allocations_path(consumer_id))?;
            ConsumerNode::new(consumer_id, record)
        })
        .collect()
}

/// Append `consumers` to `graph` and link each to the providers it allocates from.
///
/// Every provider is resolved before the graph is touched, so on error the
/// graph is left as it was.
pub fn add_consumers_to_graph(graph: &mut Graph, consumers: Vec<ConsumerNode>) -> Result<()> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(consumers.len());
    for consumer in consumers {
        let in_graph = graph.find_node_by_id(consumer.id()).is_ok();
        if in_graph || !seen.insert(consumer.id().to_string()) {
            return Err(Error::invariant_violation(format!(
                "consumer '{}' is already part of the graph",
                consumer.id()
            ))
            .with_operation("consumer::add_consumers_to_graph")
            .with_context("consumer", consumer.id()));
        }
        let links = resolve_providers(graph, &consumer)?;
        resolved.push((consumer, links));
    }

    for (consumer, links) in resolved {
        let consumer = graph.add_node(Node::Consumer(consumer))?;
        for (provider, resources) in links {
            graph.add_edge(Edge::Allocation(AllocationEdge {
                consumer,
                provider,
                resources,
            }))?;
        }
    }
    Ok(())
}

/// Provider node and allocated resources for every allocation of `consumer`.
fn resolve_providers(graph: &Graph, consumer: &ConsumerNode) -> Result<Vec<(NodeIndex, Attrs)>> {
    let Some(allocations) = consumer.allocations() else {
        return Ok(Vec::new());
    };
    allocations
        .keys()
        .map(|provider_id| -> Result<(NodeIndex, Attrs)> {
            let provider = graph
                .find_node_by_id(provider_id)
                .ok()
                .filter(|index| graph.node(*index).as_provider().is_some())
                .ok_or_else(|| {
                    Error::not_found("resource provider", provider_id.as_str())
                        .with_operation("consumer::add_consumers_to_graph")
                        .with_context("consumer", consumer.id())
                })?;
            Ok((provider, consumer.resources_on(provider_id)))
        })
        .collect()
}
