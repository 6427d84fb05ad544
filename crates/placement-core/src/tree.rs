//! Resource provider tree construction.
//!
//! A build runs in fixed phases:
//! 1. list providers (whole forest or one tree via `in_tree`)
//! 2. enrich every record
//! 3. wrap records as nodes and link each child to its parent
//! 4. drop unwanted fields
//!
//! Field dropping runs last because `parent_provider_uuid` is usually one of
//! the dropped fields and linking reads it.

use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::client::{PlacementClient, ProviderList, fetch, in_tree_path, providers_path};
use crate::enrich::enrich_provider;
use crate::filter::DEFAULT_DROP_FIELDS;
use crate::graph::{Attrs, Edge, Graph, Node, NodeIndex, ParentEdge, ProviderNode};
use crate::{Error, Result};

/// Which providers to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every provider known to placement.
    Forest,
    /// The tree that contains this provider.
    Tree(String),
}

/// Options for building a provider graph.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Fields removed from every node after linking.
    pub drop_fields: Vec<String>,
    /// Enrich providers concurrently (default: false for strict request order).
    pub parallel: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options dropping [`DEFAULT_DROP_FIELDS`].
    pub fn with_default_drop_fields(self) -> Self {
        self.with_drop_fields(DEFAULT_DROP_FIELDS)
    }

    pub fn with_drop_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Build the tree containing provider `uuid`.
pub fn build_provider_tree<C>(client: &C, uuid: &str, options: &BuildOptions) -> Result<Graph>
where
    C: PlacementClient + ?Sized,
{
    build_provider_graph(client, &Scope::Tree(uuid.to_string()), options)
}

/// Build every provider tree known to placement.
pub fn build_provider_forest<C>(client: &C, options: &BuildOptions) -> Result<Graph>
where
    C: PlacementClient + ?Sized,
{
    build_provider_graph(client, &Scope::Forest, options)
}

/// Build a graph of provider nodes and parent edges for `scope`.
pub fn build_provider_graph<C>(client: &C, scope: &Scope, options: &BuildOptions) -> Result<Graph>
where
    C: PlacementClient + ?Sized,
{
    let list_start = Instant::now();
    let records = list_providers(client, scope)?;
    info!(
        "Provider listing: {:.2}s ({} providers)",
        list_start.elapsed().as_secs_f64(),
        records.len()
    );

    let enrich_start = Instant::now();
    let records = enrich_all(client, records, options.parallel)?;
    info!(
        "Provider enrichment: {:.2}s",
        enrich_start.elapsed().as_secs_f64()
    );

    let mut graph = Graph::new();
    for record in records {
        graph.add_node(Node::Provider(ProviderNode::new(record)?))?;
    }
    link_parents(&mut graph).map_err(|e| e.with_operation("tree::build_provider_graph"))?;
    graph.drop_fields(&options.drop_fields);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "provider graph built"
    );
    Ok(graph)
}

fn list_providers<C>(client: &C, scope: &Scope) -> Result<Vec<Attrs>>
where
    C: PlacementClient + ?Sized,
{
    match scope {
        Scope::Forest => {
            Ok(fetch::<ProviderList, _>(client, &providers_path())?.resource_providers)
        }
        Scope::Tree(uuid) => {
            let listing: ProviderList = fetch(client, &in_tree_path(uuid))?;
            // Checked before enrichment so a bad uuid costs a single request.
            if listing.resource_providers.is_empty() {
                return Err(Error::not_found("resource provider", uuid.as_str())
                    .with_operation("tree::list_providers"));
            }
            Ok(listing.resource_providers)
        }
    }
}

fn enrich_all<C>(client: &C, records: Vec<Attrs>, parallel: bool) -> Result<Vec<Attrs>>
where
    C: PlacementClient + ?Sized,
{
    if parallel {
        records
            .into_par_iter()
            .map(|record| enrich_provider(client, record))
            .collect()
    } else {
        records
            .into_iter()
            .map(|record| enrich_provider(client, record))
            .collect()
    }
}

/// Add one parent edge per provider that declares a parent.
fn link_parents(graph: &mut Graph) -> Result<()> {
    let links: Vec<(NodeIndex, String, String)> = graph
        .providers()
        .filter_map(|(index, provider)| {
            let parent = provider.parent_uuid()?;
            Some((index, provider.id().to_string(), parent.to_string()))
        })
        .collect();

    for (child, child_uuid, parent_uuid) in links {
        let parent = graph.find_node_by_id(&parent_uuid).map_err(|_| {
            Error::invariant_violation(format!(
                "parent '{parent_uuid}' of resource provider '{child_uuid}' \
                 was not returned by placement"
            ))
            .with_operation("tree::link_parents")
            .with_context("provider", child_uuid.as_str())
            .with_context("parent", parent_uuid.as_str())
        })?;
        graph.add_edge(Edge::Parent(ParentEdge { child, parent }))?;
    }
    Ok(())
}
