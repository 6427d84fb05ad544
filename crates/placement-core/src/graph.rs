//! Provider/consumer graph model.
//!
//! The graph owns its nodes in a flat vector and edges refer to them by
//! [`NodeIndex`]. Node identifiers (provider and consumer UUIDs) are unique
//! within one graph; [`Graph::find_node_by_id`] resolves an identifier back to
//! its index.

use std::collections::HashMap;

use serde_json::Value;

use crate::{Error, Result};

/// Attribute map of a node, as decoded from the placement API.
pub type Attrs = serde_json::Map<String, Value>;

/// Position of a node inside its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl std::fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NodeIndex {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A resource provider record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderNode {
    uuid: String,
    attrs: Attrs,
}

impl ProviderNode {
    /// Wrap a provider record. The record must carry a string `uuid`, and
    /// `parent_provider_uuid`, when present, must be a string or null.
    pub fn new(attrs: Attrs) -> Result<Self> {
        let uuid = match attrs.get("uuid") {
            Some(Value::String(uuid)) => uuid.clone(),
            _ => {
                return Err(Error::invalid_format(
                    "resource provider record has no string 'uuid'",
                ));
            }
        };
        match attrs.get("parent_provider_uuid") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => {
                return Err(Error::invalid_format(format!(
                    "resource provider '{uuid}' has a non-string parent_provider_uuid: {other}"
                ))
                .with_context("uuid", uuid));
            }
        }
        Ok(Self { uuid, attrs })
    }

    /// The provider UUID. Survives removal of the `uuid` attribute.
    pub fn id(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(Value::as_str)
    }

    /// Declared parent, `None` for a root.
    pub fn parent_uuid(&self) -> Option<&str> {
        self.attrs.get("parent_provider_uuid").and_then(Value::as_str)
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }
}

/// A consumer (e.g. a server instance) together with its allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerNode {
    uuid: String,
    attrs: Attrs,
}

impl ConsumerNode {
    /// Key under which the consumer's own UUID is stored.
    pub const ID_FIELD: &'static str = "consumer_uuid";
    /// Key of the provider -> allocation map. Drives edges, never rendered.
    pub const ALLOCATIONS_FIELD: &'static str = "allocations";

    /// Wrap a `/allocations/<uuid>` record, tagging it with `consumer_uuid`.
    pub fn new(uuid: impl Into<String>, mut attrs: Attrs) -> Result<Self> {
        let uuid = uuid.into();
        match attrs.get(Self::ALLOCATIONS_FIELD) {
            Some(Value::Object(_)) => {}
            _ => {
                return Err(Error::invalid_format(format!(
                    "allocation record of consumer '{uuid}' has no 'allocations' map"
                ))
                .with_context("consumer", uuid));
            }
        }
        attrs.insert(Self::ID_FIELD.to_string(), Value::String(uuid.clone()));
        Ok(Self { uuid, attrs })
    }

    pub fn id(&self) -> &str {
        &self.uuid
    }

    /// Provider UUID -> `{generation, resources}` map.
    pub fn allocations(&self) -> Option<&Attrs> {
        self.attrs
            .get(Self::ALLOCATIONS_FIELD)
            .and_then(Value::as_object)
    }

    /// Resource class -> amount this consumer holds on `provider`.
    ///
    /// Returns an empty map when the allocation carries no `resources` member.
    pub fn resources_on(&self, provider: &str) -> Attrs {
        self.allocations()
            .and_then(|allocations| allocations.get(provider))
            .and_then(|allocation| allocation.get("resources"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Provider(ProviderNode),
    Consumer(ConsumerNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Provider(provider) => provider.id(),
            Node::Consumer(consumer) => consumer.id(),
        }
    }

    pub fn attrs(&self) -> &Attrs {
        match self {
            Node::Provider(provider) => provider.attrs(),
            Node::Consumer(consumer) => consumer.attrs(),
        }
    }

    pub fn as_provider(&self) -> Option<&ProviderNode> {
        match self {
            Node::Provider(provider) => Some(provider),
            Node::Consumer(_) => None,
        }
    }

    pub fn as_consumer(&self) -> Option<&ConsumerNode> {
        match self {
            Node::Consumer(consumer) => Some(consumer),
            Node::Provider(_) => None,
        }
    }
}

/// `child`'s structural parent is `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentEdge {
    pub child: NodeIndex,
    pub parent: NodeIndex,
}

/// `consumer` draws `resources` from `provider`.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationEdge {
    pub consumer: NodeIndex,
    pub provider: NodeIndex,
    pub resources: Attrs,
}

/// A graph edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    Parent(ParentEdge),
    Allocation(AllocationEdge),
}

impl Edge {
    /// Endpoints in declaration order: (child, parent) or (consumer, provider).
    pub fn endpoints(&self) -> (NodeIndex, NodeIndex) {
        match self {
            Edge::Parent(edge) => (edge.child, edge.parent),
            Edge::Allocation(edge) => (edge.consumer, edge.provider),
        }
    }
}

/// Nodes and edges of one provider forest, optionally with consumers.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_id: HashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Fails when a node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex> {
        if self.by_id.contains_key(node.id()) {
            return Err(Error::invariant_violation(format!(
                "node '{}' is already in the graph",
                node.id()
            ))
            .with_operation("graph::add_node")
            .with_context("id", node.id()));
        }
        let index = NodeIndex::new(self.nodes.len() as u32);
        self.by_id.insert(node.id().to_string(), index);
        self.nodes.push(node);
        Ok(index)
    }

    /// Append an edge. Both endpoints must exist and the edge must be new.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let (node1, node2) = edge.endpoints();
        for index in [node1, node2] {
            if index.as_usize() >= self.nodes.len() {
                return Err(Error::invariant_violation(format!(
                    "edge endpoint {index} is not a node of this graph"
                ))
                .with_operation("graph::add_edge"));
            }
        }
        if self.edges.iter().any(|e| e.endpoints() == (node1, node2)) {
            return Err(Error::invariant_violation(format!(
                "edge {} -> {} already exists",
                self.node(node1).id(),
                self.node(node2).id()
            ))
            .with_operation("graph::add_edge"));
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Resolve a node id to its index.
    pub fn find_node_by_id(&self, id: &str) -> Result<NodeIndex> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| Error::not_found("node", id).with_operation("graph::find_node_by_id"))
    }

    /// # Panics
    /// Panics when `index` does not come from this graph.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.as_usize()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Provider nodes in insertion order.
    pub fn providers(&self) -> impl Iterator<Item = (NodeIndex, &ProviderNode)> {
        self.indexed().filter_map(|(index, node)| Some((index, node.as_provider()?)))
    }

    /// Consumer nodes in insertion order.
    pub fn consumers(&self) -> impl Iterator<Item = (NodeIndex, &ConsumerNode)> {
        self.indexed().filter_map(|(index, node)| Some((index, node.as_consumer()?)))
    }

    pub fn provider_ids(&self) -> Vec<String> {
        self.providers()
            .map(|(_, provider)| provider.id().to_string())
            .collect()
    }

    pub fn parent_edges(&self) -> impl Iterator<Item = &ParentEdge> {
        self.edges.iter().filter_map(|edge| match edge {
            Edge::Parent(edge) => Some(edge),
            Edge::Allocation(_) => None,
        })
    }

    pub fn allocation_edges(&self) -> impl Iterator<Item = &AllocationEdge> {
        self.edges.iter().filter_map(|edge| match edge {
            Edge::Allocation(edge) => Some(edge),
            Edge::Parent(_) => None,
        })
    }

    /// Direct children of `parent`, in edge insertion order.
    pub fn children(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        self.parent_edges()
            .filter(|edge| edge.parent == parent)
            .map(|edge| edge.child)
            .collect()
    }

    /// Providers without a parent edge.
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.providers()
            .map(|(index, _)| index)
            .filter(|index| !self.parent_edges().any(|edge| edge.child == *index))
            .collect()
    }

    /// Allocations drawing from `provider`, in edge insertion order.
    pub fn allocations_from(&self, provider: NodeIndex) -> Vec<&AllocationEdge> {
        self.allocation_edges()
            .filter(|edge| edge.provider == provider)
            .collect()
    }

    /// Pre-order walk of the provider tree under `root` with depths.
    ///
    /// A node comes before its children; siblings keep edge insertion order.
    pub fn walk(&self, root: NodeIndex) -> Vec<(NodeIndex, usize)> {
        let mut visited = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            visited.push((index, depth));
            for child in self.children(index).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        visited
    }

    /// Remove `fields` from every node's attribute map. Absent fields are skipped.
    pub fn drop_fields<S: AsRef<str>>(&mut self, fields: &[S]) {
        if fields.is_empty() {
            return;
        }
        for node in &mut self.nodes {
            let attrs = match node {
                Node::Provider(provider) => &mut provider.attrs,
                Node::Consumer(consumer) => &mut consumer.attrs,
            };
            for field in fields {
                attrs.remove(field.as_ref());
            }
        }
    }

    fn indexed(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex::new(i as u32), node))
    }
}
