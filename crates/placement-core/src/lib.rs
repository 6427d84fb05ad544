pub mod client;
pub mod consumer;
pub mod enrich;
pub mod filter;
pub mod graph;
pub mod printer;
pub mod tree;

pub use placement_error::{Error, ErrorKind, ErrorStatus, Result};

pub use client::PlacementClient;
pub use consumer::{
    add_consumers_to_graph, collect_consumer_ids, extend_graph_with_consumers, fetch_consumers,
};
pub use enrich::enrich_provider;
pub use filter::{
    DEFAULT_DROP_FIELDS, DEFAULT_HIDDEN_FIELDS, Excluding, FieldFilter, FieldSelection,
};
pub use graph::{
    AllocationEdge, Attrs, ConsumerNode, Edge, Graph, Node, NodeIndex, ParentEdge, ProviderNode,
};
pub use printer::render_text;
pub use tree::{
    BuildOptions, Scope, build_provider_forest, build_provider_graph, build_provider_tree,
};
