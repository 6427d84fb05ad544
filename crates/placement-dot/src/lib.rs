//! Graph rendering module for producing DOT format output.
//!
//! Every node becomes a plaintext-shaped node labelled with an HTML-like table
//! of its attributes. Parent edges point from parent to child with `dir=back`
//! so Graphviz lays roots out on top; allocation edges point from provider to
//! consumer, dashed, labelled with the consumed resources.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT builder and escaping helpers
//! - [`html`]: attribute tables for node and edge labels

pub mod dot;
pub mod html;

use placement_core::{
    AllocationEdge, ConsumerNode, Edge, Excluding, FieldFilter, FieldSelection, Graph, Node,
    ParentEdge,
};
use tracing::debug;

pub use dot::{AttrValue, DotBuilder};

/// Header row of allocation edge labels.
const CONSUMES_HEADER: &str = "consumes";

/// Render `graph` to DOT, showing only the attributes `filter` accepts.
///
/// Nodes are written in insertion order, then edges in insertion order, so
/// the output is identical for identical graphs.
pub fn render_graph(graph: &Graph, filter: &dyn FieldFilter) -> String {
    let mut builder = DotBuilder::new();
    builder.node_style(&[("shape", AttrValue::Text("plaintext"))]);

    for node in graph.nodes() {
        let label = match node {
            Node::Provider(provider) => html::render_table(provider.attrs(), filter, None),
            Node::Consumer(consumer) => {
                let without_allocations = Excluding::new(ConsumerNode::ALLOCATIONS_FIELD, filter);
                html::render_table(consumer.attrs(), &without_allocations, None)
            }
        };
        builder.node(node.id(), &[("label", AttrValue::Html(&label))]);
    }

    for edge in graph.edges() {
        match edge {
            Edge::Parent(ParentEdge { child, parent }) => {
                builder.edge(
                    graph.node(*parent).id(),
                    graph.node(*child).id(),
                    &[("dir", AttrValue::Text("back")), ("label", AttrValue::Text("parent"))],
                );
            }
            Edge::Allocation(AllocationEdge {
                consumer,
                provider,
                resources,
            }) => {
                let label =
                    html::render_table(resources, &FieldSelection::All, Some(CONSUMES_HEADER));
                builder.edge(
                    graph.node(*provider).id(),
                    graph.node(*consumer).id(),
                    &[
                        ("dir", AttrValue::Text("back")),
                        ("style", AttrValue::Text("dashed")),
                        ("minlen", AttrValue::Text("2")),
                        ("label", AttrValue::Html(&label)),
                    ],
                );
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "rendered dot graph"
    );
    builder.build()
}

/// Render `graph` with the default field selection.
pub fn render_graph_default(graph: &Graph) -> String {
    render_graph(graph, &FieldSelection::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::{ConsumerNode, ProviderNode, add_consumers_to_graph};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn provider(attrs: Value) -> Node {
        Node::Provider(ProviderNode::new(attrs.as_object().unwrap().clone()).unwrap())
    }

    fn tree() -> Graph {
        let mut graph = Graph::new();
        let nodes = [
            json!({"uuid": "4", "name": "grand", "generation": 1}),
            json!({"uuid": "2", "name": "child1", "generation": 1}),
            json!({"uuid": "3", "name": "child2", "generation": 1}),
            json!({"uuid": "1", "name": "root", "generation": 1}),
        ];
        for attrs in nodes {
            graph.add_node(provider(attrs)).unwrap();
        }
        for (child, parent) in [("2", "1"), ("3", "1"), ("4", "3")] {
            let child = graph.find_node_by_id(child).unwrap();
            let parent = graph.find_node_by_id(parent).unwrap();
            graph.add_edge(Edge::Parent(ParentEdge { child, parent })).unwrap();
        }
        graph
    }

    fn statements(dot: &str) -> Vec<&str> {
        dot.lines()
            .map(str::trim_start)
            .filter(|line| line.starts_with('"'))
            .collect()
    }

    #[test]
    fn test_nodes_then_edges_in_insertion_order() {
        let dot = render_graph(&tree(), &FieldSelection::All);

        assert!(dot.starts_with("digraph {\n  node [shape=plaintext]\n"));
        assert!(dot.ends_with("}\n"));
        let heads: Vec<&str> = statements(&dot)
            .into_iter()
            .map(|line| line.split(" [").next().unwrap())
            .collect();
        assert_eq!(
            heads,
            vec![
                "\"4\"",
                "\"2\"",
                "\"3\"",
                "\"1\"",
                "\"1\" -> \"2\"",
                "\"1\" -> \"3\"",
                "\"3\" -> \"4\"",
            ]
        );
        assert!(dot.contains("\"3\" -> \"4\" [dir=back, label=parent]\n"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let graph = tree();
        assert_eq!(
            render_graph(&graph, &FieldSelection::All),
            render_graph(&graph, &FieldSelection::All)
        );
    }

    #[test]
    fn test_filter_selects_node_fields() {
        let filter = |name: &str| name == "uuid" || name == "name";
        let dot = render_graph(&tree(), &filter);
        assert!(!dot.contains("generation"));
        assert!(dot.contains(">name</TD>"));
        assert!(dot.contains(">uuid</TD>"));

        let dot = render_graph_default(&tree());
        assert!(!dot.contains("generation"));
    }

    #[test]
    fn test_consumer_nodes_and_allocation_edges() {
        let mut graph = tree();
        let record = json!({
            "allocations": {"4": {"generation": 3, "resources": {"VCPU": 2}}},
            "project_id": "p",
            "user_id": "u",
        });
        let consumer = ConsumerNode::new("c1", record.as_object().unwrap().clone()).unwrap();
        add_consumers_to_graph(&mut graph, vec![consumer]).unwrap();

        let dot = render_graph(&graph, &FieldSelection::All);

        assert!(!dot.contains(">allocations</TD>"));
        assert!(dot.contains(">consumer_uuid</TD><TD  ALIGN=\"LEFT\" BALIGN=\"LEFT\">c1</TD>"));
        assert!(dot.contains(">project_id</TD>"));
        let edge = "  \"4\" -> \"c1\" [dir=back, style=dashed, minlen=2, label=<\
<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">
<TR BORDER=\"0\" CELLBORDER=\"0\"><TD ALIGN=\"LEFT\" BALIGN=\"LEFT\" BORDER=\"0\">consumes</TD></TR>
<TR><TD  ALIGN=\"LEFT\" BALIGN=\"LEFT\">VCPU</TD><TD  ALIGN=\"LEFT\" BALIGN=\"LEFT\">2</TD></TR>
</TABLE>
>]
";
        assert!(dot.contains(edge), "{dot}");
    }
}
