//! Plain-text rendering of a provider graph.
//!
//! ```text
//! compute-0 (4a6a...)
//!   numa-0 (9c1b...)
//!     consumer 77e0... MEMORY_MB=512, VCPU=2
//!   numa-1 (d2f3...)
//! ```

use std::fmt::Write;

use serde_json::Value;

use crate::graph::{Attrs, Graph, Node};

/// Indentation width in spaces per tree level.
const INDENT_WIDTH: usize = 2;

/// Render every tree of `graph`, roots in insertion order, each walked pre-order.
pub fn render_text(graph: &Graph) -> String {
    let mut output = String::new();
    for root in graph.roots() {
        for (index, depth) in graph.walk(root) {
            let node = graph.node(index);
            write_line(&mut output, depth, &describe(node));
            for allocation in graph.allocations_from(index) {
                let consumer = graph.node(allocation.consumer);
                let mut line = format!("consumer {}", consumer.id());
                if !allocation.resources.is_empty() {
                    line.push(' ');
                    line.push_str(&format_resources(&allocation.resources));
                }
                write_line(&mut output, depth + 1, &line);
            }
        }
    }
    output
}

fn describe(node: &Node) -> String {
    match node {
        Node::Provider(provider) => match provider.name() {
            Some(name) => format!("{} ({})", name, provider.id()),
            None => provider.id().to_string(),
        },
        Node::Consumer(consumer) => format!("consumer {}", consumer.id()),
    }
}

fn format_resources(resources: &Attrs) -> String {
    let mut classes: Vec<(&String, &Value)> = resources.iter().collect();
    classes.sort_by(|a, b| a.0.cmp(b.0));
    classes
        .into_iter()
        .map(|(class, amount)| match amount {
            Value::String(amount) => format!("{class}={amount}"),
            other => format!("{class}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_line(output: &mut String, depth: usize, text: &str) {
    let _ = writeln!(output, "{:indent$}{}", "", text, indent = depth * INDENT_WIDTH);
}
