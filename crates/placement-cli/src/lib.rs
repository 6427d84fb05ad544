//! placement-tree command-line interface.
//!
pub mod http;
pub mod options;
pub mod output;
pub mod pipeline;

use placement_core::{FieldSelection, PlacementClient, Result, Scope};

pub use http::HttpClient;
pub use options::{ConnectionOptions, OutputFormat, RenderArgs};
pub use output::{dump_placement_to_dot, render_output, write_output};
pub use pipeline::build_graph;

/// Options for one placement-tree run.
#[derive(Debug, Clone)]
pub struct PlacementTreeOptions {
    pub scope: Scope,
    pub fields: FieldSelection,
    pub show_consumers: bool,
    pub format: OutputFormat,
    pub parallel: bool,
}

impl PlacementTreeOptions {
    pub fn new(scope: Scope, args: &RenderArgs) -> Self {
        Self {
            scope,
            fields: args.field_selection(),
            show_consumers: args.show_consumers,
            format: args.format,
            parallel: args.parallel,
        }
    }
}

/// Main entry point: build the requested graph and render it.
pub fn run_main<C>(client: &C, opts: &PlacementTreeOptions) -> Result<String>
where
    C: PlacementClient + ?Sized,
{
    let graph = build_graph(client, opts)?;
    Ok(render_output(&graph, opts.format, &opts.fields))
}
