//! Output generation (DOT graphs and text trees).

use std::path::Path;
use std::time::Instant;

use tracing::info;

use placement_core::{
    BuildOptions, Error, FieldFilter, FieldSelection, Graph, PlacementClient, Result, Scope,
    build_provider_graph, extend_graph_with_consumers, render_text,
};
use placement_dot::render_graph;

use crate::options::OutputFormat;

/// Render `graph` in `format`; `filter` applies to DOT tables only.
pub fn render_output(graph: &Graph, format: OutputFormat, filter: &dyn FieldFilter) -> String {
    let render_start = Instant::now();
    let output = match format {
        OutputFormat::Dot => render_graph(graph, filter),
        OutputFormat::Text => render_text(graph),
    };
    info!(
        "Rendering {}: {:.2}s",
        format,
        render_start.elapsed().as_secs_f64()
    );
    output
}

/// Write `content` to `path`, or to stdout without a path.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).map_err(|err| {
                Error::from(err)
                    .with_operation("output::write_output")
                    .with_context("path", path.display().to_string())
            })?;
            info!(path = %path.display(), "output written");
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// Dump every provider with its consumers as DOT into `out_file`.
///
/// `hidden_fields` replaces the default hidden fields. Meant for test
/// environments that want a picture of placement after a failure.
pub fn dump_placement_to_dot<C, P>(client: &C, out_file: P, hidden_fields: &[&str]) -> Result<()>
where
    C: PlacementClient + ?Sized,
    P: AsRef<Path>,
{
    let options = BuildOptions::new().with_default_drop_fields();
    let mut graph = build_provider_graph(client, &Scope::Forest, &options)?;
    extend_graph_with_consumers(client, &mut graph)?;
    let filter = FieldSelection::except(hidden_fields.iter().copied());
    write_output(Some(out_file.as_ref()), &render_graph(&graph, &filter))
}
