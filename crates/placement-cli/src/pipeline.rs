//! Build pipeline: list and enrich providers → link parents → attach consumers.

use std::time::Instant;

use tracing::info;

use placement_core::{
    BuildOptions, Graph, PlacementClient, Result, build_provider_graph,
    extend_graph_with_consumers,
};

use crate::PlacementTreeOptions;

/// Build the provider graph `opts` asks for.
///
/// 1. List the forest or one tree and enrich every provider
/// 2. Link children to parents and drop the default fields
/// 3. Attach consumers and allocation edges (if requested)
pub fn build_graph<C>(client: &C, opts: &PlacementTreeOptions) -> Result<Graph>
where
    C: PlacementClient + ?Sized,
{
    let build_start = Instant::now();
    let build_options = BuildOptions::new()
        .with_default_drop_fields()
        .with_parallel(opts.parallel);
    let mut graph = build_provider_graph(client, &opts.scope, &build_options)?;
    info!(
        "Provider graph: {:.2}s ({} providers)",
        build_start.elapsed().as_secs_f64(),
        graph.node_count()
    );

    if opts.show_consumers {
        extend_graph_with_consumers(client, &mut graph)?;
    }
    Ok(graph)
}
