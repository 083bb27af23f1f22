//! Graph command handler

use anyhow::Result;
use colored::*;

use super::GraphCommands;
use super::output::{emit, to_json};
use crate::config::{Config, OutputFormat};
use crate::graph::{Graph, build_graph};
use crate::inventory::load_inventory;

pub fn handle_graph_command(args: GraphCommands, config: &Config) -> Result<()> {
    let inventory = load_inventory(&args.inventory)?;
    log::info!(
        "Loaded {} objects from {}",
        inventory.objects.len(),
        args.inventory.display()
    );

    let graph = build_graph(&inventory.objects);
    graph.log_summary();

    let content = match args.format.unwrap_or(config.default_format) {
        OutputFormat::Json => to_json(&graph)?,
        OutputFormat::Text => format_text(&graph),
    };

    emit(&content, args.output.as_deref())
}

/// Processing order with per-object category, one line per node
fn format_text(graph: &Graph) -> String {
    let stats = graph.stats();
    let mut lines = vec![format!(
        "{} nodes, {} edges ({} master-detail)",
        stats.nodes.to_string().bold(),
        stats.edges.to_string().bold(),
        stats.master_detail_edges
    )];

    for (position, name) in graph.order.iter().enumerate() {
        let category = graph.categorize(name);
        let mut line = format!("{:>4}. {} {}", position + 1, category.symbol(), name);
        if graph.unresolved.contains(name) {
            line.push_str(&format!(" {}", "(cycle)".yellow()));
        }
        lines.push(line);
    }

    lines.join("\n")
}
