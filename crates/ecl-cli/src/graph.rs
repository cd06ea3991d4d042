//! # Graph Subcommand
//!
//! Exports the transition graph. DOT output styles edges by kind so a
//! rendered diagram separates the forward path from rollbacks and exits.

use std::fmt::Write as _;

use anyhow::Result;
use clap::{Args, ValueEnum};

use ecl_lifecycle::{EdgeKind, TransitionGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Dot,
    Json,
}

/// Arguments for `ecl graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    #[arg(long, value_enum, default_value_t = GraphFormat::Dot)]
    pub format: GraphFormat,
}

pub fn run_graph(args: &GraphArgs) -> Result<u8> {
    let graph = TransitionGraph::standard();
    match args.format {
        GraphFormat::Dot => print!("{}", render_dot(graph)),
        GraphFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "edges": graph.edges() }))?)
        }
    }
    Ok(0)
}

fn edge_style(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Forward => "",
        EdgeKind::Rollback => " [style=dashed]",
        EdgeKind::Cancellation => " [style=dotted, color=gray]",
        EdgeKind::Exception => " [color=red]",
    }
}

pub fn render_dot(graph: &TransitionGraph) -> String {
    let mut out = String::from("digraph lifecycle {\n  rankdir=LR;\n");
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\"{};",
            edge.from,
            edge.to,
            edge_style(edge.kind)
        );
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_has_one_line_per_edge() {
        let graph = TransitionGraph::standard();
        let dot = render_dot(graph);
        assert!(dot.starts_with("digraph lifecycle {"));
        assert_eq!(dot.matches(" -> ").count(), graph.edges().len());
        assert!(dot.contains("\"draft\" -> \"approved\";"));
        assert!(dot.contains("\"approved\" -> \"draft\" [style=dashed];"));
        assert!(dot.contains("\"shipped\" -> \"quarantine\" [color=red];"));
    }

    #[test]
    fn json_format_runs() {
        assert_eq!(run_graph(&GraphArgs { format: GraphFormat::Json }).unwrap(), 0);
    }
}
