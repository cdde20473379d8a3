use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mps::api::{
    evaluate, generate_guided_order, generate_order, planar_subgraph, search, Acceptance, Graph,
    PlanarSubgraph, SearchCfg,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;
mod trace;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Maximal planar subgraph search over DFS traversal orders")]
struct Cmd {
    /// Log per-improvement progress
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Local search over traversal orders; writes the best order and its edge partition
    Search {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 100)]
        iterations: usize,
        #[arg(long, default_value_t = 1)]
        reruns: usize,
        /// Fraction of iterations that redraw the whole tree
        #[arg(long, default_value_t = 0.5)]
        plateau: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Metropolis acceptance with this start temperature (default: greedy)
        #[arg(long)]
        metropolis: Option<f64>,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Per-iteration table, .csv or .parquet
        #[arg(long)]
        trace: Option<PathBuf>,
    },
    /// Count removed edges for a given order
    Evaluate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        order: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the plain DFS order, or the guided replay of `--guided`
    Order {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        guided: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Result document of `search` and `evaluate`.
#[derive(Debug, Serialize)]
struct RunResult {
    order: Vec<usize>,
    removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_removed: Option<usize>,
    tree_edges: Vec<(usize, usize)>,
    kept_edges: Vec<(usize, usize)>,
    removed_edges: Vec<(usize, usize)>,
}

impl RunResult {
    fn new(sub: PlanarSubgraph, initial_removed: Option<usize>) -> Self {
        Self {
            removed: sub.removed_count(),
            order: sub.order,
            initial_removed,
            tree_edges: sub.tree_edges,
            kept_edges: sub.kept_edges,
            removed_edges: sub.removed_edges,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    dispatch(cmd.action)
}

fn dispatch(action: Action) -> Result<()> {
    match action {
        Action::Search {
            input,
            iterations,
            reruns,
            plateau,
            seed,
            metropolis,
            out,
            trace,
        } => {
            let cfg = SearchCfg {
                iterations,
                plateau_frac: plateau,
                reruns,
                acceptance: metropolis
                    .map(|start_temp| Acceptance::Metropolis { start_temp })
                    .unwrap_or_default(),
                seed,
            };
            run_search(&input, cfg, out.as_deref(), trace.as_deref())
        }
        Action::Evaluate { input, order, out } => run_evaluate(&input, &order, out.as_deref()),
        Action::Order { input, guided } => run_order(&input, guided.as_deref()),
        Action::Report => report(),
    }
}

fn run_search(input: &Path, cfg: SearchCfg, out: Option<&Path>, trace: Option<&Path>) -> Result<()> {
    let graph = io::read_graph(input)?;
    tracing::info!(
        input = %input.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        iterations = cfg.iterations,
        reruns = cfg.reruns,
        seed = cfg.seed,
        "search"
    );
    let outcome = search(&graph, &cfg)?;
    if let Some(path) = trace {
        trace::write_trace(path, &outcome.history)?;
    }
    let sub = planar_subgraph(&graph, &outcome.order)?;
    let result = RunResult::new(sub, Some(outcome.initial_removed));
    io::write_json(out, &result)?;

    if let Some(out) = out {
        let params = json!({
            "command": "search",
            "iterations": cfg.iterations,
            "reruns": cfg.reruns,
            "plateau_frac": cfg.plateau_frac,
            "acceptance": format!("{:?}", cfg.acceptance),
            "seed": cfg.seed,
        });
        let mut payload = Payload::new(params).with_input(input);
        if let Some(path) = trace {
            payload = payload.with_output(path);
        }
        let sidecar = provenance::write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "result written");
    }
    Ok(())
}

fn run_evaluate(input: &Path, order_path: &Path, out: Option<&Path>) -> Result<()> {
    let graph = io::read_graph(input)?;
    let order = io::read_order(order_path)?;
    let removed = evaluate(&graph, &order)
        .with_context(|| format!("evaluating order {}", order_path.display()))?;
    tracing::info!(removed, "evaluate");
    let result = RunResult::new(planar_subgraph(&graph, &order)?, None);
    io::write_json(out, &result)?;

    if let Some(out) = out {
        let params = json!({
            "command": "evaluate",
            "order": order_path.to_string_lossy(),
        });
        provenance::write_sidecar(out, Payload::new(params).with_input(input))?;
    }
    Ok(())
}

fn run_order(input: &Path, guided: Option<&Path>) -> Result<()> {
    let graph = io::read_graph(input)?;
    let order = order_for(&graph, guided)?;
    io::write_json(None, &order)
}

fn order_for(graph: &Graph, guided: Option<&Path>) -> Result<Vec<usize>> {
    match guided {
        None => Ok(generate_order(graph)),
        Some(path) => {
            let reference = io::read_order(path)?;
            generate_guided_order(graph, &reference)
                .with_context(|| format!("replaying order {}", path.display()))
        }
    }
}

fn report() -> Result<()> {
    let doc = provenance::document(&Payload::new(json!({})), &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
