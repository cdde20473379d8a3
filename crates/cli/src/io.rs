//! JSON files read and written by the CLI.
//!
//! Graph files look like `{"nodes": 4, "edges": [[0, 1], [1, 2]]}`; order
//! files are a bare JSON array of vertex ids, leaf to root.

use anyhow::{Context, Result};
use mps::api::Graph;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphFile {
    pub nodes: usize,
    pub edges: Vec<[usize; 2]>,
}

pub fn read_graph(path: &Path) -> Result<Graph> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: GraphFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing graph {}", path.display()))?;
    let graph = Graph::new(file.nodes, file.edges.iter().map(|&[u, v]| (u, v)))
        .with_context(|| format!("building graph from {}", path.display()))?;
    Ok(graph)
}

pub fn read_order(path: &Path) -> Result<Vec<usize>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing order {}", path.display()))
}

/// Pretty JSON to `out`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    match out {
        Some(path) => {
            ensure_parent(path)?;
            fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
    }
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_graph_and_dedups_edges() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.json");
        fs::write(&path, r#"{"nodes": 3, "edges": [[0, 1], [1, 0], [1, 2]]}"#).unwrap();
        let g = read_graph(&path).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn out_of_range_endpoint_is_reported_with_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"nodes": 2, "edges": [[0, 5]]}"#).unwrap();
        let err = format!("{:#}", read_graph(&path).unwrap_err());
        assert!(err.contains("bad.json"), "{err}");
        assert!(err.contains("vertex 5"), "{err}");
    }

    #[test]
    fn writes_into_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/order.json");
        write_json(Some(&path), &vec![2, 1, 0]).unwrap();
        assert_eq!(read_order(&path).unwrap(), vec![2, 1, 0]);
    }
}
