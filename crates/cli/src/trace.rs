//! Search history as a Polars table (CSV or Parquet by file extension).

use anyhow::{bail, Result};
use mps::api::SearchStep;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::io::ensure_parent;

pub fn history_frame(history: &[SearchStep]) -> PolarsResult<DataFrame> {
    let col = |f: fn(&SearchStep) -> u64| history.iter().map(f).collect::<Vec<u64>>();
    df!(
        "iteration" => col(|s| s.iteration as u64),
        "mutate_point" => col(|s| s.mutate_point as u64),
        "candidate" => col(|s| s.candidate as u64),
        "accepted" => history.iter().map(|s| s.accepted).collect::<Vec<bool>>(),
        "current" => col(|s| s.current as u64),
        "best" => col(|s| s.best as u64),
        "temperature" => history.iter().map(|s| s.temperature).collect::<Vec<f64>>()
    )
}

pub fn write_trace(path: &Path, history: &[SearchStep]) -> Result<()> {
    let mut df = history_frame(history)?;
    ensure_parent(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "csv" => {
            let mut file = File::create(path)?;
            CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
        }
        "parquet" => {
            let mut file = File::create(path)?;
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
        other => bail!("unsupported trace format {other:?}; use .csv or .parquet"),
    }
    tracing::info!(rows = df.height(), path = %path.display(), "trace written");
    Ok(())
}
