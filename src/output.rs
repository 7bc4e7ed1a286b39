use crate::batch::{RunOutcome, RunResult};
use anyhow::{Context, Result};
use log::{info, warn};
use search_common::{OutputConfig, Snapshot};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Serialized snapshot formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Bincode,
    MessagePack,
}

impl SnapshotFormat {
    /// Parses the configured format name, falling back to JSON for unknown names.
    pub fn from_config(name: Option<&str>) -> Self {
        match name.unwrap_or("json") {
            "json" => SnapshotFormat::Json,
            "bincode" => SnapshotFormat::Bincode,
            "messagepack" => SnapshotFormat::MessagePack,
            other => {
                warn!("Unknown output format: {}. Using JSON instead.", other);
                SnapshotFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Bincode => "bin",
            SnapshotFormat::MessagePack => "msgpack",
        }
    }
}

/// Writes all snapshots to `<base_filename>_snapshots.<ext>` and returns the path.
pub fn save_snapshots(snapshots: &[Snapshot], output: &OutputConfig) -> Result<PathBuf> {
    let format = SnapshotFormat::from_config(output.format.as_deref());
    let path = PathBuf::from(format!("{}_snapshots.{}", output.base_filename, format.extension()));
    let file = File::create(&path)
        .with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        SnapshotFormat::Json => serde_json::to_writer(&mut writer, snapshots)
            .context("Error serializing snapshots to JSON")?,
        SnapshotFormat::Bincode => bincode::serialize_into(&mut writer, snapshots)
            .context("Error serializing snapshots to bincode")?,
        SnapshotFormat::MessagePack => rmp_serde::encode::write(&mut writer, snapshots)
            .context("Error serializing snapshots to MessagePack")?,
    }
    writer.flush()?;

    info!("{} snapshots saved to {} ({:?})", snapshots.len(), path.display(), format);
    Ok(path)
}

/// Writes the agent path as CSV: one row per snapshot.
pub fn save_trajectory_csv(snapshots: &[Snapshot], output: &OutputConfig) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_trajectory.csv", output.base_filename));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;

    writer.write_record(["step", "x", "y", "radius", "decision", "excursion"])?;
    for s in snapshots {
        writer.write_record(&[
            s.step.to_string(),
            format!("{:.4}", s.position.0),
            format!("{:.4}", s.position.1),
            s.current_radius.to_string(),
            s.decision.to_string(),
            s.excursion_number.to_string(),
        ])?;
    }
    writer.flush()?;

    info!("Trajectory saved to {}", path.display());
    Ok(path)
}

/// Writes per-run batch results as CSV.
pub fn save_batch_csv(results: &[RunResult], output: &OutputConfig) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_batch.csv", output.base_filename));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;

    writer.write_record(["run", "seed", "target_distance", "target_bin", "outcome", "steps", "excursions"])?;
    for r in results {
        let outcome = match r.outcome {
            RunOutcome::Found { .. } => "found".to_string(),
            RunOutcome::Terminated(reason) => reason.to_string(),
        };
        writer.write_record(&[
            r.run_index.to_string(),
            r.seed.to_string(),
            format!("{:.4}", r.target_distance),
            r.target_bin.to_string(),
            outcome,
            r.steps.to_string(),
            r.excursions.to_string(),
        ])?;
    }
    writer.flush()?;

    info!("Batch results saved to {}", path.display());
    Ok(path)
}
