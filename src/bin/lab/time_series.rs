// Per-Step JSONL Time Series Recorder
// One JSON line per (run, step) for independent analysis

use coalition_engine::EnsembleResult;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct StepSnapshot {
    pub run: u32,
    pub step: u32,
    pub success: bool,
    pub success_probability: f64,
    pub avg_atcf: f64,
    pub min_atcf: f64,
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<StepSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn from_ensemble(result: &EnsembleResult) -> Self {
        let snapshots = result
            .runs
            .iter()
            .flat_map(|run| {
                run.steps.iter().map(move |s| StepSnapshot {
                    run: run.run_number,
                    step: s.step,
                    success: s.success,
                    success_probability: s.success_probability,
                    avg_atcf: s.avg_atcf,
                    min_atcf: s.min_atcf,
                })
            })
            .collect();
        Self { snapshots }
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
