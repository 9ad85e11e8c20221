// ============================================================
// Layer 6 — Metrics Logger + Early Stopping
// ============================================================
// Records training metrics to a CSV file after each epoch and
// decides when validation loss has stopped improving.
//
// Metrics recorded per epoch:
//   - epoch:        the epoch number (1, 2, 3, ...)
//   - train_loss:   mean cross-entropy over training batches
//   - val_loss:     mean cross-entropy over validation batches
//   - val_accuracy: fraction of non-padding target tokens the
//                   model predicted exactly (teacher forced)
//
// Output file: model/metrics.csv
//
//   epoch,train_loss,val_loss,val_accuracy
//   1,5.812300,5.201100,0.213000
//   2,4.998700,4.870200,0.251000
//
// Early stopping watches val_loss: every epoch that fails to beat
// the best loss so far uses up one unit of patience; an
// improvement resets it. Patience 3 stops after three epochs in a
// row without improvement.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:        usize,
    pub train_loss:   f64,
    pub val_loss:     f64,
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_accuracy: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_accuracy }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet, so
    /// repeated runs append to one log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,val_accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.val_loss, m.val_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Outcome of feeding one epoch's validation loss to EarlyStopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Improved,
    Stalled,
    Stop,
}

#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience:  usize,
    best:      f64,
    stalled:   usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: f64::INFINITY, stalled: 0 }
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn update(&mut self, m: &EpochMetrics) -> Progress {
        if m.is_improvement(self.best) {
            self.best    = m.val_loss;
            self.stalled = 0;
            return Progress::Improved;
        }
        self.stalled += 1;
        if self.stalled >= self.patience {
            Progress::Stop
        } else {
            Progress::Stalled
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn epoch(n: usize, val_loss: f64) -> EpochMetrics {
        EpochMetrics::new(n, 1.0, val_loss, 0.5)
    }

    #[test]
    fn test_is_improvement() {
        let m = epoch(2, 2.3);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_early_stopping_after_patience_epochs() {
        let mut es = EarlyStopping::new(3);
        assert_eq!(es.update(&epoch(1, 5.0)), Progress::Improved);
        assert_eq!(es.update(&epoch(2, 4.0)), Progress::Improved);
        assert_eq!(es.update(&epoch(3, 4.1)), Progress::Stalled);
        assert_eq!(es.update(&epoch(4, 4.0)), Progress::Stalled);
        assert_eq!(es.update(&epoch(5, 4.5)), Progress::Stop);
        assert_eq!(es.best(), 4.0);
    }

    #[test]
    fn test_improvement_resets_patience() {
        let mut es = EarlyStopping::new(2);
        es.update(&epoch(1, 5.0));
        assert_eq!(es.update(&epoch(2, 6.0)), Progress::Stalled);
        assert_eq!(es.update(&epoch(3, 3.0)), Progress::Improved);
        assert_eq!(es.update(&epoch(4, 6.0)), Progress::Stalled);
    }

    #[test]
    fn test_nan_loss_never_improves() {
        let mut es = EarlyStopping::new(1);
        assert_eq!(es.update(&epoch(1, f64::NAN)), Progress::Stop);
    }

    #[test]
    fn test_csv_rows_append() {
        let tmp    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        logger.log(&epoch(1, 2.5)).unwrap();
        logger.log(&epoch(2, 2.0)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_accuracy");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("2,1.000000,2.000000"));
    }
}
