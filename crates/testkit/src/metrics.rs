//! Run-level metrics reports for CI artifacts.
//!
//! A report wraps one meshing run: how many chunks were meshed, what came
//! out, and how long it took. Exported as pretty JSON.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Run identifier
    pub run_name: String,

    /// Timestamp when metrics were collected (ISO 8601)
    pub timestamp: String,

    /// Overall result
    pub result: RunResult,

    /// Meshing metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meshing: Option<MeshingMetrics>,

    /// Execution metrics
    pub execution: ExecutionMetrics,
}

/// Overall result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunResult {
    /// Run passed all validations
    Pass,
    /// Run failed
    Fail,
    /// Run was skipped
    Skip,
}

/// Meshing throughput and output size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshingMetrics {
    /// Total chunks meshed
    pub chunks_meshed: usize,

    /// Average meshing time per chunk (microseconds)
    pub avg_mesh_time_us: f64,

    /// Quads in the solid stream, summed over chunks
    pub solid_quads: usize,

    /// Quads in the water stream, summed over chunks
    pub water_quads: usize,

    /// Average quads per chunk
    pub avg_quads_per_chunk: f64,

    /// Chunks meshed with placeholder borders
    pub chunks_with_placeholders: usize,

    /// Whether vertical reduction was enabled
    pub vertical_reduction: bool,

    /// Worker threads used
    pub workers: usize,
}

/// Execution metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Total duration (seconds)
    pub duration_seconds: f64,

    /// Number of validations passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations_passed: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with a run name
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                run_name: run_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: RunResult::Pass,
                meshing: None,
                execution: ExecutionMetrics {
                    duration_seconds: 0.0,
                    validations_passed: None,
                },
            },
        }
    }

    /// Set result
    pub fn result(mut self, result: RunResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set meshing metrics
    pub fn meshing(mut self, metrics: MeshingMetrics) -> Self {
        self.report.meshing = Some(metrics);
        self
    }

    /// Set execution metrics
    pub fn execution(mut self, metrics: ExecutionMetrics) -> Self {
        self.report.execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
