//! Report generation port trait.

use std::path::{Path, PathBuf};

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::TrendtraderError;

/// Port for exporting a finished analysis.
pub trait ReportPort {
    /// Write the report under `output_dir`, returning the files created.
    fn write(
        &self,
        report: &AnalysisReport,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, TrendtraderError>;
}
