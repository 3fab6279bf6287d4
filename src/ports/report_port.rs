//! Report output port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::ScreenerError;

/// Port for writing analysis reports.
pub trait ReportPort {
    fn write(&self, result: &AnalysisResult, output_path: &str) -> Result<(), ScreenerError>;
}
