//! Plain-text report adapter implementing ReportPort.

use std::fs;

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::ScreenerError;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    /// Renders one analysis as a plain-text report.
    pub fn render(result: &AnalysisResult) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Strategy '{}' vs {} @ {}\n",
            result.strategy.name, result.ticker, result.analysis_timestamp
        ));
        out.push_str(&format!(
            "Overall: {}\n",
            if result.overall_passed {
                "PASSED"
            } else {
                "FAILED"
            }
        ));
        out.push_str(&format!("Summary: {}\n\n", result.summary));

        out.push_str("Rules:\n");
        for rule_result in &result.rule_results {
            let mark = if rule_result.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("  [{}] {}\n", mark, rule_result.justification));
        }

        out.push_str("\nMetrics:\n");
        for (name, value) in &result.calculated_metrics {
            out.push_str(&format!("  {name} = {value}\n"));
        }
        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &AnalysisResult, output_path: &str) -> Result<(), ScreenerError> {
        fs::write(output_path, TextReportAdapter::render(result))?;
        Ok(())
    }
}
