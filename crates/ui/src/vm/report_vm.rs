use omr_core::Report;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportVm {
    pub score_line: String,
    pub overall_line: String,
    pub attempted_line: String,
    pub accuracy_line: String,
    pub key_line: String,
}

impl ReportVm {
    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> [&str; 5] {
        [
            &self.score_line,
            &self.overall_line,
            &self.attempted_line,
            &self.accuracy_line,
            &self.key_line,
        ]
    }
}

#[must_use]
pub fn map_report(report: &Report) -> ReportVm {
    let accuracy = report
        .accuracy()
        .map_or_else(|| "N/A".to_string(), |value| format!("{:.1}%", value * 100.0));

    ReportVm {
        score_line: format!(
            "Score: {} / {} (Attempted)",
            report.correct(),
            report.attempted()
        ),
        overall_line: format!("Overall Correct: {} / {}", report.correct(), report.total()),
        attempted_line: format!("Attempted: {} / {}", report.attempted(), report.total()),
        accuracy_line: format!("Accuracy (on attempted): {accuracy}"),
        key_line: format!(
            "Answer Key Provided For: {} / {} questions",
            report.key_provided(),
            report.total()
        ),
    }
}
