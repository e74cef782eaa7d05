use std::fmt;

/// Linear progress of one analysis request, carried on log records.
///
/// `Validating -> Extracting -> Requesting -> Responding`; any step may end
/// in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Validating,
    Extracting,
    Requesting,
    Responding,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Validating => "validating",
            AnalysisStage::Extracting => "extracting",
            AnalysisStage::Requesting => "requesting",
            AnalysisStage::Responding => "responding",
            AnalysisStage::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
