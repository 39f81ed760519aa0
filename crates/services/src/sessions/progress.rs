use quiz_core::time::format_countdown;

/// Figures shown in the submit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitSummary {
    pub answered: usize,
    pub unanswered: usize,
    pub total: usize,
    pub remaining_secs: u32,
}

impl SubmitSummary {
    #[must_use]
    pub fn remaining_label(&self) -> String {
        format_countdown(self.remaining_secs)
    }
}
