/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based index of the question on screen, clamped to the last one
    /// once the quiz is finished.
    pub index: usize,
    pub total: usize,
    pub correct: u32,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Percentage through the quiz: `(index + 1) / total`, rounded down.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let shown = (self.index + 1).min(self.total);
        u8::try_from(shown * 100 / self.total).unwrap_or(100)
    }

    /// Human label such as `Question 2 of 5`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Question {} of {}", (self.index + 1).min(self.total), self.total)
    }
}
