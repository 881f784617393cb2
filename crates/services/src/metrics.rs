//! Score aggregates and the recent-attempts chart.
//!
//! Everything here is a pure function of already-loaded collections. "No data"
//! is `None`, never zero.

use peerpilot_core::model::QuizAttempt;

/// Number of attempts shown on the chart.
pub const CHART_WINDOW: usize = 6;

/// Placeholder rendered where a score has no data.
pub const NO_DATA: &str = "—";

const MIN_BAR_HEIGHT: u8 = 6;
const MAX_BAR_HEIGHT: u8 = 100;
const LABEL_CHARS: usize = 10;

/// Rounded mean of all attempt scores (half up).
#[must_use]
pub fn average_score(attempts: &[QuizAttempt]) -> Option<u8> {
    if attempts.is_empty() {
        return None;
    }
    let sum: u64 = attempts
        .iter()
        .map(|attempt| u64::from(attempt.score_percent()))
        .sum();
    let count = attempts.len() as u64;
    let rounded = (sum * 2 + count) / (count * 2);
    u8::try_from(rounded).ok()
}

#[must_use]
pub fn best_score(attempts: &[QuizAttempt]) -> Option<u8> {
    attempts.iter().map(QuizAttempt::score_percent).max()
}

/// Renders an optional score as `NN%` or the no-data placeholder.
#[must_use]
pub fn display_score(score: Option<u8>) -> String {
    score.map_or_else(|| NO_DATA.to_owned(), |score| format!("{score}%"))
}

/// Compact chart label for a quiz title.
///
/// Known subjects map to fixed labels; anything else is cut to ten characters
/// with a trailing ellipsis.
#[must_use]
pub fn short_label(title: &str) -> String {
    let lower = title.to_lowercase();
    let known = [
        ("algebra", "Algebra"),
        ("geometry", "Geometry"),
        ("trig", "Trig"),
        ("precalc", "Precalc"),
        ("stat", "Stats"),
        ("sat", "SAT"),
    ];
    if let Some((_, label)) = known.iter().find(|(needle, _)| lower.contains(needle)) {
        return (*label).to_owned();
    }
    if title.chars().count() > LABEL_CHARS {
        let mut cut: String = title.chars().take(LABEL_CHARS).collect();
        cut.push('…');
        cut
    } else {
        title.to_owned()
    }
}

/// One bar of the recent-attempts chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub score: u8,
    /// Bar height in percent, never below a visible minimum.
    pub height: u8,
}

/// The newest `window` attempts, oldest first.
///
/// `attempts` is expected newest-first, as the attempt store returns it.
#[must_use]
pub fn recent_series(attempts: &[QuizAttempt], window: usize) -> Vec<&QuizAttempt> {
    attempts.iter().take(window).rev().collect()
}

#[must_use]
pub fn chart_bars(attempts: &[QuizAttempt], window: usize) -> Vec<ChartBar> {
    recent_series(attempts, window)
        .into_iter()
        .map(|attempt| ChartBar {
            label: short_label(attempt.title()),
            score: attempt.score_percent(),
            height: attempt
                .score_percent()
                .clamp(MIN_BAR_HEIGHT, MAX_BAR_HEIGHT),
        })
        .collect()
}

/// Counters shown on the dashboard and metrics views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounts {
    pub attempts: usize,
    pub rsvps: usize,
    pub saved_resources: usize,
    pub session_requests: usize,
}

/// Everything the metrics view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counts: ProgressCounts,
    pub average: Option<u8>,
    pub best: Option<u8>,
    pub chart: Vec<ChartBar>,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn compute(attempts: &[QuizAttempt], counts: ProgressCounts) -> Self {
        Self {
            counts,
            average: average_score(attempts),
            best: best_score(attempts),
            chart: chart_bars(attempts, CHART_WINDOW),
        }
    }
}
