use crate::types::Session;

pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Newest-first view over the sessions that carry a timestamp.
///
/// Sessions without a timestamp cannot be ordered and are left out of every
/// recency or window calculation. The underlying slice is never touched.
#[derive(Debug, Clone)]
pub struct History<'a> {
    ordered: Vec<&'a Session>,
    dropped: usize,
}

impl<'a> History<'a> {
    pub fn new(sessions: &'a [Session]) -> Self {
        let mut ordered: Vec<&Session> = sessions.iter().filter(|s| s.timestamp_ms.is_some()).collect();
        // stable sort: equal timestamps keep their input order
        ordered.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        let dropped = sessions.len() - ordered.len();
        if dropped > 0 {
            log::warn!("history: {} session(s) without timestamp left out", dropped);
        }
        History { ordered, dropped }
    }

    /// Completed, orderable sessions (N).
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn latest(&self) -> Option<&'a Session> {
        self.ordered.first().copied()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Session> + '_ {
        self.ordered.iter().copied()
    }

    /// Up to `n` most recent sessions that contain climbs.
    pub fn recent_with_climbs(&self, n: usize) -> Vec<&'a Session> {
        self.iter().filter(|s| !s.is_empty()).take(n).collect()
    }

    /// Sessions whose age relative to `now_ms` is within `days`.
    /// Timestamps in the future count as age 0.
    pub fn within_days(&self, now_ms: i64, days: i64) -> Vec<&'a Session> {
        let window = days.saturating_mul(DAY_MS);
        self.iter()
            .filter(|s| s.timestamp_ms.map(|ts| now_ms.saturating_sub(ts).max(0) <= window).unwrap_or(false))
            .collect()
    }

    /// Hours since the most recent session, floored at 0.
    pub fn hours_since_latest(&self, now_ms: i64) -> Option<f64> {
        let ts = self.latest()?.timestamp_ms?;
        Some(now_ms.saturating_sub(ts).max(0) as f64 / HOUR_MS as f64)
    }
}
