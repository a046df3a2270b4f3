use crate::history::History;
use crate::load::total_load;
use crate::stats::{clamp_finite, RoundTo};
use crate::types::{LoadRatio, LoadRatioStatus, RatioConfidence};

pub const MIN_SESSIONS: usize = 5;
pub const HIGH_CONFIDENCE_SESSIONS: usize = 7;
pub const ACUTE_DAYS: i64 = 7;
pub const CHRONIC_DAYS: i64 = 28;
/// Floor on expected weekly load, keeps very light histories from alarming.
pub const MIN_EXPECTED_WEEKLY_LOAD: f64 = 50.0;

/// Ratio -> status. Works on the rounded ratio.
pub fn classify_ratio(ratio: f64) -> LoadRatioStatus {
    match ratio {
        r if r < 0.8 => LoadRatioStatus::Low,
        r if r <= 1.3 => LoadRatioStatus::Optimal,
        r if r <= 1.5 => LoadRatioStatus::Elevated,
        _ => LoadRatioStatus::High,
    }
}

pub fn ratio_message(status: LoadRatioStatus) -> &'static str {
    match status {
        LoadRatioStatus::Insufficient => "No sessions in the last 28 days",
        LoadRatioStatus::Low => "Below your usual load",
        LoadRatioStatus::Optimal => "In your sweet spot",
        LoadRatioStatus::Elevated => "Load is climbing fast",
        LoadRatioStatus::High => "Load spike, back off",
    }
}

/// Acute:chronic workload ratio normalized by how often the user actually
/// trains. `None` below five sessions.
pub fn load_ratio(history: &History<'_>, now_ms: i64) -> Option<LoadRatio> {
    let n = history.len();
    if n < MIN_SESSIONS {
        return None;
    }
    let confidence = if n >= HIGH_CONFIDENCE_SESSIONS {
        RatioConfidence::High
    } else {
        RatioConfidence::Establishing
    };

    let chronic = history.within_days(now_ms, CHRONIC_DAYS);
    if chronic.is_empty() {
        log::debug!("acwr: no sessions within {} days", CHRONIC_DAYS);
        return Some(LoadRatio {
            ratio: None,
            status: LoadRatioStatus::Insufficient,
            message: ratio_message(LoadRatioStatus::Insufficient).to_string(),
            frequency: 0.0,
            confidence,
            acute_load: 0.0,
            chronic_load: 0.0,
            expected_weekly_load: None,
            chronic_sessions: 0,
        });
    }

    let acute_load = total_load(history.within_days(now_ms, ACUTE_DAYS));
    let chronic_load = total_load(chronic.iter().copied());
    let count = chronic.len() as f64;

    let sessions_per_week = count / CHRONIC_DAYS as f64 * 7.0;
    // per-session average x actual frequency, not calendar days
    let expected_weekly_load = chronic_load / count * sessions_per_week;
    let adjusted = expected_weekly_load.max(MIN_EXPECTED_WEEKLY_LOAD);

    let ratio = clamp_finite(acute_load / adjusted, 0.0, f64::MAX).round_to(2);
    let status = classify_ratio(ratio);
    log::debug!(
        "acwr: acute={:.1} chronic={:.1} expected={:.1} ratio={:.2} status={}",
        acute_load,
        chronic_load,
        expected_weekly_load,
        ratio,
        status.as_str()
    );

    Some(LoadRatio {
        ratio: Some(ratio),
        status,
        message: ratio_message(status).to_string(),
        frequency: sessions_per_week.round_to(1),
        confidence,
        acute_load,
        chronic_load,
        expected_weekly_load: Some(expected_weekly_load),
        chronic_sessions: chronic.len(),
    })
}
