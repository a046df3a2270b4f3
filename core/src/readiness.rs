//! Climb Readiness Score (CRS).
//!
//! The phase is picked purely from how many orderable sessions exist:
//!
//! | N      | phase        | inputs                                   |
//! |--------|--------------|------------------------------------------|
//! | < 3    | insufficient | none, no score                           |
//! | 3..5   | building     | latest session only                      |
//! | 5..7   | calibrating  | recovery, load trend, fatigue, volume    |
//! | >= 7   | calibrated   | same as calibrating, high confidence     |

use crate::history::History;
use crate::load::total_load;
use crate::stats::{clamp_finite, variance};
use crate::types::{
    Confidence, EngineCfg, ReadinessBand, ReadinessComponents, ReadinessScore, ReadinessStatus, ReadinessWeights,
    Session,
};

pub const BUILDING_MIN_SESSIONS: usize = 3;
pub const CALIBRATING_MIN_SESSIONS: usize = 5;
pub const CALIBRATED_MIN_SESSIONS: usize = 7;

/// Full recovery point.
pub const OPTIMAL_RECOVERY_HOURS: f64 = 48.0;
/// Detraining after the optimal point: 15 points per week (~2.14/day).
pub const DETRAINING_POINTS_PER_DAY: f64 = 15.0 / 7.0;
pub const RECOVERY_FLOOR: f64 = 50.0;

/// Sessions looked at by the fatigue and volume components.
pub const PATTERN_WINDOW: usize = 7;
pub const FATIGUE_DECAY: f64 = 0.75;
pub const VOLUME_PATTERN_DEFAULT: f64 = 75.0;
pub const FATIGUE_DEFAULT: f64 = 75.0;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Building phase: 60 points at 48 h, capped at 100.
pub fn building_recovery(hours_since_last: f64) -> f64 {
    (hours_since_last / OPTIMAL_RECOVERY_HOURS * 60.0).min(100.0)
}

/// Building phase: (10 - avg RPE) x 4.
pub fn building_fatigue(last_avg_rpe: Option<f64>) -> f64 {
    match last_avg_rpe {
        Some(rpe) => (10.0 - rpe) * 4.0,
        None => 0.0,
    }
}

/// Linear up to 100 at 48 h, then slow detraining decay floored at 50.
pub fn load_recovery(hours_since_last: f64) -> f64 {
    let h = hours_since_last.max(0.0);
    if h <= OPTIMAL_RECOVERY_HOURS {
        h / OPTIMAL_RECOVERY_HOURS * 100.0
    } else {
        let days_over = (h - OPTIMAL_RECOVERY_HOURS) / 24.0;
        (100.0 - days_over * DETRAINING_POINTS_PER_DAY).max(RECOVERY_FLOOR)
    }
}

/// 7-day load over the weekly share of the 28-day load. `None` if the
/// 28-day window has no load.
pub fn load_trend_ratio(history: &History<'_>, now_ms: i64) -> Option<f64> {
    let acute = total_load(history.within_days(now_ms, 7));
    let chronic = total_load(history.within_days(now_ms, 28));
    let expected_week = chronic / 28.0 * 7.0;
    if expected_week <= 0.0 || !expected_week.is_finite() {
        return None;
    }
    Some(acute / expected_week)
}

/// Penalizes both under- and over-training; plateau 0.7..=1.3.
pub fn score_load_trend(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(r) if r < 0.4 => 60.0,
        Some(r) if r < 0.7 => 85.0,
        Some(r) if r <= 1.3 => 100.0,
        Some(r) if r <= 1.5 => 70.0,
        Some(r) if r <= 1.8 => 45.0,
        Some(_) => 25.0,
        // no load in 28 days reads as under-training
        None => 60.0,
    }
}

/// Exponentially weighted RPE, newest weight 1, then 0.75, 0.5625 ...
pub fn weighted_recent_rpe(recent: &[&Session]) -> Option<f64> {
    let mut num = 0.0;
    let mut den = 0.0;
    for (ago, rpe) in recent.iter().filter_map(|s| s.avg_rpe()).enumerate() {
        let w = FATIGUE_DECAY.powi(ago as i32);
        num += w * rpe;
        den += w;
    }
    if den > 0.0 { Some(num / den) } else { None }
}

pub fn score_cumulative_fatigue(recent: &[&Session]) -> f64 {
    match weighted_recent_rpe(recent) {
        Some(rpe) => clamp_finite(100.0 - rpe * 10.0, 0.0, 100.0),
        None => FATIGUE_DEFAULT,
    }
}

/// Consistency of climb counts: 100 - 2 x variance, 75 with < 3 sessions.
pub fn score_volume_pattern(recent: &[&Session]) -> f64 {
    let counts: Vec<f64> = recent.iter().map(|s| s.climb_count() as f64).collect();
    if counts.len() < 3 {
        return VOLUME_PATTERN_DEFAULT;
    }
    match variance(&counts) {
        Some(v) => (100.0 - v * 2.0).max(0.0),
        None => VOLUME_PATTERN_DEFAULT,
    }
}

pub fn combine_readiness(r: f64, t: f64, f: f64, v: f64, weights: &ReadinessWeights) -> u8 {
    let raw = weights.load_recovery * r
        + weights.load_trend * t
        + weights.cumulative_fatigue * f
        + weights.volume_pattern * v;
    clamp_finite(raw.round(), 0.0, 100.0) as u8
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

fn insufficient(n: usize) -> ReadinessScore {
    let needed = (BUILDING_MIN_SESSIONS - n) as u32;
    ReadinessScore {
        score: None,
        status: ReadinessStatus::Insufficient,
        band: None,
        message: format!("Log {} more session(s) to unlock readiness", needed),
        confidence: Confidence::None,
        components: None,
        sessions_needed: needed,
    }
}

fn scored(score: u8, status: ReadinessStatus, confidence: Confidence, components: ReadinessComponents, needed: usize) -> ReadinessScore {
    let band = ReadinessBand::from_score(score);
    ReadinessScore {
        score: Some(score),
        status,
        band: Some(band),
        message: band.label().to_string(),
        confidence,
        components: Some(components),
        sessions_needed: needed as u32,
    }
}

fn building(history: &History<'_>, now_ms: i64) -> Option<ReadinessScore> {
    let hours = history.hours_since_latest(now_ms)?;
    // an empty latest session borrows RPE from the newest one with climbs
    let last_rpe = history.iter().find_map(Session::avg_rpe);

    let recovery = building_recovery(hours);
    let fatigue = building_fatigue(last_rpe);
    let score = clamp_finite((recovery + fatigue).round(), 0.0, 100.0) as u8;
    log::trace!("readiness/building: hours={:.1} recovery={:.1} fatigue={:.1}", hours, recovery, fatigue);

    Some(scored(
        score,
        ReadinessStatus::Building,
        Confidence::Low,
        ReadinessComponents::Building { recovery, fatigue, hours_since_last: hours },
        CALIBRATING_MIN_SESSIONS - history.len(),
    ))
}

fn full(history: &History<'_>, now_ms: i64, cfg: &EngineCfg) -> Option<ReadinessScore> {
    let hours = history.hours_since_latest(now_ms)?;
    let recent = history.recent_with_climbs(PATTERN_WINDOW);

    let recovery = load_recovery(hours);
    let ratio = load_trend_ratio(history, now_ms);
    let trend = score_load_trend(ratio);
    let fatigue = score_cumulative_fatigue(&recent);
    let volume = score_volume_pattern(&recent);
    let score = combine_readiness(recovery, trend, fatigue, volume, &cfg.weights());
    log::trace!(
        "readiness/full: recovery={:.1} trend={:.1} (ratio={:?}) fatigue={:.1} volume={:.1} -> {}",
        recovery,
        trend,
        ratio,
        fatigue,
        volume,
        score
    );

    let n = history.len();
    let (status, confidence) = if n >= CALIBRATED_MIN_SESSIONS {
        (ReadinessStatus::Calibrated, Confidence::High)
    } else {
        (ReadinessStatus::Calibrating, Confidence::Medium)
    };

    Some(scored(
        score,
        status,
        confidence,
        ReadinessComponents::Full {
            load_recovery: recovery,
            load_trend: trend,
            load_trend_ratio: ratio,
            cumulative_fatigue: fatigue,
            volume_pattern: volume,
            hours_since_last: hours,
        },
        CALIBRATED_MIN_SESSIONS.saturating_sub(n),
    ))
}

/// Readiness for the given history at `now_ms`.
pub fn assess_readiness(history: &History<'_>, now_ms: i64, cfg: &EngineCfg) -> ReadinessScore {
    let n = history.len();
    let out = if n < BUILDING_MIN_SESSIONS {
        None
    } else if n < CALIBRATING_MIN_SESSIONS {
        building(history, now_ms)
    } else {
        full(history, now_ms, cfg)
    };
    let out = out.unwrap_or_else(|| insufficient(n.min(BUILDING_MIN_SESSIONS)));
    log::debug!("readiness: n={} status={} score={:?}", n, out.status.as_str(), out.score);
    out
}
