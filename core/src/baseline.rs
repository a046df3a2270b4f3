//! Personal baseline: history first, then the onboarding profile, then safe
//! defaults.

use crate::history::History;
use crate::load::session_load;
use crate::stats::{mean, round_half};
use crate::types::{Baseline, BaselineSource, Confidence, UserProfile};

pub const MIN_QUALIFYING_SESSIONS: usize = 3;
pub const HIGH_CONFIDENCE_SESSIONS: usize = 5;
pub const MAX_BASELINE_SESSIONS: usize = 10;

/// Flat effort cap used for profile-based baselines regardless of grade.
pub const PROFILE_RPE: f64 = 7.0;
pub const PROFILE_GRADE_SCALE: f64 = 0.08;
pub const PROFILE_VOLUME_MIN: f64 = 6.0;
pub const PROFILE_VOLUME_MAX: f64 = 25.0;

pub const DEFAULT_SESSION_LOAD: f64 = 120.0;
pub const DEFAULT_VOLUME: f64 = 12.0;
pub const DEFAULT_RPE: f64 = 6.5;

pub fn default_baseline() -> Baseline {
    Baseline {
        avg_session_load: DEFAULT_SESSION_LOAD,
        avg_volume: DEFAULT_VOLUME,
        avg_rpe: DEFAULT_RPE,
        confidence: Confidence::None,
        source: BaselineSource::Default,
        sessions_used: 0,
    }
}

/// Conservative discount on self-reported volume, tiered by the volume itself.
pub fn profile_volume_multiplier(stated_volume: f64) -> f64 {
    match stated_volume {
        v if v >= 25.0 => 0.90,
        v if v >= 20.0 => 0.88,
        v if v >= 15.0 => 0.85,
        _ => 0.80,
    }
}

pub fn baseline_from_history(history: &History<'_>) -> Option<Baseline> {
    let recent = history.recent_with_climbs(MAX_BASELINE_SESSIONS);
    if recent.len() < MIN_QUALIFYING_SESSIONS {
        return None;
    }

    let loads: Vec<f64> = recent.iter().map(|s| session_load(s)).collect();
    let volumes: Vec<f64> = recent.iter().map(|s| s.climb_count() as f64).collect();
    let rpes: Vec<f64> = recent.iter().filter_map(|s| s.avg_rpe()).collect();

    let confidence = if recent.len() >= HIGH_CONFIDENCE_SESSIONS {
        Confidence::High
    } else {
        Confidence::Medium
    };

    Some(Baseline {
        avg_session_load: mean(&loads)?,
        avg_volume: mean(&volumes)?,
        avg_rpe: round_half(mean(&rpes)?),
        confidence,
        source: BaselineSource::Sessions,
        sessions_used: recent.len(),
    })
}

/// Needs both a flash grade and a stated volume.
pub fn baseline_from_profile(profile: &UserProfile) -> Option<Baseline> {
    let grade = profile.flash_grade?;
    let stated = f64::from(profile.typical_volume.filter(|v| *v > 0)?);

    let avg_volume = (stated * profile_volume_multiplier(stated)).clamp(PROFILE_VOLUME_MIN, PROFILE_VOLUME_MAX);
    let grade_factor = 1.0 + f64::from(grade.ordinal()) * PROFILE_GRADE_SCALE;

    Some(Baseline {
        avg_session_load: avg_volume * PROFILE_RPE * grade_factor,
        avg_volume,
        avg_rpe: PROFILE_RPE,
        confidence: Confidence::ProfileBased,
        source: BaselineSource::Onboarding,
        sessions_used: 0,
    })
}

/// History > profile > defaults.
pub fn estimate_baseline(history: &History<'_>, profile: Option<&UserProfile>) -> Baseline {
    let baseline = baseline_from_history(history)
        .or_else(|| profile.and_then(baseline_from_profile))
        .unwrap_or_else(default_baseline);
    log::debug!(
        "baseline: source={} load={:.1} volume={:.1} rpe={:.1}",
        baseline.source.as_str(),
        baseline.avg_session_load,
        baseline.avg_volume,
        baseline.avg_rpe
    );
    baseline
}
