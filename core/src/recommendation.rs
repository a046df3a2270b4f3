use crate::types::{
    Baseline, BaselineSource, Grade, LoadRatio, ReadinessBand, ReadinessScore, Recommendation, UserProfile,
};

/// Ratio above which the overreaching guard trims capacity.
pub const OVERREACH_RATIO: f64 = 1.3;
pub const OVERREACH_FACTOR: f64 = 0.8;

/// Effort cap for every path that has no readiness score.
pub const SAFE_RPE_CAP: u8 = 7;

/// Score band -> capacity multiplier. Limited and Poor share the bottom row.
pub fn capacity_multiplier(band: ReadinessBand) -> f64 {
    match band {
        ReadinessBand::Optimal => 1.30,
        ReadinessBand::Good => 1.15,
        ReadinessBand::Moderate => 1.00,
        ReadinessBand::Caution => 0.80,
        ReadinessBand::Limited | ReadinessBand::Poor => 0.60,
    }
}

/// Score band -> integer RPE ceiling.
pub fn rpe_ceiling(band: ReadinessBand) -> u8 {
    match band {
        ReadinessBand::Optimal => 9,
        ReadinessBand::Good => 8,
        ReadinessBand::Moderate => 7,
        ReadinessBand::Caution => 6,
        ReadinessBand::Limited | ReadinessBand::Poor => 5,
    }
}

#[inline]
fn round_u32(x: f64) -> u32 {
    if x.is_finite() { x.round().max(0.0).min(f64::from(u32::MAX)) as u32 } else { 0 }
}

fn volume_label(lo: u32, hi: u32) -> String {
    if hi > lo { format!("{}-{}", lo, hi) } else { lo.to_string() }
}

/// Bottom band gets a single value, the rest a tight "c-1 to c" range.
fn rpe_label(ceiling: u8) -> String {
    if ceiling <= 5 { format!("≤{}", ceiling) } else { format!("{}-{}", ceiling - 1, ceiling) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl GradeTier {
    /// V0-V3 beginner, V4-V6 intermediate, V7+ advanced.
    pub fn from_grade(grade: Grade) -> Self {
        match grade.ordinal() {
            0..=3 => GradeTier::Beginner,
            4..=6 => GradeTier::Intermediate,
            _ => GradeTier::Advanced,
        }
    }
}

fn generic_default() -> Recommendation {
    Recommendation {
        focus: "build baseline safely".to_string(),
        volume_cap: volume_label(8, 12),
        rpe_cap: format!("≤{}", SAFE_RPE_CAP),
        style: "Mixed styles, stop well short of failure".to_string(),
        note: Some("Log a few sessions so we can learn your baseline".to_string()),
        volume_range: (8, 12),
        rpe_ceiling: SAFE_RPE_CAP,
        capacity_multiplier: None,
    }
}

/// Same RPE cap for every tier; only the wording changes.
fn from_profile(baseline: &Baseline, profile: Option<&UserProfile>) -> Recommendation {
    let lo = round_u32(baseline.avg_volume * 0.86);
    let hi = round_u32(baseline.avg_volume * 0.94);
    let tier = profile
        .and_then(|p| p.flash_grade)
        .map(GradeTier::from_grade)
        .unwrap_or(GradeTier::Beginner);

    let (focus, style) = match tier {
        GradeTier::Beginner => ("learn movement", "Technical climbs well below your flash grade"),
        GradeTier::Intermediate => ("consistent volume", "Mix of technical and power problems at or below flash grade"),
        GradeTier::Advanced => ("controlled intensity", "Limit-adjacent problems with full rest between attempts"),
    };

    Recommendation {
        focus: focus.to_string(),
        volume_cap: volume_label(lo, hi),
        rpe_cap: format!("≤{}", SAFE_RPE_CAP),
        style: style.to_string(),
        note: Some("Based on your onboarding profile until you log a few sessions".to_string()),
        volume_range: (lo, hi),
        rpe_ceiling: SAFE_RPE_CAP,
        capacity_multiplier: None,
    }
}

fn from_score(score: u8, load_ratio: Option<&LoadRatio>, baseline: &Baseline) -> Recommendation {
    let band = ReadinessBand::from_score(score);
    let mut multiplier = capacity_multiplier(band);

    let overreaching = load_ratio.and_then(|lr| lr.ratio).filter(|r| *r > OVERREACH_RATIO);
    if overreaching.is_some() {
        multiplier *= OVERREACH_FACTOR;
    }

    let volume_cap = round_u32(baseline.avg_volume * multiplier);
    let max_volume = volume_cap.saturating_add(3).min(round_u32(f64::from(volume_cap) * 1.2));
    let ceiling = rpe_ceiling(band);

    let (focus, style) = match band {
        ReadinessBand::Optimal => ("push your limits", "Power and limit bouldering"),
        ReadinessBand::Good => ("quality volume", "Projects mixed with volume at flash grade"),
        ReadinessBand::Moderate => ("steady training", "Technical problems at moderate grades"),
        ReadinessBand::Caution => ("technique focus", "Low-intensity technical climbing"),
        ReadinessBand::Limited | ReadinessBand::Poor => ("active recovery", "Easy endurance mileage or a rest day"),
    };

    let note = match overreaching {
        Some(r) => Some(format!("Load ratio {:.2} is above {:.1}, volume trimmed by 20%", r, OVERREACH_RATIO)),
        None if band >= ReadinessBand::Limited => Some("Consider taking a rest day".to_string()),
        None => None,
    };

    Recommendation {
        focus: focus.to_string(),
        volume_cap: volume_label(volume_cap, max_volume),
        rpe_cap: rpe_label(ceiling),
        style: style.to_string(),
        note,
        volume_range: (volume_cap, max_volume.max(volume_cap)),
        rpe_ceiling: ceiling,
        capacity_multiplier: Some(multiplier),
    }
}

/// Bounded recommendation from readiness, load ratio and baseline.
pub fn recommend(
    readiness: &ReadinessScore,
    load_ratio: Option<&LoadRatio>,
    baseline: &Baseline,
    profile: Option<&UserProfile>,
) -> Recommendation {
    match (readiness.score, baseline.source) {
        (Some(score), _) => from_score(score, load_ratio, baseline),
        (None, BaselineSource::Onboarding) => from_profile(baseline, profile),
        (None, _) => generic_default(),
    }
}
