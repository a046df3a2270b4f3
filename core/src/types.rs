use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Climb / session domain
// ---------------------------------------------------------------------------

/// V-scale grade stored as its ordinal (V0 = 0 ... V15 = 15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Grade(u8);

impl Grade {
    pub const MAX_ORDINAL: u8 = 15;

    /// Ordinals above V15 saturate.
    pub fn new(ordinal: u8) -> Self {
        Grade(ordinal.min(Self::MAX_ORDINAL))
    }

    pub fn ordinal(self) -> u8 {
        self.0
    }

    /// Grade points used by the load formula (V0 -> 1 ... V15 -> 16).
    pub fn points(self) -> f64 {
        f64::from(self.0) + 1.0
    }

    /// Accepts "V5", "v5", " V5+ ", "V4-5" (leading digits win).
    pub fn parse(label: &str) -> Option<Self> {
        let s = label.trim();
        let rest = s.strip_prefix('V').or_else(|| s.strip_prefix('v'))?;
        let digits: Vec<u32> = rest.chars().map_while(|c| c.to_digit(10)).collect();
        if digits.is_empty() {
            return None;
        }
        // saturating so "V99999999999" lands on V15 like "V17"
        let n = digits.iter().fold(0u32, |n, d| n.saturating_mul(10).saturating_add(*d));
        Some(Grade::new(n.min(u32::from(Self::MAX_ORDINAL)) as u8))
    }

    /// Unparsable or missing labels fall back to V0.
    pub fn from_label_lossy(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl FromStr for Grade {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::parse(s).ok_or_else(|| format!("Unknown grade: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbStyle {
    Power,
    Technical,
    /// "Simple" in older logs.
    Endurance,
}

impl ClimbStyle {
    pub fn multiplier(self) -> f64 {
        match self {
            ClimbStyle::Power => 1.2,
            ClimbStyle::Technical => 1.0,
            ClimbStyle::Endurance => 0.8,
        }
    }

    /// Unknown labels map to Technical (neutral 1.0 multiplier).
    pub fn from_label_lossy(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "power" => ClimbStyle::Power,
            "simple" | "endurance" | "simple/endurance" => ClimbStyle::Endurance,
            _ => ClimbStyle::Technical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimbType {
    Boulder,
    Board,
}

impl ClimbType {
    pub fn multiplier(self) -> f64 {
        match self {
            ClimbType::Board => 1.1,
            ClimbType::Boulder => 1.0,
        }
    }

    pub fn from_label_lossy(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "board" => ClimbType::Board,
            _ => ClimbType::Boulder,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Climb {
    pub grade: Grade,
    pub style: ClimbStyle,
    /// >= 1 (1 = flash)
    pub attempts: u32,
    /// 1..=10
    pub rpe: u8,
    pub climb_type: ClimbType,
    /// Only meaningful for board climbs.
    pub wall_angle_deg: Option<u16>,
}

impl Climb {
    pub fn boulder(grade: Grade, style: ClimbStyle, attempts: u32, rpe: u8) -> Self {
        Climb {
            grade,
            style,
            attempts: attempts.max(1),
            rpe: rpe.clamp(1, 10),
            climb_type: ClimbType::Boulder,
            wall_angle_deg: None,
        }
    }

    pub fn board(grade: Grade, style: ClimbStyle, attempts: u32, rpe: u8, wall_angle_deg: Option<u16>) -> Self {
        Climb {
            climb_type: ClimbType::Board,
            wall_angle_deg,
            ..Climb::boulder(grade, style, attempts, rpe)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    /// Epoch millis. `None` means the session cannot be ordered.
    pub timestamp_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
    pub climbs: Vec<Climb>,
}

impl Session {
    pub fn new(timestamp_ms: i64, climbs: Vec<Climb>) -> Self {
        Session { timestamp_ms: Some(timestamp_ms), end_time_ms: None, climbs }
    }

    pub fn climb_count(&self) -> usize {
        self.climbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.climbs.is_empty()
    }

    /// Mean RPE over the logged climbs, `None` for an empty session.
    pub fn avg_rpe(&self) -> Option<f64> {
        if self.climbs.is_empty() {
            return None;
        }
        let sum: f64 = self.climbs.iter().map(|c| f64::from(c.rpe)).sum();
        Some(sum / self.climbs.len() as f64)
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        match (self.timestamp_ms, self.end_time_ms) {
            (Some(start), Some(end)) if end >= start => Some(end.saturating_sub(start) as f64 / 60_000.0),
            _ => None,
        }
    }
}

/// Self-reported onboarding data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub flash_grade: Option<Grade>,
    pub typical_volume: Option<u32>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
    ProfileBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    Sessions,
    Onboarding,
    Default,
}

impl BaselineSource {
    pub fn as_str(self) -> &'static str {
        match self {
            BaselineSource::Sessions => "sessions",
            BaselineSource::Onboarding => "onboarding",
            BaselineSource::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub avg_session_load: f64,
    /// Climbs per session.
    pub avg_volume: f64,
    pub avg_rpe: f64,
    pub confidence: Confidence,
    pub source: BaselineSource,
    /// Sessions averaged by the history branch (0 otherwise).
    pub sessions_used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Insufficient,
    Building,
    Calibrating,
    Calibrated,
}

impl ReadinessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessStatus::Insufficient => "insufficient",
            ReadinessStatus::Building => "building",
            ReadinessStatus::Calibrating => "calibrating",
            ReadinessStatus::Calibrated => "calibrated",
        }
    }
}

/// Score bands shared by the readiness message and the recommendation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    Optimal,
    Good,
    Moderate,
    Caution,
    Limited,
    Poor,
}

impl ReadinessBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            88.. => ReadinessBand::Optimal,
            75..=87 => ReadinessBand::Good,
            60..=74 => ReadinessBand::Moderate,
            45..=59 => ReadinessBand::Caution,
            30..=44 => ReadinessBand::Limited,
            _ => ReadinessBand::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessBand::Optimal => "Optimal",
            ReadinessBand::Good => "Good",
            ReadinessBand::Moderate => "Moderate",
            ReadinessBand::Caution => "Caution",
            ReadinessBand::Limited => "Limited",
            ReadinessBand::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ReadinessComponents {
    Building {
        recovery: f64,
        fatigue: f64,
        hours_since_last: f64,
    },
    Full {
        load_recovery: f64,
        load_trend: f64,
        /// `None` when the 28-day window carries no load.
        load_trend_ratio: Option<f64>,
        cumulative_fatigue: f64,
        volume_pattern: f64,
        hours_since_last: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub score: Option<u8>,
    pub status: ReadinessStatus,
    pub band: Option<ReadinessBand>,
    pub message: String,
    pub confidence: Confidence,
    pub components: Option<ReadinessComponents>,
    /// Sessions still needed before the next phase unlocks.
    pub sessions_needed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadRatioStatus {
    Insufficient,
    Low,
    Optimal,
    Elevated,
    High,
}

impl LoadRatioStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadRatioStatus::Insufficient => "insufficient",
            LoadRatioStatus::Low => "low",
            LoadRatioStatus::Optimal => "optimal",
            LoadRatioStatus::Elevated => "elevated",
            LoadRatioStatus::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioConfidence {
    Establishing,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRatio {
    pub ratio: Option<f64>,
    pub status: LoadRatioStatus,
    pub message: String,
    /// Sessions per week over the chronic window.
    pub frequency: f64,
    pub confidence: RatioConfidence,
    pub acute_load: f64,
    pub chronic_load: f64,
    pub expected_weekly_load: Option<f64>,
    pub chronic_sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub focus: String,
    /// e.g. "12-15"
    pub volume_cap: String,
    /// e.g. "≤7" or "7-8"
    pub rpe_cap: String,
    pub style: String,
    pub note: Option<String>,
    pub volume_range: (u32, u32),
    pub rpe_ceiling: u8,
    pub capacity_multiplier: Option<f64>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineCfg {
    pub readiness_weights: Option<ReadinessWeights>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub load_recovery: f64,      // typ 0.35
    pub load_trend: f64,         // typ 0.25
    pub cumulative_fatigue: f64, // typ 0.20
    pub volume_pattern: f64,     // typ 0.20
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        ReadinessWeights {
            load_recovery: 0.35,
            load_trend: 0.25,
            cumulative_fatigue: 0.20,
            volume_pattern: 0.20,
        }
    }
}

impl ReadinessWeights {
    /// Rescaled to sum 1. Negative, non-finite or zero-sum weights give the defaults.
    pub fn normalized(&self) -> Self {
        let ws = [self.load_recovery, self.load_trend, self.cumulative_fatigue, self.volume_pattern];
        if ws.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Self::default();
        }
        let sum: f64 = ws.iter().sum();
        if sum <= 0.0 {
            return Self::default();
        }
        ReadinessWeights {
            load_recovery: ws[0] / sum,
            load_trend: ws[1] / sum,
            cumulative_fatigue: ws[2] / sum,
            volume_pattern: ws[3] / sum,
        }
    }
}

impl EngineCfg {
    pub fn weights(&self) -> ReadinessWeights {
        self.readiness_weights.map(|w| w.normalized()).unwrap_or_default()
    }
}

static DEFAULT_CFG: Lazy<EngineCfg> = Lazy::new(EngineCfg::default);

/// Shared default config for callers that don't carry their own.
pub fn default_cfg() -> &'static EngineCfg {
    &DEFAULT_CFG
}
