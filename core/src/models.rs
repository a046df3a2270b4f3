//! Loose records as they come out of the session store, and the one place
//! where they are normalized into the strict types in `types.rs`.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Climb, ClimbStyle, ClimbType, Grade, Session, UserProfile};

/// RPE used when a climb was logged without one.
pub const DEFAULT_RPE: u8 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClimbRecord {
    /// "V5", "v5" or a bare ordinal.
    #[serde(default)]
    pub grade: Option<Value>,
    #[serde(default)]
    pub style: Option<Value>,
    /// Number or numeric string, same for `rpe`.
    #[serde(default)]
    pub attempts: Option<Value>,
    #[serde(default, alias = "RPE")]
    pub rpe: Option<Value>,
    #[serde(default, rename = "type", alias = "climbType", alias = "climb_type")]
    pub climb_type: Option<Value>,
    /// Number or label ("35°", "35 deg").
    #[serde(default, alias = "wallAngle", alias = "wallAngleDegrees", alias = "wall_angle_degrees")]
    pub wall_angle: Option<Value>,
}

/// Epoch millis or an RFC 3339 string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampRepr {
    Millis(i64),
    Float(f64),
    Text(String),
    /// Anything else reads as a missing timestamp.
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub timestamp: Option<TimestampRepr>,
    #[serde(default, alias = "endTime")]
    pub end_time: Option<TimestampRepr>,
    /// `null` and missing both mean an empty session.
    #[serde(default)]
    pub climbs: Option<Vec<ClimbRecord>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, alias = "flashGrade")]
    pub flash_grade: Option<Value>,
    #[serde(default, alias = "typicalVolume")]
    pub typical_volume: Option<Value>,
}

// ──────────────────────────────────────────────────────────────────────────────
// Normalization
// ──────────────────────────────────────────────────────────────────────────────

impl TimestampRepr {
    pub fn to_millis(&self) -> Option<i64> {
        match self {
            TimestampRepr::Millis(ms) => Some(*ms),
            TimestampRepr::Float(ms) if ms.is_finite() => Some(ms.round() as i64),
            TimestampRepr::Float(_) => None,
            TimestampRepr::Text(s) => {
                let s = s.trim();
                if let Ok(ms) = s.parse::<i64>() {
                    return Some(ms);
                }
                DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp_millis())
            }
            TimestampRepr::Other(_) => None,
        }
    }
}

/// Finite number, or a string that parses as one.
pub fn value_as_f64(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// Grade label or bare ordinal; everything else is V0.
pub fn grade_from_value(v: &Value) -> Grade {
    match v {
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(x) => grade_from_ordinal(x),
            Err(_) => Grade::from_label_lossy(s),
        },
        Value::Number(n) => n.as_f64().map(grade_from_ordinal).unwrap_or_default(),
        _ => Grade::default(),
    }
}

fn grade_from_ordinal(x: f64) -> Grade {
    if x.is_finite() && x >= 0.0 {
        Grade::new(x.round().min(f64::from(Grade::MAX_ORDINAL)) as u8)
    } else {
        Grade::default()
    }
}

/// Leading integer digits of "35°", "35", " 40 deg". Fractions are truncated.
pub fn parse_wall_angle(v: &Value) -> Option<u16> {
    match v {
        Value::Number(n) => {
            let x = n.as_f64()?;
            if x.is_finite() && x >= 0.0 {
                Some(x.min(f64::from(u16::MAX)) as u16)
            } else {
                None
            }
        }
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u16>().ok()
        }
        _ => None,
    }
}

impl From<&ClimbRecord> for Climb {
    fn from(r: &ClimbRecord) -> Self {
        let grade = r.grade.as_ref().map(grade_from_value).unwrap_or_default();
        let style = r
            .style
            .as_ref()
            .and_then(Value::as_str)
            .map(ClimbStyle::from_label_lossy)
            .unwrap_or(ClimbStyle::Technical);
        let climb_type = r
            .climb_type
            .as_ref()
            .and_then(Value::as_str)
            .map(ClimbType::from_label_lossy)
            .unwrap_or(ClimbType::Boulder);

        let attempts = match r.attempts.as_ref().and_then(value_as_f64) {
            Some(a) if a >= 1.0 => a.round().min(f64::from(u32::MAX)) as u32,
            _ => 1,
        };
        let rpe = match r.rpe.as_ref().and_then(value_as_f64) {
            Some(x) => x.round().clamp(1.0, 10.0) as u8,
            None => DEFAULT_RPE,
        };
        let wall_angle_deg = match climb_type {
            ClimbType::Board => r.wall_angle.as_ref().and_then(parse_wall_angle),
            ClimbType::Boulder => None,
        };

        Climb { grade, style, attempts, rpe, climb_type, wall_angle_deg }
    }
}

impl From<&SessionRecord> for Session {
    fn from(r: &SessionRecord) -> Self {
        Session {
            timestamp_ms: r.timestamp.as_ref().and_then(TimestampRepr::to_millis),
            end_time_ms: r.end_time.as_ref().and_then(TimestampRepr::to_millis),
            climbs: r.climbs.iter().flatten().map(Climb::from).collect(),
        }
    }
}

impl From<&ProfileRecord> for UserProfile {
    fn from(r: &ProfileRecord) -> Self {
        let typical_volume = match r.typical_volume.as_ref().and_then(value_as_f64) {
            Some(v) if v >= 0.5 => Some(v.round().min(f64::from(u32::MAX)) as u32),
            _ => None,
        };
        UserProfile {
            flash_grade: r.flash_grade.as_ref().map(grade_from_value),
            typical_volume,
        }
    }
}

pub fn normalize_sessions(records: &[SessionRecord]) -> Vec<Session> {
    records.iter().map(Session::from).collect()
}
