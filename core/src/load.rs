use crate::types::{Climb, ClimbType, Session};

/// Each extra attempt compounds the cost by 15 %.
pub const ATTEMPT_GROWTH: f64 = 1.15;

/// Board wall angle -> multiplier. Boulders and unknown angles are neutral.
pub fn angle_multiplier(climb_type: ClimbType, wall_angle_deg: Option<u16>) -> f64 {
    match (climb_type, wall_angle_deg) {
        (ClimbType::Board, Some(a)) if a <= 15 => 0.95,
        (ClimbType::Board, Some(a)) if a <= 35 => 1.0,
        (ClimbType::Board, Some(_)) => 1.15,
        _ => 1.0,
    }
}

/// 1.15^(attempts-1); a flash is the 1.0 floor.
#[inline]
pub fn attempt_factor(attempts: u32) -> f64 {
    let extra = attempts.max(1) - 1;
    ATTEMPT_GROWTH.powi(extra.min(i32::MAX as u32) as i32)
}

/// Load for one climb: grade points x RPE x style x attempts x type x angle.
pub fn climb_load(climb: &Climb) -> f64 {
    let load = climb.grade.points()
        * f64::from(climb.rpe)
        * climb.style.multiplier()
        * attempt_factor(climb.attempts)
        * climb.climb_type.multiplier()
        * angle_multiplier(climb.climb_type, climb.wall_angle_deg);
    // inf from huge attempt counts saturates
    if load.is_nan() { 0.0 } else { load.clamp(0.0, f64::MAX) }
}

/// Sum of climb loads. An empty session is 0.
pub fn session_load(session: &Session) -> f64 {
    climbs_load(&session.climbs)
}

pub fn climbs_load(climbs: &[Climb]) -> f64 {
    climbs.iter().map(climb_load).sum()
}

/// Summed load of a set of sessions (window totals).
pub fn total_load<'a, I>(sessions: I) -> f64
where
    I: IntoIterator<Item = &'a Session>,
{
    sessions.into_iter().map(session_load).sum()
}
