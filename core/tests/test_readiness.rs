// core/tests/test_readiness.rs
use climbload_core::readiness::{load_recovery, score_load_trend, score_volume_pattern};
use climbload_core::{
    assess_readiness, default_cfg, Climb, ClimbStyle, Confidence, EngineCfg, Grade, History, ReadinessBand,
    ReadinessComponents, ReadinessStatus, ReadinessWeights, Session,
};

const NOW: i64 = 1_700_000_000_000;
const HOUR: i64 = 3_600_000;

/// `n` identical V4 technical flashes at `rpe`, `hours_ago` before NOW.
fn session(hours_ago: f64, n: usize, rpe: u8) -> Session {
    let climbs = (0..n)
        .map(|_| Climb::boulder(Grade::new(4), ClimbStyle::Technical, 1, rpe))
        .collect();
    Session::new(NOW - (hours_ago * HOUR as f64) as i64, climbs)
}

fn assess(sessions: &[Session]) -> climbload_core::ReadinessScore {
    assess_readiness(&History::new(sessions), NOW, default_cfg())
}

#[test]
fn fewer_than_three_sessions_has_no_score() {
    for n in 0..3 {
        let sessions: Vec<Session> = (0..n).map(|i| session(24.0 * (i + 1) as f64, 5, 6)).collect();
        let r = assess(&sessions);
        assert_eq!(r.score, None, "n={n}");
        assert_eq!(r.status, ReadinessStatus::Insufficient);
        assert_eq!(r.confidence, Confidence::None);
        assert_eq!(r.sessions_needed, (3 - n) as u32);
    }
}

#[test]
fn building_phase_uses_latest_session() {
    let sessions = vec![session(24.0, 2, 7), session(72.0, 3, 6), session(120.0, 3, 6)];
    let r = assess(&sessions);

    // recovery 24/48 x 60 = 30, fatigue (10 - 7) x 4 = 12
    assert_eq!(r.score, Some(42));
    assert_eq!(r.status, ReadinessStatus::Building);
    assert_eq!(r.confidence, Confidence::Low);
    assert_eq!(r.band, Some(ReadinessBand::Limited));
    assert_eq!(r.message, "Limited");
    assert_eq!(r.sessions_needed, 2);
    match r.components {
        Some(ReadinessComponents::Building { recovery, fatigue, hours_since_last }) => {
            assert!((recovery - 30.0).abs() < 1e-9);
            assert!((fatigue - 12.0).abs() < 1e-9);
            assert!((hours_since_last - 24.0).abs() < 1e-9);
        }
        other => panic!("expected building components, got {other:?}"),
    }
}

#[test]
fn building_score_is_clamped() {
    // long rest + very easy last session: 60 (capped 100) + 36
    let sessions = vec![session(24.0 * 30.0, 4, 1), session(24.0 * 31.0, 4, 1), session(24.0 * 32.0, 4, 1)];
    let r = assess(&sessions);
    assert_eq!(r.score, Some(100));
}

#[test]
fn calibrating_with_five_sessions() {
    let sessions: Vec<Session> = (1..=5).map(|i| session(48.0 * i as f64, 10, 6)).collect();
    let r = assess(&sessions);

    // recovery 100, trend ratio 900/375 = 2.4 -> 25, fatigue 40, volume 100
    // 35 + 6.25 + 8 + 20 = 69.25
    assert_eq!(r.score, Some(69));
    assert_eq!(r.status, ReadinessStatus::Calibrating);
    assert_eq!(r.confidence, Confidence::Medium);
    assert_eq!(r.band, Some(ReadinessBand::Moderate));
    assert_eq!(r.sessions_needed, 2);

    match r.components {
        Some(ReadinessComponents::Full { load_recovery, load_trend, load_trend_ratio, cumulative_fatigue, volume_pattern, .. }) => {
            assert!((load_recovery - 100.0).abs() < 1e-9);
            assert_eq!(load_trend, 25.0);
            assert!((load_trend_ratio.unwrap() - 2.4).abs() < 1e-9);
            assert!((cumulative_fatigue - 40.0).abs() < 1e-9);
            assert_eq!(volume_pattern, 100.0);
        }
        other => panic!("expected full components, got {other:?}"),
    }
}

#[test]
fn calibrated_with_consistent_twice_weekly_training() {
    let days = [1.5, 4.0, 8.0, 11.0, 15.0, 18.0, 22.0, 25.0];
    let sessions: Vec<Session> = days.iter().map(|d| session(24.0 * d, 12, 6)).collect();
    let r = assess(&sessions);

    // recovery 36/48 x 100 = 75, trend ratio 1.0 -> 100, fatigue 40, volume 100
    assert_eq!(r.score, Some(79));
    assert_eq!(r.status, ReadinessStatus::Calibrated);
    assert_eq!(r.confidence, Confidence::High);
    assert_eq!(r.band, Some(ReadinessBand::Good));
    assert_eq!(r.sessions_needed, 0);
}

#[test]
fn recovery_curve_peaks_at_48h_and_floors_at_50() {
    assert_eq!(load_recovery(0.0), 0.0);
    assert!((load_recovery(24.0) - 50.0).abs() < 1e-12);
    assert!((load_recovery(48.0) - 100.0).abs() < 1e-12);
    // one week past optimal = 15 points
    assert!((load_recovery(48.0 + 24.0 * 7.0) - 85.0).abs() < 1e-9);
    assert_eq!(load_recovery(24.0 * 60.0), 50.0);
    assert_eq!(load_recovery(-5.0), 0.0);
}

#[test]
fn load_trend_curve_breakpoints() {
    assert_eq!(score_load_trend(Some(0.39)), 60.0);
    assert_eq!(score_load_trend(Some(0.4)), 85.0);
    assert_eq!(score_load_trend(Some(0.69)), 85.0);
    assert_eq!(score_load_trend(Some(0.7)), 100.0);
    assert_eq!(score_load_trend(Some(1.3)), 100.0);
    assert_eq!(score_load_trend(Some(1.31)), 70.0);
    assert_eq!(score_load_trend(Some(1.5)), 70.0);
    assert_eq!(score_load_trend(Some(1.8)), 45.0);
    assert_eq!(score_load_trend(Some(1.81)), 25.0);
    assert_eq!(score_load_trend(None), 60.0);
}

#[test]
fn volume_pattern_needs_three_sessions() {
    let a = session(10.0, 10, 6);
    let b = session(20.0, 14, 6);
    assert_eq!(score_volume_pattern(&[&a, &b]), 75.0);

    // 10, 14, 12 -> mean 12, variance 8/3
    let c = session(30.0, 12, 6);
    let v = score_volume_pattern(&[&a, &b, &c]);
    assert!((v - (100.0 - 16.0 / 3.0)).abs() < 1e-9);

    // very erratic volume bottoms out at 0
    let tiny = session(40.0, 1, 6);
    let huge = session(50.0, 40, 6);
    assert_eq!(score_volume_pattern(&[&tiny, &huge, &a]), 0.0);
}

#[test]
fn score_stays_in_range_for_stale_and_fresh_histories() {
    for offset in [0.0, 1.0, 47.0, 49.0, 24.0 * 40.0, 24.0 * 400.0] {
        for n in 3..10 {
            let sessions: Vec<Session> = (0..n).map(|i| session(offset + 30.0 * i as f64, 1 + i % 4, 10)).collect();
            let r = assess(&sessions);
            let s = r.score.expect("score for n >= 3");
            assert!(s <= 100, "offset={offset} n={n} score={s}");
        }
    }
}

#[test]
fn untimed_sessions_do_not_count_towards_n() {
    let mut sessions = vec![session(24.0, 3, 6), session(48.0, 3, 6)];
    sessions.push(Session { timestamp_ms: None, ..session(0.0, 3, 6) });
    let r = assess(&sessions);
    assert_eq!(r.status, ReadinessStatus::Insufficient);
}

#[test]
fn input_order_does_not_matter_and_input_is_untouched() {
    let sessions: Vec<Session> = (1..=6).map(|i| session(30.0 * i as f64, 4 + i, 5 + (i % 3) as u8)).collect();
    let mut shuffled = sessions.clone();
    shuffled.reverse();
    shuffled.swap(1, 4);
    let before = shuffled.clone();

    assert_eq!(assess(&sessions), assess(&shuffled));
    assert_eq!(shuffled, before);
}

#[test]
fn custom_weights_are_renormalized() {
    let sessions: Vec<Session> = (1..=5).map(|i| session(48.0 * i as f64, 10, 6)).collect();
    // only recovery counts: weights (2, 0, 0, 0) -> (1, 0, 0, 0)
    let cfg = EngineCfg {
        readiness_weights: Some(ReadinessWeights {
            load_recovery: 2.0,
            load_trend: 0.0,
            cumulative_fatigue: 0.0,
            volume_pattern: 0.0,
        }),
    };
    let r = assess_readiness(&History::new(&sessions), NOW, &cfg);
    assert_eq!(r.score, Some(100));
}
