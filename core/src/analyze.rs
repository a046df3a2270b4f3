use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::acwr::load_ratio;
use crate::baseline::estimate_baseline;
use crate::error::{parse_json, EngineError};
use crate::history::History;
use crate::metrics::Metrics;
use crate::models::{normalize_sessions, ProfileRecord, SessionRecord};
use crate::readiness::assess_readiness;
use crate::recommendation::recommend;
use crate::types::{default_cfg, Baseline, EngineCfg, LoadRatio, ReadinessScore, Recommendation, Session, UserProfile};

#[derive(Clone, Copy)]
pub struct AnalyzeInputs<'a> {
    pub sessions: &'a [Session],
    pub profile: Option<&'a UserProfile>,
    /// Evaluation instant, epoch millis.
    pub now_ms: i64,
    /// `None` -> `default_cfg()`
    pub cfg: Option<&'a EngineCfg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeOutputs {
    pub readiness: ReadinessScore,
    pub load_ratio: Option<LoadRatio>,
    pub baseline: Baseline,
    pub recommendation: Recommendation,
    /// Sessions left out for lacking a timestamp.
    pub sessions_ignored: usize,
}

/// Runs the whole pipeline: baseline, readiness, load ratio, recommendation.
pub fn analyze_history(inputs: AnalyzeInputs) -> AnalyzeOutputs {
    let cfg = inputs.cfg.unwrap_or(default_cfg());
    let history = History::new(inputs.sessions);

    let baseline = estimate_baseline(&history, inputs.profile);
    let readiness = assess_readiness(&history, inputs.now_ms, cfg);
    let load_ratio = load_ratio(&history, inputs.now_ms);
    let recommendation = recommend(&readiness, load_ratio.as_ref(), &baseline, inputs.profile);

    AnalyzeOutputs {
        readiness,
        load_ratio,
        baseline,
        recommendation,
        sessions_ignored: history.dropped(),
    }
}

/// Same as `analyze_history`, and records the result in `metrics`.
pub fn analyze_history_observed(inputs: AnalyzeInputs, metrics: &Metrics) -> AnalyzeOutputs {
    let out = analyze_history(inputs);
    metrics.observe(&out);
    out
}

/// JSON in, JSON out. `now_ms = None` uses the wall clock.
pub fn analyze_history_json(
    sessions_json: &str,
    profile_json: Option<&str>,
    now_ms: Option<i64>,
    cfg_json: Option<&str>,
) -> Result<String, EngineError> {
    let records: Vec<SessionRecord> = parse_json("sessions", sessions_json)?;
    let profile: Option<UserProfile> = match profile_json {
        Some(txt) => parse_json::<Option<ProfileRecord>>("profile", txt)?.as_ref().map(UserProfile::from),
        None => None,
    };
    let cfg: Option<EngineCfg> = match cfg_json {
        Some(txt) => Some(parse_json("cfg", txt)?),
        None => None,
    };

    let sessions = normalize_sessions(&records);
    let out = analyze_history(AnalyzeInputs {
        sessions: &sessions,
        profile: profile.as_ref(),
        now_ms: now_ms.unwrap_or_else(|| Utc::now().timestamp_millis()),
        cfg: cfg.as_ref(),
    });
    Ok(serde_json::to_string(&out)?)
}
