use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::analyze::AnalyzeOutputs;
use crate::error::EngineError;

/// Prometheus counters for engine runs. Purely observational: nothing here
/// feeds back into a score.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    analyses_total: IntCounter,
    readiness_phase_total: IntCounterVec,
    baseline_source_total: IntCounterVec,
    load_ratio_status_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, EngineError> {
        let registry = Registry::new();

        let analyses_total = IntCounter::new("climbload_analyses_total", "History analyses run")?;
        let readiness_phase_total = IntCounterVec::new(
            Opts::new("climbload_readiness_phase_total", "Readiness results by phase"),
            &["phase"],
        )?;
        let baseline_source_total = IntCounterVec::new(
            Opts::new("climbload_baseline_source_total", "Baselines by source"),
            &["source"],
        )?;
        let load_ratio_status_total = IntCounterVec::new(
            Opts::new("climbload_load_ratio_status_total", "Load ratios by status (absent = too few sessions)"),
            &["status"],
        )?;

        registry.register(Box::new(analyses_total.clone()))?;
        registry.register(Box::new(readiness_phase_total.clone()))?;
        registry.register(Box::new(baseline_source_total.clone()))?;
        registry.register(Box::new(load_ratio_status_total.clone()))?;

        Ok(Metrics {
            registry,
            analyses_total,
            readiness_phase_total,
            baseline_source_total,
            load_ratio_status_total,
        })
    }

    pub fn observe(&self, out: &AnalyzeOutputs) {
        self.analyses_total.inc();
        self.readiness_phase_total
            .with_label_values(&[out.readiness.status.as_str()])
            .inc();
        self.baseline_source_total
            .with_label_values(&[out.baseline.source.as_str()])
            .inc();
        let status = out.load_ratio.as_ref().map(|lr| lr.status.as_str()).unwrap_or("absent");
        self.load_ratio_status_total.with_label_values(&[status]).inc();
    }

    pub fn analyses_total(&self) -> u64 {
        self.analyses_total.get()
    }

    pub fn readiness_phase_count(&self, phase: &str) -> u64 {
        self.readiness_phase_total.with_label_values(&[phase]).get()
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, EngineError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
