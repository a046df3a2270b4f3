pub mod acwr;
pub mod analyze;
pub mod baseline;
pub mod error;
pub mod history;
pub mod load;
pub mod metrics;
pub mod models;
pub mod readiness;
pub mod recommendation;
pub mod stats;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use acwr::load_ratio;
pub use analyze::{analyze_history, analyze_history_json, analyze_history_observed, AnalyzeInputs, AnalyzeOutputs};
pub use baseline::estimate_baseline;
pub use error::EngineError;
pub use history::History;
pub use load::{climb_load, session_load};
pub use metrics::Metrics;
pub use models::{ClimbRecord, ProfileRecord, SessionRecord};
pub use readiness::assess_readiness;
pub use recommendation::recommend;
pub use stats::RoundTo;
pub use types::*;
