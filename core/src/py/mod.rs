use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::analyze;
use crate::error::EngineError;

fn to_py_err(e: EngineError) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

/// analyze_history_json(sessions_json, profile_json=None, now_ms=None, cfg_json=None) -> str
#[pyfunction]
#[pyo3(signature = (sessions_json, profile_json=None, now_ms=None, cfg_json=None))]
fn analyze_history_json(
    sessions_json: &str,
    profile_json: Option<&str>,
    now_ms: Option<i64>,
    cfg_json: Option<&str>,
) -> PyResult<String> {
    analyze::analyze_history_json(sessions_json, profile_json, now_ms, cfg_json).map_err(to_py_err)
}

/// session_load_json(session_json) -> float
#[pyfunction]
fn session_load_json(session_json: &str) -> PyResult<f64> {
    let record: crate::models::SessionRecord =
        crate::error::parse_json("session", session_json).map_err(to_py_err)?;
    Ok(crate::load::session_load(&crate::types::Session::from(&record)))
}

#[pymodule]
fn climbload_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_history_json, m)?)?;
    m.add_function(wrap_pyfunction!(session_load_json, m)?)?;
    Ok(())
}
