//! planview - budgeting report viewer core
//!
//! Decodes the plan-fact and consolidated budget reports the backend
//! generates (XLSX), classifies and paginates their columns, renders styled
//! HTML pages, and tracks long-running report-generation jobs:
//! - Grid decoding with fill/font style capture
//! - Date-column and title heuristics over report headers
//! - uk-UA numeric, percent, and hryvnia formatting
//! - Sans-IO job polling with countdown and terminal-status detection
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ReportViewer, JobPoller, JobKind } from 'planview';
//! await init();
//! const viewer = new ReportViewer();
//! const token = viewer.begin_load();
//! viewer.complete_load(token, bytes);
//! panel.innerHTML = viewer.render_html();
//! ```

pub mod api;
pub mod cell_ref;
pub mod classify;
pub mod color;
pub mod decode;
pub mod error;
pub mod format;
pub mod grid;
pub mod job;
pub mod paginate;
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{PlanviewError, Result};
pub use grid::Grid;
pub use job::{JobKind, JobPhase, JobPoller, PollerConfig};
pub use viewer::ReportViewer;

/// Log an error to wherever the host shows them.
#[cfg(target_arch = "wasm32")]
pub(crate) fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn log_error(message: &str) {
    eprintln!("{message}");
}

/// Decode a report file and return the grid as a JSON string.
///
/// # Errors
/// Returns an error if the buffer is not a valid report spreadsheet.
#[wasm_bindgen]
pub fn parse_report(data: &[u8]) -> std::result::Result<String, JsValue> {
    let grid = decode::decode(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&grid)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Decode a report file and return the grid as a `JsValue`.
///
/// More efficient than `parse_report` when the result is consumed directly
/// in JavaScript.
///
/// # Errors
/// Returns an error if the buffer is not a valid report spreadsheet.
#[wasm_bindgen]
pub fn parse_report_to_js(data: &[u8]) -> std::result::Result<JsValue, JsValue> {
    let grid = decode::decode(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&grid)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
