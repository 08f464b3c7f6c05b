//! Structured error types for planview.
//!
//! One error enum for the whole crate; decode and API layers both speak it.

/// All errors that can occur while decoding or preparing a report.
#[derive(Debug, thiserror::Error)]
pub enum PlanviewError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The workbook declares no worksheets.
    #[error("workbook has no worksheets")]
    NoWorksheet,

    /// General parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request rejected before dispatch (bad date range, missing selection).
    #[error("Validation: {0}")]
    Validation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlanviewError>;

impl From<String> for PlanviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for PlanviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<PlanviewError> for wasm_bindgen::JsValue {
    fn from(e: PlanviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
