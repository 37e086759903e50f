//! Central error type for the dashboard.
//!
//! Geometry and configuration problems are reported at construction time
//! instead of producing degenerate meshes; browser failures are wrapped as
//! `Backend` errors.

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("segment counts must be >= 1 and give at most 4194304 vertices (horizontal: {horizontal}, vertical: {vertical})")]
    InvalidSegments { horizontal: u32, vertical: u32 },

    #[error("{name} must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("arc from {start} to {end} rad is empty")]
    EmptyArc { start: f64, end: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl DashboardError {
    pub fn config<T: ToString>(msg: T) -> Self {
        DashboardError::InvalidConfig(msg.to_string())
    }

    pub fn backend<T: ToString>(msg: T) -> Self {
        DashboardError::Backend(msg.to_string())
    }

    /// Wrap a value thrown by the browser.
    pub fn js_err(value: wasm_bindgen::JsValue) -> Self {
        DashboardError::Backend(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DashboardError> for wasm_bindgen::JsValue {
    fn from(err: DashboardError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
