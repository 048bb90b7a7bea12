/// Errors shared by the accumulator builders and the peak finder.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HoughError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A vote fell outside the precomputed rho axis. The axis is sized to
    /// cover every pixel of the mask, so this indicates a bug rather than
    /// bad input.
    #[error("rho {rho} (theta {theta_deg} deg) has no matching accumulator bin")]
    RhoOutOfRange { rho: f64, theta_deg: f64 },

    #[error("shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid mask buffer length (expected {expected}, got {got})")]
    InvalidMaskBuffer { expected: usize, got: usize },
}

impl HoughError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HoughError>;
