use thiserror::Error;

/// Per-cell and per-sheet faults. None of these abort a run: the offending
/// cell or sheet is skipped and the error is kept as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("header marker {marker:?} not found in sheet {sheet:?}")]
    AnchorNotFound { sheet: String, marker: String },

    #[error("header marker in sheet {sheet:?} at row {row}, col {col} leaves no room for both halves")]
    WindowOutOfRange { sheet: String, row: u32, col: u32 },

    #[error("cell at row {row}, col {col} matched {template} but {reason}")]
    StructuralMismatch {
        row: u32,
        col: u32,
        template: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
