use thiserror::Error;

/// Contract violations raised while building a curve selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// A label set was supplied but has no entry for this key.
    #[error("missing label for curve {key:?}")]
    MissingLabel { key: String },
}
