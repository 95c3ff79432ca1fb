use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A character ramp needs at least one glyph.
    #[error("Rampe de caractères vide")]
    EmptyRamp,
}
