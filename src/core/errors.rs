use std::fmt;

/// Failures surfaced by the loading-phase builders.
///
/// Runtime systems have no failure modes of their own; anything that can
/// go wrong does so while the scene is assembled, gets reported once on
/// the loading screen, and freezes the build there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    InvalidSettings(String),
    MeshConstruction(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
            BuildError::MeshConstruction(msg) => write!(f, "mesh construction failed: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}
