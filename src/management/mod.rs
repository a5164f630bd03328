//! Application lifecycle: the staged scene build and its loading screen.

use bevy::prelude::*;

pub mod loading;

/// Top-level application state. The scene is assembled one stage per
/// frame during `Loading`, then the chase runs in `Running`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}
