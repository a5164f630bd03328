//! A whimsical 3D chase: a blue hedgehog pursues a roadrunner down a
//! procedurally generated winding road that runs from forest into
//! desert.
//!
//! [`ChaseScenePlugin`] is the single entry point. The modules split by
//! concern: the parametric road curve and terrain meshes, scattered
//! environment pieces, the two character rigs with their gait-driven
//! animation, sky/lighting/particle effects with a banner-towing bird,
//! a follow camera with toggleable presets, and a staged loading flow
//! that assembles the scene one step per frame.

pub mod camera;
pub mod characters;
pub mod core;
pub mod effects;
pub mod environment;
pub mod management;
pub mod materials;
pub mod meshes;
pub mod systems;
pub mod terrain;

pub use crate::core::scene_plugin::ChaseScenePlugin;
