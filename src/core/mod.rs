pub mod config;
pub mod errors;
pub mod rng;
pub mod road_curve;
pub mod scene_plugin;
