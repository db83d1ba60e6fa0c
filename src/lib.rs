//! ML Games - grid games with pluggable agents and a learning pipeline
//!
//! This library provides:
//! - Catch and Snake on a shared engine that captures every tick as a frame (game module)
//! - Random, human and neural-network agents (agents module)
//! - Recording, preprocessing and splitting of gameplay (data module)
//! - MLP and CNN baselines trained with burn (model module)
//! - A terminal display (render and input modules)
//! - The PLAY, COLLECT, PREPARE and TRAIN run types (modes module)

pub mod agents;
pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod model;
pub mod modes;
pub mod render;
