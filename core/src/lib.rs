//! Savestate and practice-tool core for a frame-stepped 3D platformer host.
//!
//! The host owns the simulation and calls into `PracticeSession::update`
//! once per frame. Everything here is synchronous and single-threaded.

pub mod behavior;
pub mod checksum;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod host;
pub mod hud;
pub mod input;
pub mod matcher;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod types;
