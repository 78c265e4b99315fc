//! Headless host for the steering core: scenario loading, formation
//! scripting and frame output.

pub mod convert;
pub mod formation;
pub mod output;
pub mod simulation;

pub use simulation::Simulation;
