#![cfg_attr(not(feature = "std"), no_std)]

//! Force-based steering for autonomous vehicles.
//!
//! Agents seek goals with deceleration on arrival, keep apart from their
//! neighbors and steer around circular obstacles using two lookahead points.
//! The forces are blended per tick and integrated with semi-implicit Euler.
//! Rendering, input and formation scripting belong to the host.

mod math;

pub mod agent;
pub mod avoidance;
pub mod behavior;
pub mod compositor;
pub mod fleet;
pub mod obstacle;
pub mod path;
pub mod separation;
mod vector;

pub use agent::{nearest_agent, Agent, AgentConfig, AgentId, AgentKind, AgentSnapshot};
pub use avoidance::{avoid, Avoidance, AvoidanceOptions, AvoidanceProbe, Threat};
pub use compositor::{apply_behaviors, BehaviorWeights, TickPlan};
pub use fleet::{Fleet, TickReport};
#[cfg(feature = "std")]
pub use fleet::FleetStd;
pub use obstacle::{nearest_obstacle, AlertState, Obstacle};
pub use path::{PathHistory, PATH_CAPACITY};
pub use separation::separation;
pub use vector::Vector2;
