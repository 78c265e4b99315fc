#![cfg_attr(not(feature = "std"), no_std)]

//! Serializable types exchanged between the steering core's hosts:
//! scenario files going in, frame snapshots coming out.

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A 2D position in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Color-coding hint for a renderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertTag {
    #[default]
    Clear,
    Wary,
    Collision,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    #[default]
    Vehicle,
    Target,
}

/// How followers pick their goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    /// Each agent trails the one spawned before it
    #[default]
    Convoy,
    /// Every follower trails the leader
    Pursuit,
}

impl Formation {
    pub fn toggled(self) -> Self {
        match self {
            Formation::Convoy => Formation::Pursuit,
            Formation::Pursuit => Formation::Convoy,
        }
    }
}

/// Agent limits and default blend weights
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    pub max_speed: f32,
    pub max_force: f32,
    pub visual_radius: f32,
    pub perception_radius: f32,
    pub lifespan: f32,
    pub arrive_weight: f32,
    pub obstacle_weight: f32,
    pub separation_weight: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_speed: 6.0,
            max_force: 0.9,
            visual_radius: 16.0,
            perception_radius: 24.0,
            lifespan: 5.0,
            arrive_weight: 0.3,
            obstacle_weight: 0.9,
            separation_weight: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleSpec {
    pub position: Position,
    pub radius: f32,
}

/// Something the host does at a given tick, standing in for user input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    AddObstacle(ObstacleSpec),
    /// Spawns a vehicle, at a random spot when no position is given
    SpawnVehicle {
        #[serde(default)]
        position: Option<Position>,
    },
    /// Launches a salvo of vehicles from the left edge
    FireMissiles { count: usize },
    ToggleFormation,
    ToggleDebug,
    ToggleAgentsAsObstacles,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioEvent {
    pub tick: u64,
    pub action: EventAction,
}

/// A complete headless run description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scenario {
    pub width: f32,
    pub height: f32,
    pub agent_count: usize,
    pub settings: AgentSettings,
    pub obstacles: Vec<ObstacleSpec>,
    /// Goals the leader visits in order, wrapping around
    pub waypoints: Vec<Position>,
    pub waypoint_radius: f32,
    pub formation: Formation,
    pub agents_as_obstacles: bool,
    pub events: Vec<ScenarioEvent>,
}

impl Default for Scenario {
    fn default() -> Self {
        let width = 800.0;
        let height = 600.0;
        Self {
            width,
            height,
            agent_count: 10,
            settings: AgentSettings::default(),
            obstacles: alloc::vec![ObstacleSpec {
                position: Position::new(width / 2.0, height / 2.0),
                radius: 100.0,
            }],
            waypoints: alloc::vec![
                Position::new(100.0, 100.0),
                Position::new(width - 100.0, 100.0),
                Position::new(width - 100.0, height - 100.0),
                Position::new(100.0, height - 100.0),
            ],
            waypoint_radius: 30.0,
            formation: Formation::Convoy,
            agents_as_obstacles: false,
            events: Vec::new(),
        }
    }
}

#[cfg(feature = "std")]
impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentFrame {
    pub id: u32,
    pub role: AgentRole,
    pub position: Position,
    pub velocity: Position,
    pub alert: AlertTag,
    pub trail: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleFrame {
    pub position: Position,
    pub radius: f32,
    pub alert: AlertTag,
}

/// Everything a renderer needs to draw one tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub formation: Formation,
    pub goal: Position,
    pub agents: Vec<AgentFrame>,
    pub obstacles: Vec<ObstacleFrame>,
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
