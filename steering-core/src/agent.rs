#[cfg(feature = "std")]
use rand::Rng;

use crate::obstacle::AlertState;
use crate::path::{PathHistory, PATH_CAPACITY};
use crate::Vector2;

/// Amount subtracted from an agent's lifespan on every `update`
pub const LIFESPAN_DECAY: f32 = 0.01;

/// Speed a freshly spawned `Target` agent moves at
pub const TARGET_SPAWN_SPEED: f32 = 5.0;

/// Stable identity used for "not self" exclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

/// Render role of an agent. Steering treats both kinds the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentKind {
    #[default]
    Vehicle,
    Target,
}

/// Per-agent limits and sizes
#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    pub max_speed: f32,
    pub max_force: f32,
    /// Drawing radius; the avoidance radius is derived from it
    pub visual_radius: f32,
    pub radius_factor: f32,
    pub perception_radius: f32,
    pub lifespan: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_speed: 6.0,
            max_force: 0.9,
            visual_radius: 16.0,
            radius_factor: 2.0,
            perception_radius: 24.0,
            lifespan: 5.0,
        }
    }
}

/// A single steered vehicle
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    pub max_speed: f32,
    pub max_force: f32,
    pub radius: f32,
    pub perception_radius: f32,
    /// Margin added to a threat's radius before avoidance kicks in
    pub lane_half_width: f32,
    pub wander_theta: f32,
    pub lifespan: f32,
    pub alert: AlertState,
    pub path: PathHistory<PATH_CAPACITY>,
}

impl Agent {
    pub fn new(id: AgentId, position: Vector2, config: &AgentConfig) -> Self {
        let radius = config.visual_radius * config.radius_factor;
        Self {
            id,
            kind: AgentKind::Vehicle,
            position,
            velocity: Vector2::zero(),
            acceleration: Vector2::zero(),
            max_speed: config.max_speed,
            max_force: config.max_force,
            radius,
            perception_radius: config.perception_radius,
            lane_half_width: radius / 2.0,
            wander_theta: 0.0,
            lifespan: config.lifespan,
            alert: AlertState::Clear,
            path: PathHistory::new(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    /// A `Target` agent already moving along `heading` at spawn speed
    pub fn target(id: AgentId, position: Vector2, heading: f32, config: &AgentConfig) -> Self {
        let mut agent = Self::new(id, position, config)
            .with_velocity(Vector2::from_angle(heading) * TARGET_SPAWN_SPEED);
        agent.kind = AgentKind::Target;
        agent
    }

    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(
        id: AgentId,
        width: f32,
        height: f32,
        config: &AgentConfig,
        rng: &mut R,
    ) -> Self {
        let position = Vector2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        Self::new(id, position, config)
    }

    /// Read-only view other agents steer against during a tick
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
        }
    }

    pub fn apply_force(&mut self, force: Vector2) {
        self.acceleration += force;
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vector2::zero();
        self.path.push(self.position);
        self.lifespan -= LIFESPAN_DECAY;
    }

    pub fn is_expired(&self) -> bool {
        self.lifespan <= 0.0
    }

    /// Toroidal wrap; an agent fully off one side re-enters on the other
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        let r = self.radius;
        if self.position.x > width + r {
            self.position.x = -r;
        } else if self.position.x < -r {
            self.position.x = width + r;
        }

        if self.position.y > height + r {
            self.position.y = -r;
        } else if self.position.y < -r {
            self.position.y = height + r;
        }
    }
}

/// Kinematic state of an agent frozen at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f32,
}

/// Index of and distance to the agent closest to `position`, skipping `exclude`.
///
/// Ties keep the first agent encountered. Returns `None` when no other agent exists.
pub fn nearest_agent(
    position: Vector2,
    exclude: AgentId,
    agents: &[AgentSnapshot],
) -> Option<(usize, f32)> {
    let mut nearest: Option<(usize, f32)> = None;
    for (index, other) in agents.iter().enumerate() {
        if other.id == exclude {
            continue;
        }
        let distance = position.distance(&other.position);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((index, distance)),
        }
    }
    nearest
}
