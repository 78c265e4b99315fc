//! Two-point lookahead obstacle avoidance.
//!
//! Each call looks for the obstacle nearest to the agent and measures it from
//! three points: the far lookahead point `ahead`, the near lookahead point
//! `ahead2` (half way), and the agent's own position. The closest of the three
//! decides whether a correction is needed and which point the correction
//! pushes away from. An agent already inside the nearest obstacle gets a
//! correction of twice its usual force ceiling.
//!
//! With `agents_as_obstacles`, another agent closer than the nearest obstacle
//! takes over as the threat unless the agent is already overlapping that obstacle.

use crate::agent::{nearest_agent, Agent, AgentId, AgentSnapshot};
use crate::obstacle::{nearest_obstacle, AlertState, Obstacle};
use crate::Vector2;

/// Lookahead length is `LOOKAHEAD_SCALE * speed * LOOKAHEAD_DAMPING`
pub const LOOKAHEAD_SCALE: f32 = 20.0;
pub const LOOKAHEAD_DAMPING: f32 = 0.8;

/// Force ceiling multiplier once the agent overlaps an obstacle
pub const ESCALATION_FACTOR: f32 = 2.0;

/// Host switches threaded through every avoidance call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvoidanceOptions {
    /// Treat other agents as obstacles too
    pub agents_as_obstacles: bool,
    /// Fill `Avoidance::probe` and log the decision
    pub debug: bool,
}

/// Entity an agent is steering around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threat {
    /// Index into the obstacle slice passed to `avoid`
    Obstacle(usize),
    Agent(AgentId),
}

/// Geometry behind one avoidance decision, for drawing debug overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidanceProbe {
    pub ahead: Vector2,
    pub ahead2: Vector2,
    pub reference: Vector2,
    pub threat_position: Vector2,
    pub min_distance: f32,
}

/// Result of one avoidance pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avoidance {
    pub force: Vector2,
    /// `None` when the obstacle set was empty
    pub threat: Option<Threat>,
    /// Tag the threat should carry this tick
    pub alert: AlertState,
    pub collision_imminent: bool,
    pub probe: Option<AvoidanceProbe>,
}

impl Avoidance {
    fn skipped() -> Self {
        Self {
            force: Vector2::zero(),
            threat: None,
            alert: AlertState::Clear,
            collision_imminent: false,
            probe: None,
        }
    }

    /// Writes the alert onto the threatening obstacle, if that is what it was
    pub fn mark_obstacles(&self, obstacles: &mut [Obstacle]) {
        if let Some(Threat::Obstacle(index)) = self.threat {
            if let Some(obstacle) = obstacles.get_mut(index) {
                obstacle.alert = self.alert;
            }
        }
    }

    /// Writes the alert onto the threatening agent, if that is what it was
    pub fn mark_agents(&self, agents: &mut [Agent]) {
        if let Some(Threat::Agent(id)) = self.threat {
            if let Some(agent) = agents.iter_mut().find(|a| a.id == id) {
                agent.alert = self.alert;
            }
        }
    }
}

/// Far and near lookahead points along the agent's heading
pub fn lookahead(agent: &Agent) -> (Vector2, Vector2) {
    let speed = agent.velocity.magnitude();
    let ahead = agent.velocity.normalize() * (LOOKAHEAD_SCALE * speed * LOOKAHEAD_DAMPING);
    (agent.position + ahead, agent.position + ahead * 0.5)
}

pub fn avoid(
    agent: &Agent,
    obstacles: &[Obstacle],
    agents: &[AgentSnapshot],
    options: AvoidanceOptions,
) -> Avoidance {
    let Some((obstacle_index, to_obstacle)) = nearest_obstacle(agent.position, obstacles) else {
        return Avoidance::skipped();
    };
    let obstacle = &obstacles[obstacle_index];

    let (ahead, ahead2) = lookahead(agent);
    let d1 = ahead.distance(&obstacle.position);
    let d2 = ahead2.distance(&obstacle.position);
    let d3 = to_obstacle;

    let mut min_distance = d1.min(d2).min(d3);
    let mut reference = if d1 < d2 { ahead } else { ahead2 };
    if d3 < d1 && d3 < d2 {
        reference = agent.position;
    }

    let collision_imminent = d3 < obstacle.radius;

    let mut threat = Threat::Obstacle(obstacle_index);
    let mut threat_position = obstacle.position;
    let mut threat_radius = obstacle.radius;

    if options.agents_as_obstacles && !collision_imminent {
        if let Some((index, to_agent)) = nearest_agent(agent.position, agent.id, agents) {
            if to_agent < d3 {
                let other = &agents[index];
                threat = Threat::Agent(other.id);
                threat_position = other.position;
                threat_radius = other.radius;
                min_distance = to_agent;
            }
        }
    }

    let (force, alert) = if min_distance < threat_radius + agent.lane_half_width {
        let away = reference - threat_position;
        let mut force =
            (away.with_magnitude(agent.max_speed) - agent.velocity).limit(agent.max_force);
        if collision_imminent {
            force = escalate(force, away, agent.max_force);
            log::trace!(
                "agent {:?} inside obstacle {}, escalating to {:.2}",
                agent.id,
                obstacle_index,
                force.magnitude()
            );
        }
        (force, AlertState::Collision)
    } else {
        (Vector2::zero(), AlertState::Clear)
    };

    let probe = if options.debug {
        let probe = AvoidanceProbe {
            ahead,
            ahead2,
            reference,
            threat_position,
            min_distance,
        };
        log::debug!("agent {:?} avoidance {:?} {:?}: {:?}", agent.id, threat, alert, probe);
        Some(probe)
    } else {
        None
    };

    Avoidance {
        force,
        threat: Some(threat),
        alert,
        collision_imminent,
        probe,
    }
}

/// Resizes the correction to `ESCALATION_FACTOR * max_force`. A correction that
/// cancelled out borrows the push-out direction, or the x-axis if the agent
/// sits motionless on the obstacle center.
fn escalate(force: Vector2, away: Vector2, max_force: f32) -> Vector2 {
    let magnitude = ESCALATION_FACTOR * max_force;
    let direction = if force.magnitude_squared() > 0.0 {
        force
    } else if away.magnitude_squared() > 0.0 {
        away
    } else {
        Vector2::new(1.0, 0.0)
    };
    direction.with_magnitude(magnitude)
}
