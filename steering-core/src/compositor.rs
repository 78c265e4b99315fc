use crate::agent::{Agent, AgentSnapshot};
use crate::avoidance::{avoid, Avoidance, AvoidanceOptions};
use crate::behavior::arrive;
use crate::obstacle::Obstacle;
use crate::separation::separation;
use crate::Vector2;

/// Blend weights for one agent for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorWeights {
    pub arrive: f32,
    pub obstacle: f32,
    pub separation: f32,
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        Self {
            arrive: 0.3,
            obstacle: 0.9,
            separation: 0.9,
        }
    }
}

/// What the driver wants from one agent this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    pub target: Vector2,
    pub weights: BehaviorWeights,
}

impl TickPlan {
    pub fn toward(target: Vector2) -> Self {
        Self {
            target,
            weights: BehaviorWeights::default(),
        }
    }
}

/// Weighted arrive + separation + avoidance, accumulated into the agent's acceleration.
///
/// Obstacle alerts are written here. When the threat is another agent, the
/// returned `Avoidance` carries the alert for the caller to apply with
/// `Avoidance::mark_agents`.
pub fn apply_behaviors(
    agent: &mut Agent,
    plan: &TickPlan,
    obstacles: &mut [Obstacle],
    agents: &[AgentSnapshot],
    options: AvoidanceOptions,
) -> Avoidance {
    let arrive_force = arrive(agent, plan.target);
    let separation_force = separation(agent, agents);
    let avoidance = avoid(agent, obstacles, agents, options);
    avoidance.mark_obstacles(obstacles);

    agent.apply_force(arrive_force * plan.weights.arrive);
    agent.apply_force(avoidance.force * plan.weights.obstacle);
    agent.apply_force(separation_force * plan.weights.separation);

    avoidance
}
