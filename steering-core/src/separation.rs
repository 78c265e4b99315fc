use crate::agent::{Agent, AgentSnapshot};
use crate::Vector2;

/// Floor for neighbor distance so coincident agents don't divide by zero
pub const MIN_SEPARATION_DISTANCE: f32 = 1e-3;

/// Repulsion from every other agent strictly inside `perception_radius`,
/// weighted by inverse square distance so the closest neighbors dominate.
pub fn separation(agent: &Agent, others: &[AgentSnapshot]) -> Vector2 {
    let mut steering = Vector2::zero();
    let mut count = 0;

    for other in others {
        if other.id == agent.id {
            continue;
        }
        let distance = agent.position.distance(&other.position);
        if distance < agent.perception_radius {
            let d = distance.max(MIN_SEPARATION_DISTANCE);
            steering += (agent.position - other.position) / (d * d);
            count += 1;
        }
    }

    if count == 0 {
        return Vector2::zero();
    }

    steering = steering / count as f32;
    (steering.with_magnitude(agent.max_speed) - agent.velocity).limit(agent.max_force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, AgentId};

    const EPS: f32 = 1e-4;

    fn agent_at(id: u32, x: f32, y: f32) -> Agent {
        Agent::new(AgentId(id), Vector2::new(x, y), &AgentConfig::default())
    }

    #[test]
    fn test_no_neighbors_is_zero() {
        let agent = agent_at(0, 0.0, 0.0).with_velocity(Vector2::new(3.0, 0.0));
        let far = agent_at(1, 100.0, 0.0).snapshot();
        assert_eq!(separation(&agent, &[agent.snapshot(), far]), Vector2::zero());
        assert_eq!(separation(&agent, &[]), Vector2::zero());
    }

    #[test]
    fn test_perception_boundary_is_exclusive() {
        let agent = agent_at(0, 0.0, 0.0);
        let edge = agent_at(1, agent.perception_radius, 0.0).snapshot();
        assert_eq!(separation(&agent, &[edge]), Vector2::zero());
    }

    #[test]
    fn test_pushes_away_from_neighbor() {
        let agent = agent_at(0, 0.0, 0.0);
        let neighbor = agent_at(1, 1.0, 0.0);
        let force = separation(&agent, &[agent.snapshot(), neighbor.snapshot()]);

        assert!(force.x < 0.0);
        assert!(force.y.abs() < EPS);
        assert!((force.magnitude() - agent.max_force).abs() < EPS);
    }

    #[test]
    fn test_closer_neighbor_dominates() {
        let agent = agent_at(0, 0.0, 0.0);
        let close = agent_at(1, 2.0, 0.0).snapshot();
        let farther = agent_at(2, 0.0, -10.0).snapshot();
        let mut fast = agent.clone();
        fast.max_force = 100.0;
        let force = separation(&fast, &[close, farther]);
        // (A - B) / d^2 falls off as 1 / d: the neighbor at x = 2 pushes 5x harder.
        assert!(force.x < 0.0);
        assert!(force.y > 0.0);
        assert!((force.x.abs() / force.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_neighbor_is_finite() {
        let agent = agent_at(0, 5.0, 5.0).with_velocity(Vector2::new(0.0, 1.0));
        let twin = agent_at(1, 5.0, 5.0).snapshot();
        let force = separation(&agent, &[twin]);
        assert!(force.x.is_finite() && force.y.is_finite());
        assert!(force.magnitude() <= agent.max_force + EPS);
    }
}
