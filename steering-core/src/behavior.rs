//! Individual steering forces. Each returns a force limited to the agent's
//! `max_force`; none of them touch the agent's acceleration.

#[cfg(feature = "std")]
use rand::Rng;

use crate::agent::{Agent, AgentSnapshot};
use crate::Vector2;

/// Distance below which `arrive` starts slowing down
pub const SLOW_RADIUS: f32 = 100.0;

/// How many ticks ahead `pursue` extrapolates the quarry's velocity
pub const PURSUIT_HORIZON: f32 = 10.0;

pub const WANDER_DISTANCE: f32 = 100.0;
pub const WANDER_RADIUS: f32 = 50.0;
/// Bound of the per-call random change of `wander_theta`, in radians
pub const WANDER_DRIFT: f32 = 0.3;

/// Desired speed for an agent `distance` away from its goal: a linear ramp
/// from 0 at the goal up to `max_speed` at `SLOW_RADIUS`.
pub fn arrival_speed(distance: f32, max_speed: f32) -> f32 {
    max_speed * (distance / SLOW_RADIUS).clamp(0.0, 1.0)
}

pub fn seek(agent: &Agent, target: Vector2, arrival: bool) -> Vector2 {
    let offset = target - agent.position;
    let desired_speed = if arrival {
        arrival_speed(offset.magnitude(), agent.max_speed)
    } else {
        agent.max_speed
    };
    let desired = offset.with_magnitude(desired_speed);
    (desired - agent.velocity).limit(agent.max_force)
}

pub fn arrive(agent: &Agent, target: Vector2) -> Vector2 {
    seek(agent, target, true)
}

pub fn flee(agent: &Agent, target: Vector2) -> Vector2 {
    -seek(agent, target, false)
}

/// Seeks the point `other` will reach in `PURSUIT_HORIZON` ticks
pub fn pursue(agent: &Agent, other: &AgentSnapshot) -> Vector2 {
    let predicted = other.position + other.velocity * PURSUIT_HORIZON;
    seek(agent, predicted, false)
}

pub fn evade(agent: &Agent, other: &AgentSnapshot) -> Vector2 {
    -pursue(agent, other)
}

/// Wander force for the current `wander_theta`, then shifts the angle by `drift`.
///
/// The returned force always has magnitude `max_force`. Callers apply it
/// directly; it is not part of the weighted blend.
pub fn wander_with_drift(agent: &mut Agent, drift: f32) -> Vector2 {
    let mut point = agent.position + agent.velocity.with_magnitude(WANDER_DISTANCE);
    let theta = agent.wander_theta + agent.velocity.heading();
    point += Vector2::from_angle(theta) * WANDER_RADIUS;

    let steer = (point - agent.position).with_magnitude(agent.max_force);
    agent.wander_theta += drift;
    steer
}

#[cfg(feature = "std")]
pub fn wander<R: Rng + ?Sized>(agent: &mut Agent, rng: &mut R) -> Vector2 {
    let drift = rng.gen_range(-WANDER_DRIFT..=WANDER_DRIFT);
    wander_with_drift(agent, drift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, AgentId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-4;

    fn agent_at(x: f32, y: f32) -> Agent {
        Agent::new(AgentId(0), Vector2::new(x, y), &AgentConfig::default())
    }

    #[test]
    fn test_seek_points_at_target_and_is_limited() {
        let agent = agent_at(0.0, 0.0);
        let force = seek(&agent, Vector2::new(500.0, 0.0), false);
        assert!((force.magnitude() - agent.max_force).abs() < EPS);
        assert!(force.x > 0.0);
        assert!(force.y.abs() < EPS);
    }

    #[test]
    fn test_seek_on_target_is_finite() {
        let agent = agent_at(3.0, 3.0).with_velocity(Vector2::new(0.5, 0.0));
        let force = seek(&agent, Vector2::new(3.0, 3.0), false);
        assert!(force.x.is_finite() && force.y.is_finite());
        // Desired velocity is zero, so the force only cancels the current velocity.
        assert_eq!(force, Vector2::new(-0.5, 0.0));
    }

    #[test]
    fn test_arrival_speed_ramp() {
        let max = 6.0;
        assert_eq!(arrival_speed(0.0, max), 0.0);
        assert_eq!(arrival_speed(SLOW_RADIUS, max), max);
        assert_eq!(arrival_speed(SLOW_RADIUS * 3.0, max), max);
        assert!((arrival_speed(SLOW_RADIUS / 2.0, max) - 3.0).abs() < EPS);

        let mut previous = 0.0;
        for step in 0..=100 {
            let speed = arrival_speed(step as f32, max);
            assert!(speed >= previous);
            previous = speed;
        }
    }

    #[test]
    fn test_arrive_slows_inside_slow_radius() {
        let mut agent = agent_at(0.0, 0.0);
        agent.max_force = 100.0;
        // With a huge force budget the force equals the desired velocity.
        let near = arrive(&agent, Vector2::new(25.0, 0.0));
        let far = arrive(&agent, Vector2::new(250.0, 0.0));
        assert!((near.magnitude() - 1.5).abs() < EPS);
        assert!((far.magnitude() - agent.max_speed).abs() < EPS);
    }

    #[test]
    fn test_flee_is_negated_seek() {
        let agent = agent_at(0.0, 0.0).with_velocity(Vector2::new(0.0, 1.0));
        let target = Vector2::new(10.0, 10.0);
        assert_eq!(flee(&agent, target), -seek(&agent, target, false));
    }

    #[test]
    fn test_pursue_leads_the_quarry() {
        let mut agent = agent_at(0.0, 0.0);
        agent.max_force = 100.0;
        let quarry = AgentSnapshot {
            id: AgentId(1),
            position: Vector2::new(100.0, 0.0),
            velocity: Vector2::new(0.0, 10.0),
            radius: 32.0,
        };
        let force = pursue(&agent, &quarry);
        // Predicted point is (100, 100): a 45 degree heading.
        assert!((force.x - force.y).abs() < EPS);
        assert_eq!(evade(&agent, &quarry), -force);
    }

    #[test]
    fn test_behaviors_never_exceed_max_force() {
        let agent = agent_at(10.0, -4.0).with_velocity(Vector2::new(-6.0, 0.0));
        let other = agent_at(-50.0, 30.0).with_velocity(Vector2::new(3.0, 3.0)).snapshot();
        let target = Vector2::new(200.0, 200.0);
        for force in [
            seek(&agent, target, false),
            arrive(&agent, target),
            flee(&agent, target),
            pursue(&agent, &other),
            evade(&agent, &other),
        ] {
            assert!(force.magnitude() <= agent.max_force + EPS);
        }
    }

    #[test]
    fn test_wander_with_drift() {
        let mut agent = agent_at(0.0, 0.0).with_velocity(Vector2::new(2.0, 0.0));
        let force = wander_with_drift(&mut agent, 0.25);

        // Point ahead is (100, 0) plus (50, 0) on the circle at angle 0.
        assert!((force.magnitude() - agent.max_force).abs() < EPS);
        assert!(force.y.abs() < EPS && force.x > 0.0);
        assert!((agent.wander_theta - 0.25).abs() < EPS);
    }

    #[test]
    fn test_wander_drift_is_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut agent = agent_at(0.0, 0.0);
        for _ in 0..200 {
            let before = agent.wander_theta;
            let force = wander(&mut agent, &mut rng);
            assert!((agent.wander_theta - before).abs() <= WANDER_DRIFT + EPS);
            assert!((force.magnitude() - agent.max_force).abs() < EPS);
        }
    }
}
