//! Goal selection for followers. Agent 0 leads toward the host's goal; the
//! others trail a point behind an agent ahead of them.

use steering_core::{AgentSnapshot, BehaviorWeights, TickPlan, Vector2};
use steering_shared::Formation;

/// Gap a convoy follower keeps behind the agent ahead of it
pub const CONVOY_SPACING: f32 = 50.0;
/// Gap every pursuit follower keeps behind the leader
pub const PURSUIT_SPACING: f32 = 100.0;

/// A convoy follower this close to its slot and this slow counts as parked
pub const PARKED_DISTANCE: f32 = 20.0;
pub const PARKED_SPEED: f32 = 0.01;

/// Point `spacing` units behind `leader` along its direction of travel
pub fn point_behind(leader: &AgentSnapshot, spacing: f32) -> Vector2 {
    leader.position - leader.velocity.normalize() * spacing
}

/// Per-tick targets for a whole fleet
#[derive(Debug, Clone, Default)]
pub struct FormationPlan {
    pub plans: Vec<TickPlan>,
    /// Parked followers and the heading they should turn to
    pub headings: Vec<(usize, f32)>,
}

#[derive(Debug, Clone, Copy)]
pub struct FormationPlanner {
    pub formation: Formation,
    pub weights: BehaviorWeights,
}

impl FormationPlanner {
    pub fn new(formation: Formation, weights: BehaviorWeights) -> Self {
        Self { formation, weights }
    }

    pub fn plan(&self, goal: Vector2, snapshots: &[AgentSnapshot]) -> FormationPlan {
        let mut out = FormationPlan {
            plans: Vec::with_capacity(snapshots.len()),
            headings: Vec::new(),
        };

        for (index, me) in snapshots.iter().enumerate() {
            if index == 0 {
                out.plans.push(TickPlan {
                    target: goal,
                    weights: self.weights,
                });
                continue;
            }

            let plan = match self.formation {
                Formation::Convoy => {
                    let slot = point_behind(&snapshots[index - 1], CONVOY_SPACING);
                    let mut weights = self.weights;
                    if me.position.distance(&slot) < PARKED_DISTANCE
                        && me.velocity.magnitude() < PARKED_SPEED
                    {
                        weights.arrive = 0.0;
                        weights.obstacle = 0.0;
                        out.headings.push((index, (slot - me.position).heading()));
                    }
                    TickPlan {
                        target: slot,
                        weights,
                    }
                }
                Formation::Pursuit => TickPlan {
                    target: point_behind(&snapshots[0], PURSUIT_SPACING),
                    weights: self.weights,
                },
            };
            out.plans.push(plan);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steering_core::AgentId;

    const EPS: f32 = 1e-4;

    fn snapshot(id: u32, x: f32, y: f32, vx: f32, vy: f32) -> AgentSnapshot {
        AgentSnapshot {
            id: AgentId(id),
            position: Vector2::new(x, y),
            velocity: Vector2::new(vx, vy),
            radius: 32.0,
        }
    }

    #[test]
    fn test_point_behind_moving_leader() {
        let leader = snapshot(0, 100.0, 100.0, 3.0, 0.0);
        let p = point_behind(&leader, CONVOY_SPACING);
        assert!((p.x - 50.0).abs() < EPS);
        assert!((p.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_point_behind_stationary_leader_is_leader() {
        let leader = snapshot(0, 10.0, 20.0, 0.0, 0.0);
        assert_eq!(point_behind(&leader, PURSUIT_SPACING), leader.position);
    }

    #[test]
    fn test_convoy_chains_followers() {
        let planner = FormationPlanner::new(Formation::Convoy, BehaviorWeights::default());
        let snapshots = [
            snapshot(0, 300.0, 100.0, 2.0, 0.0),
            snapshot(1, 200.0, 100.0, 0.0, 2.0),
            snapshot(2, 100.0, 100.0, 2.0, 0.0),
        ];
        let goal = Vector2::new(700.0, 100.0);
        let plan = planner.plan(goal, &snapshots);

        assert_eq!(plan.plans.len(), 3);
        assert_eq!(plan.plans[0].target, goal);
        assert!((plan.plans[1].target - Vector2::new(250.0, 100.0)).magnitude() < EPS);
        assert!((plan.plans[2].target - Vector2::new(200.0, 50.0)).magnitude() < EPS);
        assert!(plan.headings.is_empty());
    }

    #[test]
    fn test_parked_convoy_follower_drops_weights() {
        let planner = FormationPlanner::new(Formation::Convoy, BehaviorWeights::default());
        let snapshots = [
            snapshot(0, 100.0, 100.0, 1.0, 0.0),
            snapshot(1, 50.0, 110.0, 0.0, 0.0),
        ];
        let plan = planner.plan(Vector2::zero(), &snapshots);

        let weights = plan.plans[1].weights;
        assert_eq!(weights.arrive, 0.0);
        assert_eq!(weights.obstacle, 0.0);
        assert_eq!(weights.separation, BehaviorWeights::default().separation);
        assert_eq!(plan.headings.len(), 1);
        // Slot (50, 100) is straight below in screen terms: heading -pi/2.
        assert!((plan.headings[0].1 + core::f32::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_pursuit_followers_share_leader_slot() {
        let planner = FormationPlanner::new(Formation::Pursuit, BehaviorWeights::default());
        let snapshots = [
            snapshot(0, 400.0, 300.0, 0.0, -4.0),
            snapshot(1, 0.0, 0.0, 0.0, 0.0),
            snapshot(2, 50.0, 50.0, 1.0, 1.0),
        ];
        let plan = planner.plan(Vector2::zero(), &snapshots);

        let slot = Vector2::new(400.0, 400.0);
        assert!((plan.plans[1].target - slot).magnitude() < EPS);
        assert!((plan.plans[2].target - slot).magnitude() < EPS);
        assert!(plan.headings.is_empty());
    }
}
