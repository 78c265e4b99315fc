use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use steering_core::{FleetStd, TickReport, Vector2};
use steering_shared::{
    AgentFrame, EventAction, Formation, FrameSnapshot, ObstacleFrame, Scenario, ScenarioEvent,
};

use crate::convert;
use crate::formation::FormationPlanner;

/// Horizontal band missiles launch from, measured from the left edge
const MISSILE_LAUNCH_X: f32 = 20.0;
const MISSILE_LAUNCH_JITTER: f32 = 10.0;
/// Vertical spread of a salvo around mid-height
const MISSILE_SPREAD: f32 = 5.0;

/// Headless host: owns the fleet, the goal schedule and the formation logic
pub struct Simulation {
    fleet: FleetStd,
    planner: FormationPlanner,
    waypoints: Vec<Vector2>,
    waypoint_radius: f32,
    current_waypoint: usize,
    events: Vec<ScenarioEvent>,
    next_event: usize,
    cull_expired: bool,
    tick: u64,
    totals: TickReport,
    rng: StdRng,
}

impl Simulation {
    pub fn new(scenario: Scenario, seed: u64) -> Result<Self> {
        validate(&scenario)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let config = convert::agent_config(&scenario.settings);
        let mut fleet = FleetStd::new_random(
            scenario.width,
            scenario.height,
            scenario.agent_count,
            config,
            &mut rng,
        );
        fleet.options.agents_as_obstacles = scenario.agents_as_obstacles;
        for spec in &scenario.obstacles {
            fleet.add_obstacle(convert::obstacle(spec));
        }

        let mut events = scenario.events;
        events.sort_by_key(|e| e.tick);

        log::info!(
            "Scenario {}x{}: {} agents, {} obstacles, {} waypoints, {} events",
            scenario.width,
            scenario.height,
            fleet.agents.len(),
            fleet.obstacles.len(),
            scenario.waypoints.len(),
            events.len()
        );

        Ok(Self {
            fleet,
            planner: FormationPlanner::new(
                scenario.formation,
                convert::behavior_weights(&scenario.settings),
            ),
            waypoints: scenario.waypoints.into_iter().map(convert::to_vector).collect(),
            waypoint_radius: scenario.waypoint_radius,
            current_waypoint: 0,
            events,
            next_event: 0,
            cull_expired: false,
            tick: 0,
            totals: TickReport::default(),
            rng,
        })
    }

    pub fn set_cull_expired(&mut self, cull: bool) {
        self.cull_expired = cull;
    }

    pub fn set_formation(&mut self, formation: Formation) {
        self.planner.formation = formation;
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.fleet.options.debug = debug;
    }

    pub fn set_agents_as_obstacles(&mut self, enabled: bool) {
        self.fleet.options.agents_as_obstacles = enabled;
    }

    pub fn fleet(&self) -> &FleetStd {
        &self.fleet
    }

    pub fn formation(&self) -> Formation {
        self.planner.formation
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn totals(&self) -> TickReport {
        self.totals
    }

    /// Current leader goal; the world center when there are no waypoints
    pub fn goal(&self) -> Vector2 {
        self.waypoints
            .get(self.current_waypoint)
            .copied()
            .unwrap_or_else(|| Vector2::new(self.fleet.width / 2.0, self.fleet.height / 2.0))
    }

    /// Runs one tick: due events, goal bookkeeping, formation planning, steering
    pub fn step(&mut self) -> TickReport {
        self.apply_due_events();
        self.advance_waypoint();

        let goal = self.goal();
        let formation = self.planner.plan(goal, &self.fleet.snapshots());
        for &(index, heading) in &formation.headings {
            let agent = &mut self.fleet.agents[index];
            agent.velocity = agent.velocity.with_heading(heading);
        }

        let plans = formation.plans;
        let report = self.fleet.step_with(|index, _| plans[index]);

        if self.cull_expired {
            let removed = self.fleet.retain_alive();
            if removed > 0 {
                log::debug!("tick {}: culled {} expired agents", self.tick, removed);
            }
        }

        if report.imminent > 0 {
            log::debug!(
                "tick {}: {} agents inside an obstacle",
                self.tick,
                report.imminent
            );
        }

        self.totals += report;
        self.tick += 1;
        report
    }

    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            formation: self.planner.formation,
            goal: convert::to_position(self.goal()),
            agents: self
                .fleet
                .agents
                .iter()
                .map(|a| AgentFrame {
                    id: a.id.0,
                    role: convert::agent_role(a.kind),
                    position: convert::to_position(a.position),
                    velocity: convert::to_position(a.velocity),
                    alert: convert::alert_tag(a.alert),
                    trail: a.path.iter().copied().map(convert::to_position).collect(),
                })
                .collect(),
            obstacles: self
                .fleet
                .obstacles
                .iter()
                .map(|o| ObstacleFrame {
                    position: convert::to_position(o.position),
                    radius: o.radius,
                    alert: convert::alert_tag(o.alert),
                })
                .collect(),
        }
    }

    fn advance_waypoint(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        let Some(leader) = self.fleet.agents.first() else {
            return;
        };
        if leader.position.distance(&self.goal()) < self.waypoint_radius {
            self.current_waypoint = (self.current_waypoint + 1) % self.waypoints.len();
            log::debug!(
                "tick {}: leader reached waypoint, heading to #{}",
                self.tick,
                self.current_waypoint
            );
        }
    }

    fn apply_due_events(&mut self) {
        while let Some(event) = self.events.get(self.next_event) {
            if event.tick > self.tick {
                break;
            }
            let action = event.action.clone();
            self.next_event += 1;
            self.apply(action);
        }
    }

    fn apply(&mut self, action: EventAction) {
        match action {
            EventAction::AddObstacle(spec) => {
                log::info!(
                    "tick {}: obstacle at ({:.0}, {:.0}) radius {:.0}",
                    self.tick,
                    spec.position.x,
                    spec.position.y,
                    spec.radius
                );
                self.fleet.add_obstacle(convert::obstacle(&spec));
            }
            EventAction::SpawnVehicle { position } => {
                let position = match position {
                    Some(p) => convert::to_vector(p),
                    None => Vector2::new(
                        self.rng.gen_range(0.0..self.fleet.width),
                        self.rng.gen_range(0.0..self.fleet.height),
                    ),
                };
                let id = self.fleet.spawn(position);
                log::info!("tick {}: spawned agent {:?}", self.tick, id);
            }
            EventAction::FireMissiles { count } => {
                let mid = self.fleet.height / 2.0;
                for _ in 0..count {
                    let x = MISSILE_LAUNCH_X + self.rng.gen_range(0.0..MISSILE_LAUNCH_JITTER);
                    let y = self.rng.gen_range(mid - MISSILE_SPREAD..=mid + MISSILE_SPREAD);
                    self.fleet.spawn(Vector2::new(x, y));
                }
                log::info!("tick {}: fired {} missiles", self.tick, count);
            }
            EventAction::ToggleFormation => {
                self.planner.formation = self.planner.formation.toggled();
                log::info!("tick {}: formation {:?}", self.tick, self.planner.formation);
            }
            EventAction::ToggleDebug => {
                self.fleet.options.debug = !self.fleet.options.debug;
                log::info!("tick {}: debug probes {}", self.tick, self.fleet.options.debug);
            }
            EventAction::ToggleAgentsAsObstacles => {
                let options = &mut self.fleet.options;
                options.agents_as_obstacles = !options.agents_as_obstacles;
                log::info!(
                    "tick {}: agents as obstacles {}",
                    self.tick,
                    options.agents_as_obstacles
                );
            }
        }
    }
}

fn validate(scenario: &Scenario) -> Result<()> {
    ensure!(
        scenario.width > 0.0 && scenario.height > 0.0,
        "world must have a positive size, got {}x{}",
        scenario.width,
        scenario.height
    );
    let s = &scenario.settings;
    ensure!(s.max_speed > 0.0, "max_speed must be positive");
    ensure!(s.max_force > 0.0, "max_force must be positive");
    ensure!(s.visual_radius >= 0.0, "visual_radius must not be negative");
    ensure!(s.perception_radius >= 0.0, "perception_radius must not be negative");
    ensure!(scenario.waypoint_radius >= 0.0, "waypoint_radius must not be negative");

    let added = scenario.events.iter().filter_map(|e| match &e.action {
        EventAction::AddObstacle(spec) => Some(spec),
        _ => None,
    });
    for spec in scenario.obstacles.iter().chain(added) {
        ensure!(
            spec.radius > 0.0,
            "obstacle at ({}, {}) has non-positive radius {}",
            spec.position.x,
            spec.position.y,
            spec.radius
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use steering_shared::{ObstacleSpec, Position};

    fn quiet_scenario() -> Scenario {
        Scenario {
            agent_count: 3,
            obstacles: Vec::new(),
            ..Scenario::default()
        }
    }

    #[test]
    fn test_rejects_bad_world() {
        let scenario = Scenario {
            width: 0.0,
            ..Scenario::default()
        };
        assert!(Simulation::new(scenario, 1).is_err());
    }

    #[test]
    fn test_rejects_bad_obstacle_event() {
        let mut scenario = quiet_scenario();
        scenario.events.push(ScenarioEvent {
            tick: 3,
            action: EventAction::AddObstacle(ObstacleSpec {
                position: Position::new(10.0, 10.0),
                radius: -1.0,
            }),
        });
        let err = Simulation::new(scenario, 1).err().expect("invalid radius");
        assert!(err.to_string().contains("non-positive radius"));
    }

    #[test]
    fn test_goal_defaults_to_center() {
        let scenario = Scenario {
            waypoints: Vec::new(),
            ..quiet_scenario()
        };
        let sim = Simulation::new(scenario, 1).unwrap();
        assert_eq!(sim.goal(), Vector2::new(400.0, 300.0));
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Simulation::new(Scenario::default(), 99).unwrap();
        let mut b = Simulation::new(Scenario::default(), 99).unwrap();
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert_eq!(a.frame(), b.frame());
    }

    #[test]
    fn test_events_fire_on_their_tick() {
        let mut scenario = quiet_scenario();
        scenario.events = vec![
            ScenarioEvent {
                tick: 2,
                action: EventAction::FireMissiles { count: 4 },
            },
            ScenarioEvent {
                tick: 1,
                action: EventAction::ToggleFormation,
            },
        ];
        let mut sim = Simulation::new(scenario, 5).unwrap();

        sim.step();
        assert_eq!(sim.formation(), Formation::Convoy);
        sim.step();
        assert_eq!(sim.formation(), Formation::Pursuit);
        assert_eq!(sim.fleet().agents.len(), 3);
        sim.step();
        assert_eq!(sim.fleet().agents.len(), 7);
    }

    #[test]
    fn test_leader_advances_waypoints() {
        let scenario = Scenario {
            agent_count: 1,
            obstacles: Vec::new(),
            waypoints: vec![Position::new(200.0, 200.0), Position::new(600.0, 200.0)],
            ..Scenario::default()
        };
        let mut sim = Simulation::new(scenario, 2).unwrap();
        assert_eq!(sim.goal(), Vector2::new(200.0, 200.0));

        let mut reached = false;
        for _ in 0..1000 {
            sim.step();
            if sim.goal() == Vector2::new(600.0, 200.0) {
                reached = true;
                break;
            }
        }
        assert!(reached);
    }
}
