//! Agent collections that run whole ticks.
//!
//! Every tick first freezes each agent's kinematics into an `AgentSnapshot`,
//! computes all forces against those snapshots, and only then integrates.
//! No agent ever sees a neighbor's already-moved position.

#[cfg(feature = "std")]
use rand::Rng;

use crate::agent::{Agent, AgentConfig, AgentId, AgentSnapshot};
use crate::avoidance::AvoidanceOptions;
use crate::compositor::{apply_behaviors, TickPlan};
use crate::obstacle::{AlertState, Obstacle};
use crate::Vector2;

/// Counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Avoidance passes that ended with a `Collision` alert
    pub collisions: usize,
    /// Of those, passes where the agent already overlapped the obstacle
    pub imminent: usize,
}

impl core::ops::AddAssign for TickReport {
    fn add_assign(&mut self, other: Self) {
        self.collisions += other.collisions;
        self.imminent += other.imminent;
    }
}

fn step_agents<F>(
    agents: &mut [Agent],
    snapshots: &[AgentSnapshot],
    obstacles: &mut [Obstacle],
    options: AvoidanceOptions,
    width: f32,
    height: f32,
    mut plan: F,
) -> TickReport
where
    F: FnMut(usize, &[AgentSnapshot]) -> TickPlan,
{
    let mut report = TickReport::default();

    for index in 0..agents.len() {
        let tick_plan = plan(index, snapshots);
        let avoidance = apply_behaviors(&mut agents[index], &tick_plan, obstacles, snapshots, options);
        avoidance.mark_agents(agents);

        if avoidance.alert == AlertState::Collision {
            report.collisions += 1;
            if avoidance.collision_imminent {
                report.imminent += 1;
            }
        }
    }

    for agent in agents.iter_mut() {
        agent.update();
        agent.wrap_edges(width, height);
    }

    report
}

/// A fixed-capacity fleet for no_std hosts
pub struct Fleet<const N: usize, const M: usize> {
    pub agents: heapless::Vec<Agent, N>,
    pub obstacles: heapless::Vec<Obstacle, M>,
    pub config: AgentConfig,
    pub options: AvoidanceOptions,
    pub width: f32,
    pub height: f32,
    next_id: u32,
}

impl<const N: usize, const M: usize> Fleet<N, M> {
    pub fn new(width: f32, height: f32, config: AgentConfig) -> Self {
        Self {
            agents: heapless::Vec::new(),
            obstacles: heapless::Vec::new(),
            config,
            options: AvoidanceOptions::default(),
            width,
            height,
            next_id: 0,
        }
    }

    /// Spawns an agent at `position`; hands back the agent if the fleet is full
    pub fn add_agent(&mut self, position: Vector2) -> Result<AgentId, Agent> {
        let id = AgentId(self.next_id);
        self.agents.push(Agent::new(id, position, &self.config))?;
        self.next_id += 1;
        Ok(id)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Result<(), Obstacle> {
        self.obstacles.push(obstacle)
    }

    pub fn step_with<F>(&mut self, plan: F) -> TickReport
    where
        F: FnMut(usize, &[AgentSnapshot]) -> TickPlan,
    {
        let snapshots: heapless::Vec<AgentSnapshot, N> =
            self.agents.iter().map(Agent::snapshot).collect();
        step_agents(
            &mut self.agents,
            &snapshots,
            &mut self.obstacles,
            self.options,
            self.width,
            self.height,
            plan,
        )
    }

    pub fn step_toward(&mut self, target: Vector2) -> TickReport {
        self.step_with(|_, _| TickPlan::toward(target))
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

/// A growable fleet for std hosts
#[cfg(feature = "std")]
pub struct FleetStd {
    pub agents: Vec<Agent>,
    pub obstacles: Vec<Obstacle>,
    pub config: AgentConfig,
    pub options: AvoidanceOptions,
    pub width: f32,
    pub height: f32,
    next_id: u32,
}

#[cfg(feature = "std")]
impl FleetStd {
    pub fn new(width: f32, height: f32, config: AgentConfig) -> Self {
        Self {
            agents: Vec::new(),
            obstacles: Vec::new(),
            config,
            options: AvoidanceOptions::default(),
            width,
            height,
            next_id: 0,
        }
    }

    pub fn new_random<R: Rng + ?Sized>(
        width: f32,
        height: f32,
        count: usize,
        config: AgentConfig,
        rng: &mut R,
    ) -> Self {
        let mut fleet = Self::new(width, height, config);
        for _ in 0..count {
            let id = fleet.allocate_id();
            let agent = Agent::random(id, width, height, &fleet.config, rng);
            fleet.agents.push(agent);
        }
        fleet
    }

    fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn(&mut self, position: Vector2) -> AgentId {
        let id = self.allocate_id();
        self.agents.push(Agent::new(id, position, &self.config));
        id
    }

    pub fn spawn_target(&mut self, position: Vector2, heading: f32) -> AgentId {
        let id = self.allocate_id();
        self.agents.push(Agent::target(id, position, heading, &self.config));
        id
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }

    pub fn step_with<F>(&mut self, plan: F) -> TickReport
    where
        F: FnMut(usize, &[AgentSnapshot]) -> TickPlan,
    {
        let snapshots = self.snapshots();
        step_agents(
            &mut self.agents,
            &snapshots,
            &mut self.obstacles,
            self.options,
            self.width,
            self.height,
            plan,
        )
    }

    pub fn step_toward(&mut self, target: Vector2) -> TickReport {
        self.step_with(|_, _| TickPlan::toward(target))
    }

    /// Applies a wander force to every agent, outside the weighted blend
    pub fn wander_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for agent in self.agents.iter_mut() {
            let force = crate::behavior::wander(agent, rng);
            agent.apply_force(force);
        }
    }

    /// Drops agents whose lifespan ran out; returns how many were removed
    pub fn retain_alive(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(|a| !a.is_expired());
        before - self.agents.len()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
