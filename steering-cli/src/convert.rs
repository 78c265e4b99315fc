use steering_core::{AgentConfig, AgentKind, AlertState, BehaviorWeights, Obstacle, Vector2};
use steering_shared::{AgentRole, AgentSettings, AlertTag, ObstacleSpec, Position};

pub fn to_position(v: Vector2) -> Position {
    Position::new(v.x, v.y)
}

pub fn to_vector(p: Position) -> Vector2 {
    Vector2::new(p.x, p.y)
}

pub fn alert_tag(state: AlertState) -> AlertTag {
    match state {
        AlertState::Clear => AlertTag::Clear,
        AlertState::Wary => AlertTag::Wary,
        AlertState::Collision => AlertTag::Collision,
    }
}

pub fn agent_role(kind: AgentKind) -> AgentRole {
    match kind {
        AgentKind::Vehicle => AgentRole::Vehicle,
        AgentKind::Target => AgentRole::Target,
    }
}

pub fn agent_config(settings: &AgentSettings) -> AgentConfig {
    AgentConfig {
        max_speed: settings.max_speed,
        max_force: settings.max_force,
        visual_radius: settings.visual_radius,
        perception_radius: settings.perception_radius,
        lifespan: settings.lifespan,
        ..AgentConfig::default()
    }
}

pub fn behavior_weights(settings: &AgentSettings) -> BehaviorWeights {
    BehaviorWeights {
        arrive: settings.arrive_weight,
        obstacle: settings.obstacle_weight,
        separation: settings.separation_weight,
    }
}

pub fn obstacle(spec: &ObstacleSpec) -> Obstacle {
    Obstacle::new(to_vector(spec.position), spec.radius)
}
