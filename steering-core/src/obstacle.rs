use crate::Vector2;

/// Observability tag written by the avoidance engine every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Clear,
    /// Reserved for renderers that want a softer "targeted" shade; never produced here.
    Wary,
    Collision,
}

/// A static circular obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub position: Vector2,
    pub radius: f32,
    pub alert: AlertState,
}

impl Obstacle {
    pub fn new(position: Vector2, radius: f32) -> Self {
        Self {
            position,
            radius,
            alert: AlertState::Clear,
        }
    }
}

/// Index of and distance to the obstacle closest to `position`.
///
/// Ties keep the first obstacle encountered. Returns `None` only for an empty set.
pub fn nearest_obstacle(position: Vector2, obstacles: &[Obstacle]) -> Option<(usize, f32)> {
    let mut nearest: Option<(usize, f32)> = None;
    for (index, obstacle) in obstacles.iter().enumerate() {
        let distance = position.distance(&obstacle.position);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((index, distance)),
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_obstacle_is_clear() {
        let o = Obstacle::new(Vector2::new(1.0, 2.0), 5.0);
        assert_eq!(o.alert, AlertState::Clear);
    }

    #[test]
    fn test_nearest_obstacle_empty() {
        assert_eq!(nearest_obstacle(Vector2::zero(), &[]), None);
    }

    #[test]
    fn test_nearest_obstacle_picks_closest() {
        let obstacles = [
            Obstacle::new(Vector2::new(100.0, 0.0), 5.0),
            Obstacle::new(Vector2::new(0.0, 10.0), 50.0),
            Obstacle::new(Vector2::new(-30.0, 0.0), 1.0),
        ];
        assert_eq!(nearest_obstacle(Vector2::zero(), &obstacles), Some((1, 10.0)));
    }

    #[test]
    fn test_nearest_obstacle_tie_keeps_first() {
        let obstacles = [
            Obstacle::new(Vector2::new(0.0, 4.0), 1.0),
            Obstacle::new(Vector2::new(4.0, 0.0), 1.0),
            Obstacle::new(Vector2::new(-4.0, 0.0), 1.0),
        ];
        assert_eq!(nearest_obstacle(Vector2::zero(), &obstacles), Some((0, 4.0)));
    }
}
