use heapless::Deque;

use crate::Vector2;

/// Number of past positions each agent keeps for its trail
pub const PATH_CAPACITY: usize = 30;

/// Fixed-capacity trail of past positions, oldest first
#[derive(Debug, Clone)]
pub struct PathHistory<const N: usize> {
    points: Deque<Vector2, N>,
}

impl<const N: usize> PathHistory<N> {
    pub fn new() -> Self {
        Self {
            points: Deque::new(),
        }
    }

    /// Appends `point`, evicting the oldest entry when full
    pub fn push(&mut self, point: Vector2) {
        if self.points.is_full() {
            self.points.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn latest(&self) -> Option<&Vector2> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector2> + '_ {
        self.points.iter()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl<const N: usize> Default for PathHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_first() {
        let mut path = PathHistory::<3>::new();
        for i in 0..5 {
            path.push(Vector2::new(i as f32, 0.0));
        }

        assert_eq!(path.len(), 3);
        let xs: Vec<f32> = path.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        assert_eq!(path.latest(), Some(&Vector2::new(4.0, 0.0)));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut path = PathHistory::<PATH_CAPACITY>::new();
        assert!(path.is_empty());
        for i in 0..100 {
            path.push(Vector2::new(0.0, i as f32));
            assert!(path.len() <= path.capacity());
        }
        assert_eq!(path.len(), PATH_CAPACITY);

        path.clear();
        assert!(path.is_empty());
    }
}
