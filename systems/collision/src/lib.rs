#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spatial collision index that reports every pair of overlapping circles.
//!
//! The arena is split recursively into quadrants. Each quadrant tests
//! membership against its rectangle enlarged by the body's own radius, so a
//! body straddling a boundary is considered by every quadrant it touches.
//! Small quadrants are resolved by brute force. The partition is rebuilt from
//! scratch on every call; nothing is retained between ticks.

use std::collections::BTreeSet;

use mosquito_sim_core::{AgentId, Position};

/// Quadrants holding this many bodies or fewer are resolved by brute force.
pub const DEFAULT_LEAF_CAPACITY: usize = 5;

/// Quadrants shorter than this multiple of the body radius stop subdividing.
pub const DEFAULT_LEAF_HEIGHT_FACTOR: f64 = 3.0;

/// Circular body that participates in collision detection.
pub trait Collider {
    /// Identity tag providing the total order used to deduplicate pairs.
    fn id(&self) -> AgentId;

    /// Centre of the body.
    fn position(&self) -> Position;

    /// Radius of the body. Must be strictly positive.
    fn radius(&self) -> f64;
}

/// Two overlapping bodies, referenced by their index in the input slice.
///
/// `first` always refers to the body with the greater identity tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    /// Index of the body with the greater identity tag.
    pub first: usize,
    /// Index of the body with the smaller identity tag.
    pub second: usize,
}

/// Reports whether two circles overlap.
///
/// Circles overlap when the distance between their centres is strictly less
/// than the sum of their radii.
#[must_use]
pub fn is_touching<C: Collider>(a: &C, b: &C) -> bool {
    a.position().distance(b.position()) < a.radius() + b.radius()
}

/// Reference implementation testing every pair of bodies.
#[must_use]
pub fn brute_force_pairs<C: Collider>(bodies: &[C]) -> Vec<ContactPair> {
    let indices: Vec<usize> = (0..bodies.len()).collect();
    let mut pairs = BTreeSet::new();
    resolve_leaf(bodies, &indices, &mut pairs);
    pairs.into_iter().collect()
}

/// Recursive quadrant partition parameters.
#[derive(Clone, Copy, Debug)]
pub struct CollisionIndex {
    leaf_capacity: usize,
    leaf_height_factor: f64,
}

impl Default for CollisionIndex {
    fn default() -> Self {
        Self::new(DEFAULT_LEAF_CAPACITY, DEFAULT_LEAF_HEIGHT_FACTOR)
    }
}

impl CollisionIndex {
    /// Creates an index with explicit leaf thresholds.
    #[must_use]
    pub const fn new(leaf_capacity: usize, leaf_height_factor: f64) -> Self {
        Self {
            leaf_capacity,
            leaf_height_factor,
        }
    }

    /// Computes every overlapping pair among `bodies`.
    ///
    /// The result equals [`brute_force_pairs`]: each unordered pair appears
    /// exactly once, no body pairs with itself, and pairs are sorted by index.
    /// The arena dimensions seed the root rectangle, which is widened to cover
    /// any body whose centre lies outside the arena.
    #[must_use]
    pub fn pairs<C: Collider>(&self, bodies: &[C], width: f64, height: f64) -> Vec<ContactPair> {
        if bodies.len() < 2 {
            return Vec::new();
        }

        let mut pairs = BTreeSet::new();
        let root = Rect::covering(bodies, width, height);
        let indices: Vec<usize> = (0..bodies.len()).collect();
        self.descend(bodies, &indices, root, &mut pairs);
        pairs.into_iter().collect()
    }

    fn descend<C: Collider>(
        &self,
        bodies: &[C],
        members: &[usize],
        region: Rect,
        out: &mut BTreeSet<ContactPair>,
    ) {
        let radius = members
            .iter()
            .map(|&index| bodies[index].radius())
            .fold(0.0_f64, f64::max);

        if members.len() <= self.leaf_capacity || region.height < self.leaf_height_factor * radius
        {
            resolve_leaf(bodies, members, out);
            return;
        }

        for quadrant in region.quadrants() {
            let inside: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&index| quadrant.contains_circle(&bodies[index]))
                .collect();
            if inside.len() >= 2 {
                self.descend(bodies, &inside, quadrant, out);
            }
        }
    }
}

fn resolve_leaf<C: Collider>(bodies: &[C], members: &[usize], out: &mut BTreeSet<ContactPair>) {
    for &first in members {
        for &second in members {
            let a = &bodies[first];
            let b = &bodies[second];
            if a.id() > b.id() && is_touching(a, b) {
                let _ = out.insert(ContactPair { first, second });
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn covering<C: Collider>(bodies: &[C], width: f64, height: f64) -> Self {
        let (mut min_x, mut min_y) = (0.0_f64, 0.0_f64);
        let (mut max_x, mut max_y) = (width.max(0.0), height.max(0.0));
        for body in bodies {
            let position = body.position();
            min_x = min_x.min(position.x());
            min_y = min_y.min(position.y());
            max_x = max_x.max(position.x());
            max_y = max_y.max(position.y());
        }
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    fn quadrants(&self) -> [Rect; 4] {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        let quadrant = |x, y| Rect {
            x,
            y,
            width: half_width,
            height: half_height,
        };
        [
            quadrant(self.x, self.y),
            quadrant(self.x + half_width, self.y),
            quadrant(self.x, self.y + half_height),
            quadrant(self.x + half_width, self.y + half_height),
        ]
    }

    fn contains_circle<C: Collider>(&self, body: &C) -> bool {
        let position = body.position();
        let r = body.radius();
        position.x() > self.x - r
            && position.x() < self.x + self.width + r
            && position.y() > self.y - r
            && position.y() < self.y + self.height + r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Disc(u64, f64, f64, f64);

    impl Collider for Disc {
        fn id(&self) -> AgentId {
            AgentId::new(self.0)
        }

        fn position(&self) -> Position {
            Position::new(self.1, self.2)
        }

        fn radius(&self) -> f64 {
            self.3
        }
    }

    #[test]
    fn touching_is_strict() {
        let a = Disc(0, 0.0, 0.0, 3.0);
        let b = Disc(1, 6.0, 0.0, 3.0);
        let c = Disc(2, 5.9, 0.0, 3.0);
        assert!(!is_touching(&a, &b));
        assert!(is_touching(&a, &c));
    }

    #[test]
    fn pair_orders_greater_tag_first() {
        let bodies = [Disc(4, 0.0, 0.0, 3.0), Disc(9, 1.0, 0.0, 3.0)];
        let pairs = brute_force_pairs(&bodies);
        assert_eq!(pairs, vec![ContactPair { first: 1, second: 0 }]);
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        let [a, b, c, d] = rect.quadrants();
        assert_eq!((a.x, a.y), (10.0, 20.0));
        assert_eq!((b.x, b.y), (60.0, 20.0));
        assert_eq!((c.x, c.y), (10.0, 45.0));
        assert_eq!((d.x, d.y), (60.0, 45.0));
        assert!([a, b, c, d].iter().all(|q| q.width == 50.0 && q.height == 25.0));
    }

    #[test]
    fn straddling_body_belongs_to_every_adjacent_quadrant() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let centre = Disc(0, 50.0, 50.0, 3.0);
        assert!(rect.quadrants().iter().all(|q| q.contains_circle(&centre)));
        let corner = Disc(1, 10.0, 10.0, 3.0);
        assert_eq!(
            rect.quadrants()
                .iter()
                .filter(|q| q.contains_circle(&corner))
                .count(),
            1
        );
    }

    #[test]
    fn root_covers_bodies_outside_arena() {
        let bodies = [Disc(0, -4.0, 5.0, 1.0), Disc(1, 30.0, 120.0, 1.0)];
        let root = Rect::covering(&bodies, 100.0, 100.0);
        assert_eq!(root.x, -4.0);
        assert_eq!(root.y, 0.0);
        assert_eq!(root.width, 104.0);
        assert_eq!(root.height, 120.0);
    }
}
