use std::collections::HashSet;

use mosquito_sim_core::{AgentId, Position};
use mosquito_sim_system_collision::{brute_force_pairs, Collider, CollisionIndex, ContactPair};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
struct Body {
    id: AgentId,
    position: Position,
    radius: f64,
}

impl Collider for Body {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

fn scatter(rng: &mut ChaCha8Rng, count: usize, width: f64, height: f64, radius: f64) -> Vec<Body> {
    (0..count)
        .map(|index| Body {
            id: AgentId::new(index as u64 * 3 + 1),
            position: Position::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
            radius,
        })
        .collect()
}

fn assert_well_formed(bodies: &[Body], pairs: &[ContactPair]) {
    let mut seen = HashSet::new();
    for pair in pairs {
        assert_ne!(pair.first, pair.second, "self pair reported");
        assert!(bodies[pair.first].id > bodies[pair.second].id);
        let key = (pair.first.min(pair.second), pair.first.max(pair.second));
        assert!(seen.insert(key), "duplicate pair {key:?}");
    }
}

#[test]
fn uniform_populations_match_brute_force() {
    let index = CollisionIndex::default();
    for seed in 0..40 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let count = rng.gen_range(0..400);
        let bodies = scatter(&mut rng, count, 600.0, 600.0, 3.0);

        let expected = brute_force_pairs(&bodies);
        let actual = index.pairs(&bodies, 600.0, 600.0);

        assert_well_formed(&bodies, &actual);
        assert_eq!(actual, expected, "seed {seed} diverged");
    }
}

#[test]
fn dense_clusters_match_brute_force() {
    let index = CollisionIndex::default();
    for seed in 100..120 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut bodies = scatter(&mut rng, 150, 40.0, 40.0, 3.0);
        for (offset, body) in scatter(&mut rng, 150, 600.0, 600.0, 3.0).into_iter().enumerate() {
            bodies.push(Body {
                id: AgentId::new(10_000 + offset as u64),
                ..body
            });
        }

        let expected = brute_force_pairs(&bodies);
        assert!(!expected.is_empty(), "cluster should produce contacts");
        let actual = index.pairs(&bodies, 600.0, 600.0);

        assert_well_formed(&bodies, &actual);
        assert_eq!(actual, expected, "seed {seed} diverged");
    }
}

#[test]
fn mixed_radii_and_escaped_bodies_match_brute_force() {
    let index = CollisionIndex::default();
    for seed in 200..220 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let bodies: Vec<Body> = (0..250)
            .map(|index| Body {
                id: AgentId::new(index),
                position: Position::new(
                    rng.gen_range(-20.0..220.0),
                    rng.gen_range(-20.0..220.0),
                ),
                radius: rng.gen_range(1.0..6.0),
            })
            .collect();

        let expected = brute_force_pairs(&bodies);
        let actual = index.pairs(&bodies, 200.0, 200.0);
        assert_eq!(actual, expected, "seed {seed} diverged");
    }
}

#[test]
fn one_body_touching_several_yields_one_entry_per_partner() {
    let bodies = vec![
        Body {
            id: AgentId::new(0),
            position: Position::new(50.0, 50.0),
            radius: 3.0,
        },
        Body {
            id: AgentId::new(1),
            position: Position::new(54.0, 50.0),
            radius: 3.0,
        },
        Body {
            id: AgentId::new(2),
            position: Position::new(46.0, 50.0),
            radius: 3.0,
        },
        Body {
            id: AgentId::new(3),
            position: Position::new(50.0, 54.0),
            radius: 3.0,
        },
    ];

    let pairs = CollisionIndex::default().pairs(&bodies, 100.0, 100.0);
    let partners_of_centre = pairs
        .iter()
        .filter(|pair| pair.first == 0 || pair.second == 0)
        .count();
    assert_eq!(partners_of_centre, 3);
}

#[test]
fn coincident_bodies_terminate_and_pair_up() {
    let bodies: Vec<Body> = (0..12)
        .map(|index| Body {
            id: AgentId::new(index),
            position: Position::new(300.0, 300.0),
            radius: 3.0,
        })
        .collect();

    let pairs = CollisionIndex::default().pairs(&bodies, 600.0, 600.0);
    assert_eq!(pairs.len(), 12 * 11 / 2);
}

#[test]
fn empty_and_single_inputs_produce_no_pairs() {
    let index = CollisionIndex::default();
    let empty: Vec<Body> = Vec::new();
    assert!(index.pairs(&empty, 600.0, 600.0).is_empty());

    let single = vec![Body {
        id: AgentId::new(0),
        position: Position::new(1.0, 1.0),
        radius: 3.0,
    }];
    assert!(index.pairs(&single, 600.0, 600.0).is_empty());
}
