//! Behaviour shared by every simulated organism.

use std::f64::consts::{FRAC_PI_2, PI};

use mosquito_sim_core::{
    reflect_horizontal, reflect_vertical, wrap_angle, AgentId, Position, Probability,
};
use rand::Rng;

/// Growth of the home range per simulated day of age.
pub const HOME_RANGE_GROWTH: f64 = 33.0;

/// Home range of a newly emerged adult.
pub const HOME_RANGE_BASE: f64 = 30.0;

/// Rules that stay fixed for the duration of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickRules {
    /// Per-tick death chance of an adult.
    pub mosquito_hazard: Probability,
}

/// Organism owned and advanced by the world once per tick.
pub trait Agent {
    /// Identity tag allocated when the organism was created.
    fn id(&self) -> AgentId;

    /// Current location.
    fn position(&self) -> Position;

    /// Age in simulated days.
    fn age(&self) -> f64;

    /// Reports whether the organism is still alive.
    fn is_alive(&self) -> bool;

    /// Marks the organism dead. Its owner evicts it later in the tick.
    fn kill(&mut self);

    /// Advances the organism by one tick.
    fn update<R: Rng + ?Sized>(&mut self, rules: &TickRules, rng: &mut R);
}

/// Maximum roaming distance from the birth location at `age` days.
#[must_use]
pub fn home_range_radius(age: f64) -> f64 {
    HOME_RANGE_GROWTH * age + HOME_RANGE_BASE
}

/// Kinematic state of a flying organism.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Flight {
    pub(crate) position: Position,
    pub(crate) heading: f64,
    pub(crate) speed: f64,
    pub(crate) radius: f64,
    pub(crate) birth_location: Position,
}

impl Flight {
    /// Displaces the organism by one tick of travel.
    pub(crate) fn advance(&mut self) {
        self.position = self.position.offset(self.speed, self.heading);
    }

    /// Pulls the organism back inside the home range derived from `age`.
    ///
    /// Returns `true` when the organism had strayed.
    pub(crate) fn enforce_home_range<R: Rng + ?Sized>(&mut self, age: f64, rng: &mut R) -> bool {
        let bound = home_range_radius(age) - 2.0 * self.radius;
        if self.position.distance(self.birth_location) <= bound {
            return false;
        }

        loop {
            let distance = self.position.distance(self.birth_location);
            if distance <= bound {
                break;
            }
            if distance <= 1.0 {
                self.position = self.birth_location;
                break;
            }
            let toward_birth = self.position.direction_to(self.birth_location);
            self.position = self.position.offset(1.0, toward_birth);
        }

        let toward_birth = self.position.direction_to(self.birth_location);
        self.heading = wrap_angle(toward_birth + FRAC_PI_2 - rng.gen::<f64>() * PI);
        true
    }

    /// Steps the organism back inside the arena and reflects its heading off
    /// every edge it crossed.
    pub(crate) fn enforce_arena_bounds(&mut self, width: f64, height: f64) {
        let radius = self.radius;

        if self.position.x() - radius < 0.0 {
            while self.position.x() - radius < 0.0 {
                self.position = Position::new(self.position.x() + 1.0, self.position.y());
            }
            self.heading = reflect_horizontal(self.heading);
        }
        if self.position.x() + radius > width {
            while self.position.x() + radius > width {
                self.position = Position::new(self.position.x() - 1.0, self.position.y());
            }
            self.heading = reflect_horizontal(self.heading);
        }
        if self.position.y() - radius < 0.0 {
            while self.position.y() - radius < 0.0 {
                self.position = Position::new(self.position.x(), self.position.y() + 1.0);
            }
            self.heading = reflect_vertical(self.heading);
        }
        if self.position.y() + radius > height {
            while self.position.y() + radius > height {
                self.position = Position::new(self.position.x(), self.position.y() - 1.0);
            }
            self.heading = reflect_vertical(self.heading);
        }
    }
}
