//! Immature individuals developing inside a breeding site.

use mosquito_sim_core::{AgentId, Gender, Genotype, Position, Probability, Stage, DAYS_PER_TICK};
use rand::Rng;

use crate::agent::{Agent, TickRules};

/// Mean development time from oviposition to emergence, in days.
pub const DAYS_TO_ADULTHOOD: f64 = 9.7;

/// Width of the uniform spread of development times around the mean.
pub const LARVAL_DURATION_SPREAD: f64 = 3.0;

/// Persisted description of an immature individual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PupaState {
    /// Age in simulated days.
    pub age: f64,
    /// Age at which the individual emerges.
    pub larval_duration: f64,
    /// Gender the adult will have.
    pub gender: Gender,
    /// Genotype the adult will carry.
    pub genotype: Genotype,
    /// Location of the breeding site that holds the individual.
    pub birth_location: Position,
}

/// Immature individual. Never moves.
#[derive(Clone, Debug, PartialEq)]
pub struct Pupa {
    id: AgentId,
    age: f64,
    alive: bool,
    gender: Gender,
    genotype: Genotype,
    larval_duration: f64,
    stage: Stage,
    birth_location: Position,
    density_dependent_mortality: Probability,
}

impl Pupa {
    /// Creates a freshly laid individual with random gender and development time.
    pub fn spawn<R: Rng + ?Sized>(
        id: AgentId,
        genotype: Genotype,
        birth_location: Position,
        rng: &mut R,
    ) -> Self {
        let gender = Gender::random(rng);
        let larval_duration = DAYS_TO_ADULTHOOD + LARVAL_DURATION_SPREAD * rng.gen::<f64>()
            - LARVAL_DURATION_SPREAD / 2.0;
        Self::from_state(
            id,
            PupaState {
                age: 0.0,
                larval_duration,
                gender,
                genotype,
                birth_location,
            },
        )
    }

    /// Rebuilds an individual from persisted state.
    #[must_use]
    pub fn from_state(id: AgentId, state: PupaState) -> Self {
        let age = state.age;
        Self {
            id,
            age,
            alive: true,
            gender: state.gender,
            genotype: state.genotype,
            larval_duration: state.larval_duration,
            stage: Stage::from_age(age),
            birth_location: state.birth_location,
            density_dependent_mortality: Probability::NEVER,
        }
    }

    /// Captures the persisted description of the individual.
    #[must_use]
    pub fn state(&self) -> PupaState {
        PupaState {
            age: self.age,
            larval_duration: self.larval_duration,
            gender: self.gender,
            genotype: self.genotype,
            birth_location: self.birth_location,
        }
    }

    /// Replaces the age, recomputing the stage.
    #[must_use]
    pub fn with_age(mut self, age: f64) -> Self {
        self.age = age;
        self.stage = Stage::from_age(self.age);
        self
    }

    /// Gender the adult will have.
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Genotype the adult will carry.
    #[must_use]
    pub fn genotype(&self) -> Genotype {
        self.genotype
    }

    /// Current maturation stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Age at which the individual emerges.
    #[must_use]
    pub fn larval_duration(&self) -> f64 {
        self.larval_duration
    }

    /// Location the adult will emerge at.
    #[must_use]
    pub fn birth_location(&self) -> Position {
        self.birth_location
    }

    /// Reports whether the individual is old enough to emerge.
    #[must_use]
    pub fn is_mature(&self) -> bool {
        self.age > self.larval_duration
    }

    /// Sets the per-tick density-dependent death chance.
    pub fn set_density_dependent_mortality(&mut self, probability: Probability) {
        self.density_dependent_mortality = probability;
    }
}

impl Agent for Pupa {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> Position {
        self.birth_location
    }

    fn age(&self) -> f64 {
        self.age
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }

    fn update<R: Rng + ?Sized>(&mut self, _rules: &TickRules, rng: &mut R) {
        if self.density_dependent_mortality.sample(rng) {
            self.kill();
        }
        self.age += DAYS_PER_TICK;
        self.stage = Stage::from_age(self.age);
    }
}
