//! Adult mosquitoes: flight, fertility, mating and oviposition.

use mosquito_sim_core::{random_angle, AgentId, Gender, Genotype, Position, DAYS_PER_TICK};
use mosquito_sim_system_collision::Collider;
use mosquito_sim_system_physics::Body;
use rand::Rng;

use crate::agent::{Agent, Flight, TickRules};

/// Days a female needs after ovipositing before she can mate again.
pub const OVIPOSITION_REFRACTORY_DAYS: f64 = 3.0;

/// Days a female carries eggs before she deposits them.
pub const EGG_CARRYING_DAYS: f64 = 2.0;

/// Age in days after which a male can mate.
pub const MALE_MATURATION_DAYS: f64 = 1.0;

/// Age in days after which a female can mate.
pub const FEMALE_MATURATION_DAYS: f64 = 2.5;

/// Matings a male performs before becoming infertile.
pub const MALE_MATING_CAP: f64 = 4.5;

/// Matings a female performs before becoming infertile.
pub const FEMALE_MATING_CAP: f64 = 8.0;

/// Largest distance between a new adult and its birth location.
pub const BIRTH_SCATTER: f64 = 30.0;

/// Days since oviposition given to every new adult.
const INITIAL_DAYS_SINCE_OVIPOSITION: f64 = 3.5;

/// Persisted description of an adult.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MosquitoState {
    /// Radius of the body.
    pub radius: f64,
    /// Distance flown per tick.
    pub speed: f64,
    /// Current location.
    pub position: Position,
    /// Centre of the home range.
    pub birth_location: Position,
    /// Age in simulated days.
    pub age: f64,
    /// Gender of the adult.
    pub gender: Gender,
    /// Genotype of the adult.
    pub genotype: Genotype,
    /// Direction of flight in radians.
    pub heading: f64,
    /// Days since the last oviposition.
    pub days_since_oviposition: f64,
    /// Matings performed so far.
    pub mating_count: u32,
    /// Days the current clutch has been carried.
    pub days_carrying_eggs: f64,
    /// Whether the adult carries fertilised eggs.
    pub carrying_eggs: bool,
    /// Genotype of the partner that fertilised the carried eggs.
    pub mate_genotype: Option<Genotype>,
}

/// Flying adult.
#[derive(Clone, Debug, PartialEq)]
pub struct Mosquito {
    id: AgentId,
    flight: Flight,
    age: f64,
    alive: bool,
    gender: Gender,
    genotype: Genotype,
    mating_count: u32,
    days_since_oviposition: f64,
    days_carrying_eggs: f64,
    carrying_eggs: bool,
    mate_genotype: Option<Genotype>,
}

impl Mosquito {
    /// Creates an adult of age zero scattered around `birth_location` with a
    /// random heading.
    pub fn spawn<R: Rng + ?Sized>(
        id: AgentId,
        birth_location: Position,
        radius: f64,
        speed: f64,
        gender: Gender,
        genotype: Genotype,
        rng: &mut R,
    ) -> Self {
        let scatter = rng.gen::<f64>() * BIRTH_SCATTER;
        let position = birth_location.offset(scatter, random_angle(rng));
        let heading = random_angle(rng);
        Self::from_state(
            id,
            MosquitoState {
                radius,
                speed,
                position,
                birth_location,
                age: 0.0,
                gender,
                genotype,
                heading,
                days_since_oviposition: INITIAL_DAYS_SINCE_OVIPOSITION,
                mating_count: 0,
                days_carrying_eggs: 0.0,
                carrying_eggs: false,
                mate_genotype: None,
            },
        )
    }

    /// Rebuilds an adult from persisted state.
    #[must_use]
    pub fn from_state(id: AgentId, state: MosquitoState) -> Self {
        Self {
            id,
            flight: Flight {
                position: state.position,
                heading: state.heading,
                speed: state.speed,
                radius: state.radius,
                birth_location: state.birth_location,
            },
            age: state.age,
            alive: true,
            gender: state.gender,
            genotype: state.genotype,
            mating_count: state.mating_count,
            days_since_oviposition: state.days_since_oviposition,
            days_carrying_eggs: state.days_carrying_eggs,
            carrying_eggs: state.carrying_eggs && state.gender == Gender::Female,
            mate_genotype: state.mate_genotype,
        }
    }

    /// Captures the persisted description of the adult.
    #[must_use]
    pub fn state(&self) -> MosquitoState {
        MosquitoState {
            radius: self.flight.radius,
            speed: self.flight.speed,
            position: self.flight.position,
            birth_location: self.flight.birth_location,
            age: self.age,
            gender: self.gender,
            genotype: self.genotype,
            heading: self.flight.heading,
            days_since_oviposition: self.days_since_oviposition,
            mating_count: self.mating_count,
            days_carrying_eggs: self.days_carrying_eggs,
            carrying_eggs: self.carrying_eggs,
            mate_genotype: self.mate_genotype,
        }
    }

    /// Replaces the age.
    #[must_use]
    pub fn with_age(mut self, age: f64) -> Self {
        self.age = age;
        self
    }

    /// Identity tag of the adult.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Current location.
    #[must_use]
    pub fn position(&self) -> Position {
        self.flight.position
    }

    /// Gender of the adult.
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Genotype of the adult.
    #[must_use]
    pub fn genotype(&self) -> Genotype {
        self.genotype
    }

    /// Direction of flight in radians.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.flight.heading
    }

    /// Distance flown per tick.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.flight.speed
    }

    /// Radius of the body.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.flight.radius
    }

    /// Centre of the home range.
    #[must_use]
    pub fn birth_location(&self) -> Position {
        self.flight.birth_location
    }

    /// Matings performed so far.
    #[must_use]
    pub fn mating_count(&self) -> u32 {
        self.mating_count
    }

    /// Whether the adult carries fertilised eggs.
    #[must_use]
    pub fn is_carrying_eggs(&self) -> bool {
        self.carrying_eggs
    }

    /// Genotype of the partner that fertilised the carried eggs.
    #[must_use]
    pub fn mate_genotype(&self) -> Option<Genotype> {
        self.mate_genotype
    }

    /// Reports whether the adult may mate right now.
    ///
    /// Mating caps are fractional and compared strictly, so a female mates at
    /// most eight times and a male at most five.
    #[must_use]
    pub fn is_fertile(&self) -> bool {
        let matings = f64::from(self.mating_count);
        match self.gender {
            Gender::Female => {
                self.days_since_oviposition > OVIPOSITION_REFRACTORY_DAYS
                    && !self.carrying_eggs
                    && self.age > FEMALE_MATURATION_DAYS
                    && matings < FEMALE_MATING_CAP
            }
            Gender::Male => matings < MALE_MATING_CAP && self.age > MALE_MATURATION_DAYS,
        }
    }

    /// Records a mating with a partner of genotype `partner`.
    ///
    /// The caller invokes this on both partners.
    pub fn mate(&mut self, partner: Genotype) {
        self.mating_count = self.mating_count.saturating_add(1);
        if self.gender == Gender::Female {
            self.carrying_eggs = true;
            self.days_carrying_eggs = 0.0;
            self.mate_genotype = Some(partner);
        }
    }

    /// Reports whether the carried eggs are ready to be deposited.
    #[must_use]
    pub fn is_ready_to_oviposit(&self) -> bool {
        self.carrying_eggs && self.days_carrying_eggs > EGG_CARRYING_DAYS
    }

    /// Empties the carried clutch and resets the oviposition timers.
    ///
    /// Returns the genotypes of both parents, or `None` when nothing was carried.
    pub fn deposit_eggs(&mut self) -> Option<(Genotype, Genotype)> {
        if !self.carrying_eggs {
            return None;
        }
        self.carrying_eggs = false;
        self.days_carrying_eggs = 0.0;
        self.days_since_oviposition = 0.0;
        self.mate_genotype.take().map(|mate| (self.genotype, mate))
    }

    /// Keeps the adult inside a `width × height` arena.
    pub fn enforce_arena_bounds(&mut self, width: f64, height: f64) {
        self.flight.enforce_arena_bounds(width, height);
    }
}

impl Agent for Mosquito {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> Position {
        self.flight.position
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

    fn update<R: Rng + ?Sized>(&mut self, rules: &TickRules, rng: &mut R) {
        self.flight.advance();
        self.age += DAYS_PER_TICK;
        let _ = self.flight.enforce_home_range(self.age, rng);

        if rules.mosquito_hazard.sample(rng) {
            self.kill();
        }
        if self.gender == Gender::Female {
            self.days_since_oviposition += DAYS_PER_TICK;
            if self.carrying_eggs {
                self.days_carrying_eggs += DAYS_PER_TICK;
            }
        }
    }
}

impl Collider for Mosquito {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> Position {
        self.flight.position
    }

    fn radius(&self) -> f64 {
        self.flight.radius
    }
}

impl Body for Mosquito {
    fn position(&self) -> Position {
        self.flight.position
    }

    fn set_position(&mut self, position: Position) {
        self.flight.position = position;
    }

    fn heading(&self) -> f64 {
        self.flight.heading
    }

    fn speed(&self) -> f64 {
        self.flight.speed
    }

    fn radius(&self) -> f64 {
        self.flight.radius
    }

    fn set_velocity(&mut self, heading: f64, speed: f64) {
        self.flight.heading = heading;
        self.flight.speed = speed;
    }
}
