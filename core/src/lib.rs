#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the mosquito population simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened during the step. Geometry, genetics vocabulary and the validated
//! [`Probability`] type live here so every crate shares one definition.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of simulation ticks that make up one simulated day.
pub const TICKS_PER_DAY: u32 = 30;

/// Simulated days that elapse during a single tick.
pub const DAYS_PER_TICK: f64 = 1.0 / TICKS_PER_DAY as f64;

/// Age in days at which an immature individual leaves the early stage.
pub const DAYS_TO_STAGE_LATE: f64 = 3.3;

/// Age in days at which an immature individual enters the final stage.
pub const DAYS_TO_STAGE_FINAL: f64 = 7.2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// Releases lab-reared mosquitoes immediately, outside of the schedule.
    ReleaseMosquitoes {
        /// Number of individuals injected at the release site.
        count: u32,
    },
    /// Kills every immature individual held by every breeding site.
    ClearBreedingSites,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Reports adults that emerged from breeding sites during the tick.
    MosquitoesEmerged {
        /// Number of new adults that survived emergence.
        count: usize,
    },
    /// Confirms that lab-reared mosquitoes were injected.
    MosquitoesReleased {
        /// Number of released individuals.
        count: u32,
    },
    /// Reports adults evicted from the population during the tick.
    MosquitoesDied {
        /// Number of adults removed.
        count: usize,
    },
    /// Confirms that a female and a male mated.
    Mated {
        /// Identifier of the female partner.
        female: AgentId,
        /// Identifier of the male partner.
        male: AgentId,
    },
    /// Confirms that a female laid a clutch into a breeding site.
    EggsDeposited {
        /// Identifier of the ovipositing female.
        female: AgentId,
        /// Breeding site that received the clutch.
        site: BreedingSiteId,
        /// Number of immature individuals added to the site.
        clutch: u32,
    },
    /// Reports that a female discarded her eggs because no site was in range.
    EggsLost {
        /// Identifier of the female that failed to find a site.
        female: AgentId,
    },
    /// Publishes the aggregate population counters for the tick.
    PopulationCounted {
        /// Counters computed after the tick resolved.
        counts: PopulationCounts,
    },
}

/// Unique identity tag assigned to every organism.
///
/// Tags are allocated in strictly increasing order and provide the total
/// order used to deduplicate pairwise collision checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u64);

impl AgentId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Identifier of a breeding site, equal to its index in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreedingSiteId(u32);

impl BreedingSiteId {
    /// Creates a new breeding site identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Point or displacement in the continuous two-dimensional arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate, increasing downward.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Bearing from this position toward `other`, normalised to `[0, 2π)`.
    ///
    /// Coincident positions report a bearing of zero.
    #[must_use]
    pub fn direction_to(self, other: Position) -> f64 {
        wrap_angle((other.y - self.y).atan2(other.x - self.x))
    }

    /// Returns the position displaced by `distance` along `angle`.
    #[must_use]
    pub fn offset(self, distance: f64, angle: f64) -> Position {
        Position::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    /// Draws a uniformly distributed position inside `[0, width) × [0, height)`.
    pub fn random_within<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Position {
        let x = rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * height;
        Position::new(x, y)
    }
}

/// Normalises any angle in radians into `[0, 2π)`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed magnitude of a velocity projected onto `axis`.
///
/// `direction` and `speed` describe the velocity in polar form.
#[must_use]
pub fn projection(direction: f64, speed: f64, axis: f64) -> f64 {
    speed * (wrap_angle(direction) - wrap_angle(axis)).cos()
}

/// Heading mirrored across a vertical wall.
#[must_use]
pub fn reflect_horizontal(heading: f64) -> f64 {
    wrap_angle(PI - heading)
}

/// Heading mirrored across a horizontal wall.
#[must_use]
pub fn reflect_vertical(heading: f64) -> f64 {
    wrap_angle(TAU - heading)
}

/// Draws a uniformly distributed heading.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * TAU
}

/// Probability constant validated to lie in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Outcome that never happens.
    pub const NEVER: Probability = Probability(0.0);

    /// Outcome that always happens.
    pub const CERTAIN: Probability = Probability(1.0);

    /// Validates the provided value.
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::ProbabilityOutOfRange { value })
        }
    }

    /// Clamps the provided value into `[0, 1]`, mapping NaN to zero.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::NEVER
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Converts a daily survival probability into a per-tick hazard.
    ///
    /// The returned probability satisfies `(1 - p)^TICKS_PER_DAY == survival`.
    pub fn per_tick_hazard(daily_survival: Probability) -> Probability {
        Probability(1.0 - daily_survival.0.powf(DAYS_PER_TICK))
    }

    /// Raw probability value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Performs a single Bernoulli draw against the probability.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Probability::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

/// Biological sex of an organism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male individual.
    Male,
    /// Female individual.
    Female,
}

impl Gender {
    /// Assigns a gender uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

/// Single-locus diploid genotype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genotype {
    /// Two copies of the engineered allele (`FF`).
    #[serde(rename = "FF")]
    HomozygousDominant,
    /// One engineered and one wild allele (`Ff`).
    #[serde(rename = "Ff")]
    Heterozygous,
    /// Two wild alleles (`ff`).
    #[serde(rename = "ff")]
    HomozygousRecessive,
}

impl Genotype {
    /// Conventional allele notation of the genotype.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HomozygousDominant => "FF",
            Self::Heterozygous => "Ff",
            Self::HomozygousRecessive => "ff",
        }
    }

    /// Reports whether the genotype carries no engineered allele.
    #[must_use]
    pub const fn is_wild_type(self) -> bool {
        matches!(self, Self::HomozygousRecessive)
    }
}

/// Maturation phase of an immature individual, derived from its age.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Younger than [`DAYS_TO_STAGE_LATE`].
    Early,
    /// At least [`DAYS_TO_STAGE_LATE`] and younger than [`DAYS_TO_STAGE_FINAL`].
    Late,
    /// At least [`DAYS_TO_STAGE_FINAL`].
    Final,
}

impl Stage {
    /// Classifies an age in days. Lower thresholds are inclusive.
    #[must_use]
    pub fn from_age(age: f64) -> Self {
        if age < DAYS_TO_STAGE_LATE {
            Stage::Early
        } else if age < DAYS_TO_STAGE_FINAL {
            Stage::Late
        } else {
            Stage::Final
        }
    }
}

/// Aggregate counters of the adult population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PopulationCounts {
    /// Number of live adults.
    pub total: usize,
    /// Number of live male adults.
    pub males: usize,
    /// Number of live female adults.
    pub females: usize,
    /// Adults carrying genotype `FF`.
    pub homozygous_dominant: usize,
    /// Adults carrying genotype `Ff`.
    pub heterozygous: usize,
    /// Adults carrying genotype `ff`.
    pub homozygous_recessive: usize,
}

impl PopulationCounts {
    /// Tallies the provided `(gender, genotype)` pairs.
    pub fn tally<I>(individuals: I) -> Self
    where
        I: IntoIterator<Item = (Gender, Genotype)>,
    {
        let mut counts = Self::default();
        for (gender, genotype) in individuals {
            counts.total += 1;
            match gender {
                Gender::Male => counts.males += 1,
                Gender::Female => counts.females += 1,
            }
            match genotype {
                Genotype::HomozygousDominant => counts.homozygous_dominant += 1,
                Genotype::Heterozygous => counts.heterozygous += 1,
                Genotype::HomozygousRecessive => counts.homozygous_recessive += 1,
            }
        }
        counts
    }
}

/// Reasons a simulation configuration may be rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A probability constant falls outside `[0, 1]`.
    #[error("probability {value} is outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Offending value.
        value: f64,
    },
    /// A geometric quantity that must be strictly positive was not.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive {
        /// Name of the configuration field.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A quantity that may be zero but never negative was negative.
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative {
        /// Name of the configuration field.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A carrying capacity of zero would cull every individual.
    #[error("{name} capacity must be at least one")]
    ZeroCapacity {
        /// Name of the stage whose capacity is zero.
        name: &'static str,
    },
}
