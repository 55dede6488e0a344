//! Construction parameters of the simulated world.

use mosquito_sim_core::{ConfigError, Gender, Genotype, Position, Probability};
use mosquito_sim_system_release as release;
use serde::{Deserialize, Serialize};

/// Parameters supplied once when the world is constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seed of the world-owned random number generator.
    pub seed: u64,
    /// Horizontal extent of the arena.
    pub width: f64,
    /// Vertical extent of the arena.
    pub height: f64,
    /// Radius given to every new adult.
    pub agent_radius: f64,
    /// Flight speed given to every new adult, in units per tick.
    pub agent_speed: f64,
    /// Kills every female carrying an engineered allele each tick.
    pub female_lethal: bool,
    /// Wild-type adults seeded by the bootstrap.
    pub initial_population: u32,
    /// Breeding sites placed by the bootstrap.
    pub breeding_sites: u32,
    /// Immature individuals seeded into each bootstrap site.
    ///
    /// Derived from the initial population when absent.
    pub initial_pupae_per_site: Option<u32>,
    /// Chance that a fertile pair mates when they touch.
    pub mating_probability: Probability,
    /// Farthest a gravid female travels to reach a breeding site.
    pub max_oviposition_distance: f64,
    /// Immature individuals produced by one oviposition.
    pub clutch_size: u32,
    /// Scheduled release of lab-reared adults.
    pub release: ReleaseConfig,
    /// Stochastic death rates.
    pub mortality: MortalityConfig,
    /// Breeding-site carrying capacities.
    pub capacity: CapacityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0x6d6f_7371_7569_746f,
            width: 600.0,
            height: 600.0,
            agent_radius: 3.0,
            agent_speed: 6.0,
            female_lethal: false,
            initial_population: 1000,
            breeding_sites: 107,
            initial_pupae_per_site: None,
            mating_probability: Probability::CERTAIN,
            max_oviposition_distance: 33.0,
            clutch_size: 63,
            release: ReleaseConfig::default(),
            mortality: MortalityConfig::default(),
            capacity: CapacityConfig::default(),
        }
    }
}

impl Config {
    /// Checks geometric and capacity constraints.
    ///
    /// Probabilities are validated when they are constructed or deserialised.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("agent_radius", self.agent_radius)?;
        positive("agent_speed", self.agent_speed)?;
        positive("max_oviposition_distance", self.max_oviposition_distance)?;
        non_negative("release.interval_days", self.release.interval_days)?;
        non_negative("release.jitter", self.release.jitter)?;
        self.capacity.validate()
    }

    /// Immature individuals placed in each bootstrap site.
    #[must_use]
    pub fn pupae_per_site(&self) -> u32 {
        match self.initial_pupae_per_site {
            Some(count) => count,
            None if self.breeding_sites == 0 => 0,
            None => self.initial_population / self.breeding_sites * 5,
        }
    }

    /// Release schedule measured in ticks.
    #[must_use]
    pub fn release_schedule(&self) -> release::Config {
        release::Config::from_days(
            self.release.count,
            self.release.interval_days,
            self.release.per_release,
        )
    }
}

/// Where, when and what lab-reared adults are released.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Total number of scheduled releases.
    pub count: u32,
    /// Simulated days between two releases.
    pub interval_days: f64,
    /// Adults injected by each release.
    pub per_release: u32,
    /// Centre of the release area.
    pub location: Position,
    /// Largest offset of a release point from the centre along each axis.
    pub jitter: f64,
    /// Genotype of released adults.
    pub genotype: Genotype,
    /// Gender of released adults.
    pub gender: Gender,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            count: 5,
            interval_days: 2.0,
            per_release: 0,
            location: Position::new(300.0, 300.0),
            jitter: 50.0,
            genotype: Genotype::HomozygousDominant,
            gender: Gender::Male,
        }
    }
}

/// Stochastic death rates applied every tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MortalityConfig {
    /// Probability that an adult survives one simulated day.
    pub mosquito_daily_survival: Probability,
    /// Density-independent death chance of an immature individual per tick.
    pub pupa_tick_mortality: Probability,
    /// Density-dependent death chance of an immature individual per tick.
    pub pupa_density_dependent: Probability,
    /// Chance that a maturing individual survives emergence.
    pub emergence_survival: Probability,
}

impl Default for MortalityConfig {
    fn default() -> Self {
        Self {
            mosquito_daily_survival: Probability::clamped(0.85),
            pupa_tick_mortality: Probability::clamped(0.005_515_448),
            pupa_density_dependent: Probability::NEVER,
            emergence_survival: Probability::clamped(0.83),
        }
    }
}

impl MortalityConfig {
    /// Configuration in which nothing dies and every emergence succeeds.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            mosquito_daily_survival: Probability::CERTAIN,
            pupa_tick_mortality: Probability::NEVER,
            pupa_density_dependent: Probability::NEVER,
            emergence_survival: Probability::CERTAIN,
        }
    }

    /// Per-tick death chance of an adult.
    #[must_use]
    pub fn mosquito_tick_hazard(&self) -> Probability {
        Probability::per_tick_hazard(self.mosquito_daily_survival)
    }
}

/// Per-stage carrying capacities of a breeding site.
///
/// Early and late limits are disabled unless configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacityConfig {
    /// Limit on early-stage individuals.
    pub early: Option<usize>,
    /// Limit on late-stage individuals.
    pub late: Option<usize>,
    /// Limit on final-stage individuals.
    #[serde(rename = "final")]
    pub final_stage: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            early: None,
            late: None,
            final_stage: 25,
        }
    }
}

impl CapacityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.early == Some(0) {
            return Err(ConfigError::ZeroCapacity { name: "early" });
        }
        if self.late == Some(0) {
            return Err(ConfigError::ZeroCapacity { name: "late" });
        }
        if self.final_stage == 0 {
            return Err(ConfigError::ZeroCapacity { name: "final" });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pupae_per_site(), 45);
        assert_eq!(config.release_schedule().interval_ticks(), 60);
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let config = Config {
            width: 0.0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "width",
                value: 0.0
            })
        );

        let config = Config {
            agent_radius: f64::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = Config::default();
        config.capacity.late = Some(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { name: "late" })
        );
    }

    #[test]
    fn negative_release_interval_is_rejected() {
        let mut config = Config::default();
        config.release.interval_days = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { name: "release.interval_days", .. })
        ));
    }

    #[test]
    fn explicit_pupae_per_site_overrides_derivation() {
        let config = Config {
            initial_pupae_per_site: Some(3),
            breeding_sites: 0,
            ..Config::default()
        };
        assert_eq!(config.pupae_per_site(), 3);

        let config = Config {
            breeding_sites: 0,
            ..Config::default()
        };
        assert_eq!(config.pupae_per_site(), 0);
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let text = r#"
            seed = 9
            female_lethal = true

            [release]
            per_release = 250
            genotype = "FF"

            [capacity]
            final = 40
            early = 100
        "#;
        let config: Config = toml::from_str(text).expect("config parses");
        assert_eq!(config.seed, 9);
        assert!(config.female_lethal);
        assert_eq!(config.release.per_release, 250);
        assert_eq!(config.release.count, 5);
        assert_eq!(config.capacity.final_stage, 40);
        assert_eq!(config.capacity.early, Some(100));
        assert_eq!(config.capacity.late, None);
        assert_eq!(config.width, 600.0);
    }

    #[test]
    fn toml_rejects_out_of_range_probability() {
        let text = "mating_probability = 1.5";
        assert!(toml::from_str::<Config>(text).is_err());
    }
}
