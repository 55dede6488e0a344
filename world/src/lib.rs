#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the mosquito population simulator.
//!
//! The world owns every adult, every breeding site and the random number
//! generator driving all stochastic decisions. Adapters mutate it only through
//! [`apply`] and observe it through the [`query`] module.

mod agent;
mod breeding_site;
mod config;
mod mosquito;
mod pupa;

pub use agent::{home_range_radius, Agent, TickRules, HOME_RANGE_BASE, HOME_RANGE_GROWTH};
pub use breeding_site::{BreedingSite, BreedingSiteState, SiteRules, FLASH_DURATION_TICKS};
pub use config::{CapacityConfig, Config, MortalityConfig, ReleaseConfig};
pub use mosquito::{
    Mosquito, MosquitoState, BIRTH_SCATTER, EGG_CARRYING_DAYS, FEMALE_MATING_CAP,
    FEMALE_MATURATION_DAYS, MALE_MATING_CAP, MALE_MATURATION_DAYS, OVIPOSITION_REFRACTORY_DAYS,
};
pub use pupa::{Pupa, PupaState, DAYS_TO_ADULTHOOD, LARVAL_DURATION_SPREAD};

use mosquito_sim_core::{
    AgentId, BreedingSiteId, Command, ConfigError, Event, Gender, Genotype, Position,
};
use mosquito_sim_system_collision::{CollisionIndex, ContactPair};
use mosquito_sim_system_genetics::inherit;
use mosquito_sim_system_physics::bounce;
use mosquito_sim_system_release::ReleaseSchedule;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

const BOOTSTRAP_MAX_ADULT_AGE: f64 = 5.0;
const BOOTSTRAP_MAX_PUPA_AGE: f64 = 9.6;

/// Hands out strictly increasing identity tags.
#[derive(Debug, Default)]
struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    fn allocate(&mut self) -> AgentId {
        let id = AgentId::new(self.next);
        self.next += 1;
        id
    }
}

/// Represents the authoritative simulation state.
#[derive(Debug)]
pub struct World {
    config: Config,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    mosquitoes: Vec<Mosquito>,
    breeding_sites: Vec<BreedingSite>,
    schedule: ReleaseSchedule,
    index: CollisionIndex,
    tick_index: u64,
}

impl World {
    /// Creates a world populated by the bootstrap: wild-type adults scattered
    /// over the arena and breeding sites seeded with immature individuals.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let mut world = Self::empty(config)?;
        world.bootstrap();
        Ok(world)
    }

    /// Creates a world without organisms or breeding sites.
    pub fn empty(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            schedule: ReleaseSchedule::new(config.release_schedule()),
            config,
            ids: IdAllocator::default(),
            mosquitoes: Vec::new(),
            breeding_sites: Vec::new(),
            index: CollisionIndex::default(),
            tick_index: 0,
        })
    }

    /// Rebuilds a world from persisted organisms.
    ///
    /// Identity tags are reallocated in the order the states are supplied.
    pub fn restore<M, S>(config: Config, mosquitoes: M, sites: S) -> Result<Self, ConfigError>
    where
        M: IntoIterator<Item = MosquitoState>,
        S: IntoIterator<Item = BreedingSiteState>,
    {
        let mut world = Self::empty(config)?;
        for state in mosquitoes {
            let _ = world.insert_mosquito(state);
        }
        for site in sites {
            let id = world.add_breeding_site(site.location);
            for pupa in site.pupae {
                let _ = world.insert_pupa(id, pupa);
            }
        }
        Ok(world)
    }

    /// Adds an adult described by `state`.
    pub fn insert_mosquito(&mut self, state: MosquitoState) -> AgentId {
        let id = self.ids.allocate();
        self.mosquitoes.push(Mosquito::from_state(id, state));
        id
    }

    /// Adds an empty breeding site at `location`.
    pub fn add_breeding_site(&mut self, location: Position) -> BreedingSiteId {
        let id = BreedingSiteId::new(self.breeding_sites.len() as u32);
        self.breeding_sites.push(BreedingSite::new(id, location));
        id
    }

    /// Adds an immature individual to an existing breeding site.
    ///
    /// Returns `None` when the site does not exist.
    pub fn insert_pupa(&mut self, site: BreedingSiteId, state: PupaState) -> Option<AgentId> {
        let index = site.get() as usize;
        if index >= self.breeding_sites.len() {
            return None;
        }
        let id = self.ids.allocate();
        let mut pupa = Pupa::from_state(id, state);
        pupa.set_density_dependent_mortality(self.config.mortality.pupa_density_dependent);
        self.breeding_sites[index].add(pupa);
        Some(id)
    }

    fn bootstrap(&mut self) {
        let (width, height) = (self.config.width, self.config.height);

        for _ in 0..self.config.initial_population {
            let location = Position::random_within(&mut self.rng, width, height);
            let gender = Gender::random(&mut self.rng);
            let age = self.rng.gen::<f64>() * BOOTSTRAP_MAX_ADULT_AGE;
            let id = self.ids.allocate();
            let mosquito = Mosquito::spawn(
                id,
                location,
                self.config.agent_radius,
                self.config.agent_speed,
                gender,
                Genotype::HomozygousRecessive,
                &mut self.rng,
            );
            self.mosquitoes.push(mosquito.with_age(age));
        }

        let pupae_per_site = self.config.pupae_per_site();
        for _ in 0..self.config.breeding_sites {
            let location = Position::random_within(&mut self.rng, width, height);
            let site = self.add_breeding_site(location);
            for _ in 0..pupae_per_site {
                let age = self.rng.gen::<f64>() * BOOTSTRAP_MAX_PUPA_AGE;
                let id = self.ids.allocate();
                let mut pupa =
                    Pupa::spawn(id, Genotype::HomozygousRecessive, location, &mut self.rng)
                        .with_age(age);
                pupa.set_density_dependent_mortality(self.config.mortality.pupa_density_dependent);
                self.breeding_sites[site.get() as usize].add(pupa);
            }
        }

        debug!(
            adults = self.mosquitoes.len(),
            sites = self.breeding_sites.len(),
            pupae_per_site,
            "bootstrapped population"
        );
    }

    fn tick_rules(&self) -> TickRules {
        TickRules {
            mosquito_hazard: self.config.mortality.mosquito_tick_hazard(),
        }
    }

    fn site_rules(&self) -> SiteRules {
        SiteRules {
            mortality: self.config.mortality.pupa_tick_mortality,
            capacity: self.config.capacity,
        }
    }

    fn advance_breeding_sites(&mut self, out_events: &mut Vec<Event>) {
        let site_rules = self.site_rules();
        let tick_rules = self.tick_rules();
        let emergence = self.config.mortality.emergence_survival;
        let mut emerged = 0;

        for site in &mut self.breeding_sites {
            site.update(&site_rules, &tick_rules, &mut self.rng);
            for pupa in site.take_mature_pupae() {
                if !emergence.sample(&mut self.rng) {
                    continue;
                }
                let id = self.ids.allocate();
                self.mosquitoes.push(Mosquito::spawn(
                    id,
                    pupa.birth_location(),
                    self.config.agent_radius,
                    self.config.agent_speed,
                    pupa.gender(),
                    pupa.genotype(),
                    &mut self.rng,
                ));
                emerged += 1;
            }
        }

        if emerged > 0 {
            out_events.push(Event::MosquitoesEmerged { count: emerged });
        }
    }

    fn release(&mut self, count: u32, out_events: &mut Vec<Event>) {
        let release = &self.config.release;
        for _ in 0..count {
            let x = release.location.x() + self.rng.gen::<f64>() * 2.0 * release.jitter
                - release.jitter;
            let y = release.location.y() + self.rng.gen::<f64>() * 2.0 * release.jitter
                - release.jitter;
            let id = self.ids.allocate();
            self.mosquitoes.push(Mosquito::spawn(
                id,
                Position::new(x, y),
                self.config.agent_radius,
                self.config.agent_speed,
                release.gender,
                release.genotype,
                &mut self.rng,
            ));
        }

        debug!(
            tick = self.tick_index,
            count,
            genotype = release.genotype.label(),
            "released lab-reared mosquitoes"
        );
        out_events.push(Event::MosquitoesReleased { count });
    }

    fn advance_mosquitoes(&mut self, out_events: &mut Vec<Event>) {
        let rules = self.tick_rules();
        let (width, height) = (self.config.width, self.config.height);
        let female_lethal = self.config.female_lethal;

        for mosquito in &mut self.mosquitoes {
            mosquito.update(&rules, &mut self.rng);
            mosquito.enforce_arena_bounds(width, height);
            if female_lethal
                && mosquito.gender() == Gender::Female
                && !mosquito.genotype().is_wild_type()
            {
                mosquito.kill();
            }
        }

        let before = self.mosquitoes.len();
        self.mosquitoes.retain(Mosquito::is_alive);
        let died = before - self.mosquitoes.len();
        if died > 0 {
            out_events.push(Event::MosquitoesDied { count: died });
        }
    }

    fn deposit_eggs(&mut self, out_events: &mut Vec<Event>) {
        let reach = self.config.max_oviposition_distance;
        let clutch = self.config.clutch_size;
        let density_dependent = self.config.mortality.pupa_density_dependent;

        for mosquito in &mut self.mosquitoes {
            if !mosquito.is_ready_to_oviposit() {
                continue;
            }
            let female = mosquito.id();
            let target = nearest_site(&self.breeding_sites, mosquito.position())
                .filter(|(_, distance)| *distance < reach)
                .map(|(index, _)| index);
            let Some((mother, father)) = mosquito.deposit_eggs() else {
                continue;
            };

            let Some(index) = target else {
                trace!(female = female.get(), "no breeding site in reach, eggs lost");
                out_events.push(Event::EggsLost { female });
                continue;
            };

            let site = &mut self.breeding_sites[index];
            let location = site.location();
            for _ in 0..clutch {
                let genotype = inherit(&mut self.rng, mother, father);
                let id = self.ids.allocate();
                let mut pupa = Pupa::spawn(id, genotype, location, &mut self.rng);
                pupa.set_density_dependent_mortality(density_dependent);
                site.add(pupa);
            }
            site.flash();

            debug!(
                female = female.get(),
                site = site.id().get(),
                clutch,
                "eggs deposited"
            );
            out_events.push(Event::EggsDeposited {
                female,
                site: site.id(),
                clutch,
            });
        }
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let pairs = self
            .index
            .pairs(&self.mosquitoes, self.config.width, self.config.height);
        let mating = self.config.mating_probability;

        for ContactPair { first, second } in pairs {
            let (a, b) = pair_mut(&mut self.mosquitoes, first, second);
            bounce(a, b, &mut self.rng);

            if a.gender() == b.gender() {
                continue;
            }
            let (female, male) = if a.gender() == Gender::Female {
                (a, b)
            } else {
                (b, a)
            };
            if female.is_fertile() && male.is_fertile() && mating.sample(&mut self.rng) {
                let maternal = female.genotype();
                let paternal = male.genotype();
                female.mate(paternal);
                male.mate(maternal);
                out_events.push(Event::Mated {
                    female: female.id(),
                    male: male.id(),
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });

            world.advance_breeding_sites(out_events);
            if let Some(count) = world.schedule.advance().filter(|count| *count > 0) {
                world.release(count, out_events);
            }
            world.advance_mosquitoes(out_events);
            world.deposit_eggs(out_events);
            world.resolve_contacts(out_events);

            let counts = query::population(world);
            trace!(
                tick = world.tick_index,
                total = counts.total,
                males = counts.males,
                females = counts.females,
                "tick resolved"
            );
            out_events.push(Event::PopulationCounted { counts });
        }
        Command::ReleaseMosquitoes { count } => {
            world.schedule.restart_interval();
            world.release(count, out_events);
        }
        Command::ClearBreedingSites => {
            let cleared: usize = world.breeding_sites.iter_mut().map(BreedingSite::clear).sum();
            debug!(cleared, "cleared breeding sites");
        }
    }
}

fn nearest_site(sites: &[BreedingSite], from: Position) -> Option<(usize, f64)> {
    sites
        .iter()
        .enumerate()
        .map(|(index, site)| (index, site.location().distance(from)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        (&mut head[first], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(first);
        (&mut tail[0], &mut head[second])
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use mosquito_sim_core::{
        AgentId, BreedingSiteId, Gender, Genotype, PopulationCounts, Position, TICKS_PER_DAY,
    };
    use mosquito_sim_system_release::ReleaseSchedule;

    use super::{BreedingSite, Mosquito, World};

    /// Number of ticks completed so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Simulated days elapsed so far.
    #[must_use]
    pub fn day(world: &World) -> f64 {
        world.tick_index as f64 / f64::from(TICKS_PER_DAY)
    }

    /// Aggregate counters of the live adult population.
    #[must_use]
    pub fn population(world: &World) -> PopulationCounts {
        PopulationCounts::tally(
            world
                .mosquitoes
                .iter()
                .map(|mosquito| (mosquito.gender(), mosquito.genotype())),
        )
    }

    /// Live adults in allocation order.
    #[must_use]
    pub fn mosquitoes(world: &World) -> &[Mosquito] {
        &world.mosquitoes
    }

    /// Breeding sites in identifier order.
    #[must_use]
    pub fn breeding_sites(world: &World) -> &[BreedingSite] {
        &world.breeding_sites
    }

    /// Total number of immature individuals across all breeding sites.
    #[must_use]
    pub fn pupa_count(world: &World) -> usize {
        world
            .breeding_sites
            .iter()
            .map(|site| site.pupae().len())
            .sum()
    }

    /// Progress of the scheduled releases.
    #[must_use]
    pub fn release_schedule(world: &World) -> &ReleaseSchedule {
        &world.schedule
    }

    /// Captures an owned copy of the most recently completed tick.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            tick: tick(world),
            day: day(world),
            counts: population(world),
            mosquitoes: world
                .mosquitoes
                .iter()
                .map(|mosquito| MosquitoSnapshot {
                    id: mosquito.id(),
                    position: mosquito.position(),
                    heading: mosquito.heading(),
                    speed: mosquito.speed(),
                    radius: mosquito.radius(),
                    gender: mosquito.gender(),
                    genotype: mosquito.genotype(),
                    carrying_eggs: mosquito.is_carrying_eggs(),
                })
                .collect(),
            breeding_sites: world
                .breeding_sites
                .iter()
                .map(|site| BreedingSiteSnapshot {
                    id: site.id(),
                    location: site.location(),
                    pupae: site.pupae().len(),
                    flashing: site.is_flashing(),
                })
                .collect(),
        }
    }

    /// Owned view of the world that can be handed to another thread.
    #[derive(Clone, Debug, PartialEq)]
    pub struct WorldSnapshot {
        /// Tick the snapshot was taken after.
        pub tick: u64,
        /// Simulated day the snapshot was taken at.
        pub day: f64,
        /// Aggregate counters of the adult population.
        pub counts: PopulationCounts,
        /// Every live adult.
        pub mosquitoes: Vec<MosquitoSnapshot>,
        /// Every breeding site.
        pub breeding_sites: Vec<BreedingSiteSnapshot>,
    }

    /// Rendering-relevant state of a single adult.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct MosquitoSnapshot {
        /// Identity tag of the adult.
        pub id: AgentId,
        /// Current location.
        pub position: Position,
        /// Direction of flight in radians.
        pub heading: f64,
        /// Distance flown per tick.
        pub speed: f64,
        /// Radius of the body.
        pub radius: f64,
        /// Gender of the adult.
        pub gender: Gender,
        /// Genotype of the adult.
        pub genotype: Genotype,
        /// Whether the adult carries fertilised eggs.
        pub carrying_eggs: bool,
    }

    /// Rendering-relevant state of a single breeding site.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BreedingSiteSnapshot {
        /// Identifier of the site.
        pub id: BreedingSiteId,
        /// Location of the site.
        pub location: Position,
        /// Immature individuals held by the site.
        pub pupae: usize,
        /// Whether the site recently received a clutch.
        pub flashing: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosquito_sim_core::{PopulationCounts, Probability};

    fn quiet_config() -> Config {
        Config {
            initial_population: 0,
            breeding_sites: 0,
            mortality: MortalityConfig::disabled(),
            release: ReleaseConfig {
                count: 0,
                ..ReleaseConfig::default()
            },
            ..Config::default()
        }
    }

    fn adult_state(gender: Gender, genotype: Genotype, x: f64, y: f64) -> MosquitoState {
        MosquitoState {
            radius: 3.0,
            speed: 6.0,
            position: Position::new(x, y),
            birth_location: Position::new(x, y),
            age: 10.0,
            gender,
            genotype,
            heading: 0.0,
            days_since_oviposition: 3.5,
            mating_count: 0,
            days_carrying_eggs: 0.0,
            carrying_eggs: false,
            mate_genotype: None,
        }
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick, &mut events);
        events
    }

    #[test]
    fn invalid_configuration_is_refused() {
        let config = Config {
            height: -1.0,
            ..Config::default()
        };
        assert!(World::new(config).is_err());
    }

    #[test]
    fn bootstrap_seeds_wild_type_population() {
        let config = Config {
            initial_population: 200,
            breeding_sites: 10,
            ..Config::default()
        };
        let world = World::new(config).expect("valid config");

        let counts = query::population(&world);
        assert_eq!(counts.total, 200);
        assert_eq!(counts.homozygous_recessive, 200);
        assert!(counts.males > 50 && counts.females > 50);
        assert_eq!(query::breeding_sites(&world).len(), 10);
        assert_eq!(query::pupa_count(&world), 10 * (200 / 10 * 5));
        assert!(query::mosquitoes(&world)
            .iter()
            .all(|mosquito| mosquito.age() < BOOTSTRAP_MAX_ADULT_AGE));
    }

    #[test]
    fn identity_tags_are_strictly_increasing() {
        let mut world = World::empty(quiet_config()).expect("valid config");
        let first = world.insert_mosquito(adult_state(
            Gender::Male,
            Genotype::HomozygousDominant,
            10.0,
            10.0,
        ));
        let site = world.add_breeding_site(Position::new(50.0, 50.0));
        let second = world
            .insert_pupa(
                site,
                PupaState {
                    age: 1.0,
                    larval_duration: 9.7,
                    gender: Gender::Male,
                    genotype: Genotype::Heterozygous,
                    birth_location: Position::new(50.0, 50.0),
                },
            )
            .expect("site exists");
        assert!(second > first);
        assert!(world
            .insert_pupa(
                BreedingSiteId::new(7),
                PupaState {
                    age: 1.0,
                    larval_duration: 9.7,
                    gender: Gender::Male,
                    genotype: Genotype::Heterozygous,
                    birth_location: Position::new(0.0, 0.0),
                },
            )
            .is_none());
    }

    #[test]
    fn tick_publishes_time_and_counts() {
        let mut world = World::empty(quiet_config()).expect("valid config");
        let events = tick(&mut world);
        assert_eq!(events.first(), Some(&Event::TimeAdvanced { tick: 1 }));
        assert_eq!(
            events.last(),
            Some(&Event::PopulationCounted {
                counts: PopulationCounts::default()
            })
        );
        assert_eq!(query::tick(&world), 1);
    }

    #[test]
    fn female_lethal_trait_kills_engineered_females_only() {
        let config = Config {
            female_lethal: true,
            ..quiet_config()
        };
        let mut world = World::empty(config).expect("valid config");
        let adults = [
            (Gender::Female, Genotype::Heterozygous),
            (Gender::Female, Genotype::HomozygousDominant),
            (Gender::Female, Genotype::HomozygousRecessive),
            (Gender::Male, Genotype::HomozygousDominant),
        ];
        for (index, (gender, genotype)) in adults.into_iter().enumerate() {
            let x = 100.0 * (index + 1) as f64;
            let _ = world.insert_mosquito(adult_state(gender, genotype, x, 100.0));
        }

        let events = tick(&mut world);

        assert!(events.contains(&Event::MosquitoesDied { count: 2 }));
        let counts = query::population(&world);
        assert_eq!(counts.females, 1);
        assert_eq!(counts.males, 1);
    }

    #[test]
    fn manual_release_injects_configured_genotype() {
        let mut world = World::empty(quiet_config()).expect("valid config");
        let mut events = Vec::new();
        apply(&mut world, Command::ReleaseMosquitoes { count: 40 }, &mut events);

        assert_eq!(events, vec![Event::MosquitoesReleased { count: 40 }]);
        let counts = query::population(&world);
        assert_eq!(counts.males, 40);
        assert_eq!(counts.homozygous_dominant, 40);
        let centre = Position::new(300.0, 300.0);
        assert!(query::mosquitoes(&world).iter().all(|mosquito| {
            let offset = mosquito.birth_location();
            (offset.x() - centre.x()).abs() <= 50.0 && (offset.y() - centre.y()).abs() <= 50.0
        }));
        assert_eq!(query::release_schedule(&world).performed(), 0);
    }

    #[test]
    fn manual_release_postpones_next_scheduled_release() {
        let config = Config {
            release: ReleaseConfig {
                count: 3,
                interval_days: 1.0,
                per_release: 10,
                ..ReleaseConfig::default()
            },
            ..quiet_config()
        };
        let mut world = World::empty(config).expect("valid config");

        let mut scheduled = Vec::new();
        for step in 1..=100_u64 {
            if step == 10 {
                let mut events = Vec::new();
                apply(&mut world, Command::ReleaseMosquitoes { count: 5 }, &mut events);
            }
            if tick(&mut world).contains(&Event::MosquitoesReleased { count: 10 }) {
                scheduled.push(query::tick(&world));
            }
        }

        assert_eq!(scheduled, vec![1, 39, 69]);
        assert_eq!(query::population(&world).total, 35);
    }

    #[test]
    fn clearing_breeding_sites_removes_every_pupa() {
        let config = Config {
            initial_population: 10,
            breeding_sites: 4,
            ..Config::default()
        };
        let mut world = World::new(config).expect("valid config");
        assert!(query::pupa_count(&world) > 0);

        let mut events = Vec::new();
        apply(&mut world, Command::ClearBreedingSites, &mut events);
        assert_eq!(query::pupa_count(&world), 0);
        assert_eq!(query::breeding_sites(&world).len(), 4);
    }

    #[test]
    fn touching_pair_of_same_gender_bounces_without_mating() {
        let mut world = World::empty(quiet_config()).expect("valid config");
        let mut left = adult_state(Gender::Male, Genotype::HomozygousRecessive, 100.0, 100.0);
        left.speed = 0.0;
        let mut right = adult_state(Gender::Male, Genotype::HomozygousRecessive, 104.0, 100.0);
        right.speed = 0.0;
        let _ = world.insert_mosquito(left);
        let _ = world.insert_mosquito(right);

        let events = tick(&mut world);

        assert!(!events.iter().any(|event| matches!(event, Event::Mated { .. })));
        let adults = query::mosquitoes(&world);
        assert!(adults[0].position().distance(adults[1].position()) >= 6.0);
    }

    #[test]
    fn zero_mating_probability_prevents_mating() {
        let config = Config {
            mating_probability: Probability::NEVER,
            ..quiet_config()
        };
        let mut world = World::empty(config).expect("valid config");
        let mut male = adult_state(Gender::Male, Genotype::HomozygousDominant, 100.0, 100.0);
        male.speed = 0.0;
        let mut female = adult_state(Gender::Female, Genotype::HomozygousRecessive, 104.0, 100.0);
        female.speed = 0.0;
        let _ = world.insert_mosquito(male);
        let _ = world.insert_mosquito(female);

        let events = tick(&mut world);

        assert!(!events.iter().any(|event| matches!(event, Event::Mated { .. })));
        assert!(query::mosquitoes(&world).iter().all(|m| m.mating_count() == 0));
    }

    #[test]
    fn eggs_are_lost_without_reachable_site() {
        let mut world = World::empty(quiet_config()).expect("valid config");
        let _ = world.add_breeding_site(Position::new(500.0, 500.0));
        let mut female = adult_state(Gender::Female, Genotype::HomozygousRecessive, 100.0, 100.0);
        female.speed = 0.0;
        female.carrying_eggs = true;
        female.days_carrying_eggs = 2.5;
        female.mate_genotype = Some(Genotype::HomozygousDominant);
        let id = world.insert_mosquito(female);

        let events = tick(&mut world);

        assert!(events.contains(&Event::EggsLost { female: id }));
        assert_eq!(query::pupa_count(&world), 0);
        assert!(!query::mosquitoes(&world)[0].is_carrying_eggs());
    }

    #[test]
    fn snapshot_is_owned_and_sendable() {
        fn assert_send<T: Send + Clone>(_: &T) {}

        let config = Config {
            initial_population: 20,
            breeding_sites: 3,
            ..Config::default()
        };
        let mut world = World::new(config).expect("valid config");
        let _ = tick(&mut world);
        let snapshot = query::snapshot(&world);
        assert_send(&snapshot);

        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.counts, query::population(&world));
        assert_eq!(snapshot.mosquitoes.len(), snapshot.counts.total);
        assert_eq!(snapshot.breeding_sites.len(), 3);
    }
}
