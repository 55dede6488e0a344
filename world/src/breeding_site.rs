//! Breeding sites holding immature individuals under carrying capacity.

use mosquito_sim_core::{BreedingSiteId, Position, Probability, Stage};
use rand::Rng;

use crate::{
    agent::{Agent, TickRules},
    config::CapacityConfig,
    pupa::{Pupa, PupaState},
};

/// Ticks a site keeps flashing after receiving a clutch.
pub const FLASH_DURATION_TICKS: u32 = 5;

/// Rules a breeding site applies to its occupants every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiteRules {
    /// Density-independent death chance of each occupant.
    pub mortality: Probability,
    /// Per-stage carrying capacities.
    pub capacity: CapacityConfig,
}

/// Persisted description of a breeding site.
#[derive(Clone, Debug, PartialEq)]
pub struct BreedingSiteState {
    /// Location of the site.
    pub location: Position,
    /// Immature individuals held by the site.
    pub pupae: Vec<PupaState>,
}

/// Fixed location where immature individuals develop.
#[derive(Clone, Debug, PartialEq)]
pub struct BreedingSite {
    id: BreedingSiteId,
    location: Position,
    pupae: Vec<Pupa>,
    flash_ticks_remaining: u32,
}

impl BreedingSite {
    /// Creates an empty site.
    #[must_use]
    pub fn new(id: BreedingSiteId, location: Position) -> Self {
        Self {
            id,
            location,
            pupae: Vec::new(),
            flash_ticks_remaining: 0,
        }
    }

    /// Identifier of the site.
    #[must_use]
    pub fn id(&self) -> BreedingSiteId {
        self.id
    }

    /// Location of the site.
    #[must_use]
    pub fn location(&self) -> Position {
        self.location
    }

    /// Immature individuals currently held.
    #[must_use]
    pub fn pupae(&self) -> &[Pupa] {
        &self.pupae
    }

    /// Number of held individuals in `stage`.
    #[must_use]
    pub fn count_in_stage(&self, stage: Stage) -> usize {
        self.pupae.iter().filter(|pupa| pupa.stage() == stage).count()
    }

    /// Reports whether the site recently received a clutch.
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        self.flash_ticks_remaining > 0
    }

    /// Captures the persisted description of the site.
    #[must_use]
    pub fn state(&self) -> BreedingSiteState {
        BreedingSiteState {
            location: self.location,
            pupae: self.pupae.iter().map(Pupa::state).collect(),
        }
    }

    /// Adds an immature individual.
    pub fn add(&mut self, pupa: Pupa) {
        self.pupae.push(pupa);
    }

    /// Starts the flash indicator.
    pub fn flash(&mut self) {
        self.flash_ticks_remaining = FLASH_DURATION_TICKS;
    }

    /// Advances the flash indicator and every occupant by one tick, then culls
    /// each stage down to its capacity.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rules: &SiteRules,
        tick_rules: &TickRules,
        rng: &mut R,
    ) {
        self.flash_ticks_remaining = self.flash_ticks_remaining.saturating_sub(1);

        for pupa in &mut self.pupae {
            if rules.mortality.sample(rng) {
                pupa.kill();
            }
            pupa.update(tick_rules, rng);
        }
        self.pupae.retain(Pupa::is_alive);

        self.cull(Stage::Early, rules.capacity.early, rng);
        self.cull(Stage::Late, rules.capacity.late, rng);
        self.cull(Stage::Final, Some(rules.capacity.final_stage), rng);
    }

    /// Removes and returns every occupant old enough to emerge.
    pub fn take_mature_pupae(&mut self) -> Vec<Pupa> {
        let (mature, developing): (Vec<Pupa>, Vec<Pupa>) = std::mem::take(&mut self.pupae)
            .into_iter()
            .partition(Pupa::is_mature);
        self.pupae = developing;
        mature
    }

    /// Evicts every occupant, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.pupae.len();
        self.pupae.clear();
        removed
    }

    fn cull<R: Rng + ?Sized>(&mut self, stage: Stage, capacity: Option<usize>, rng: &mut R) {
        let Some(capacity) = capacity else {
            return;
        };

        let mut members: Vec<usize> = self
            .pupae
            .iter()
            .enumerate()
            .filter(|(_, pupa)| pupa.stage() == stage)
            .map(|(index, _)| index)
            .collect();
        if members.len() <= capacity {
            return;
        }

        while members.len() > capacity {
            let chosen = rng.gen_range(0..members.len());
            let index = members.swap_remove(chosen);
            self.pupae[index].kill();
        }
        self.pupae.retain(Pupa::is_alive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosquito_sim_core::{AgentId, Gender, Genotype};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rules(capacity: CapacityConfig) -> SiteRules {
        SiteRules {
            mortality: Probability::NEVER,
            capacity,
        }
    }

    fn tick_rules() -> TickRules {
        TickRules {
            mosquito_hazard: Probability::NEVER,
        }
    }

    fn pupa_aged(id: u64, age: f64) -> Pupa {
        Pupa::from_state(
            AgentId::new(id),
            PupaState {
                age,
                larval_duration: 20.0,
                gender: Gender::Female,
                genotype: Genotype::HomozygousRecessive,
                birth_location: Position::new(0.0, 0.0),
            },
        )
    }

    #[test]
    fn final_stage_is_culled_to_capacity() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let mut site = BreedingSite::new(BreedingSiteId::new(0), Position::new(10.0, 10.0));
        for id in 0..60 {
            site.add(pupa_aged(id, 8.0));
        }
        for id in 60..70 {
            site.add(pupa_aged(id, 1.0));
        }

        site.update(&rules(CapacityConfig::default()), &tick_rules(), &mut rng);

        assert_eq!(site.count_in_stage(Stage::Final), 25);
        assert_eq!(site.count_in_stage(Stage::Early), 10);
    }

    #[test]
    fn capacity_holds_after_every_update() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut site = BreedingSite::new(BreedingSiteId::new(0), Position::new(10.0, 10.0));
        let site_rules = SiteRules {
            mortality: Probability::clamped(0.005_515_448),
            capacity: CapacityConfig::default(),
        };

        for tick in 0..400u64 {
            for offset in 0..3 {
                site.add(Pupa::spawn(
                    AgentId::new(tick * 3 + offset),
                    Genotype::Heterozygous,
                    site.location(),
                    &mut rng,
                ));
            }
            site.update(&site_rules, &tick_rules(), &mut rng);
            assert!(site.count_in_stage(Stage::Final) <= 25);
            let _ = site.take_mature_pupae();
        }
    }

    #[test]
    fn optional_stage_capacities_apply_when_configured() {
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        let mut site = BreedingSite::new(BreedingSiteId::new(0), Position::new(0.0, 0.0));
        for id in 0..30 {
            site.add(pupa_aged(id, 0.5));
            site.add(pupa_aged(100 + id, 4.0));
        }
        let capacity = CapacityConfig {
            early: Some(12),
            late: Some(7),
            final_stage: 25,
        };

        site.update(&rules(capacity), &tick_rules(), &mut rng);

        assert_eq!(site.count_in_stage(Stage::Early), 12);
        assert_eq!(site.count_in_stage(Stage::Late), 7);
    }

    #[test]
    fn flash_lasts_fixed_number_of_updates() {
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        let mut site = BreedingSite::new(BreedingSiteId::new(2), Position::new(0.0, 0.0));
        site.flash();
        let mut lit = 0;
        while site.is_flashing() {
            site.update(&rules(CapacityConfig::default()), &tick_rules(), &mut rng);
            lit += 1;
        }
        assert_eq!(lit, FLASH_DURATION_TICKS);
    }

    #[test]
    fn mature_pupae_are_removed_exactly_once() {
        let mut site = BreedingSite::new(BreedingSiteId::new(0), Position::new(0.0, 0.0));
        site.add(pupa_aged(1, 25.0));
        site.add(pupa_aged(2, 3.0));
        site.add(pupa_aged(3, 21.0));

        let mature = site.take_mature_pupae();
        assert_eq!(mature.len(), 2);
        assert_eq!(site.pupae().len(), 1);
        assert!(site.take_mature_pupae().is_empty());
    }

    #[test]
    fn clear_empties_the_site() {
        let mut site = BreedingSite::new(BreedingSiteId::new(0), Position::new(0.0, 0.0));
        site.add(pupa_aged(1, 2.0));
        site.add(pupa_aged(2, 8.0));
        assert_eq!(site.clear(), 2);
        assert!(site.pupae().is_empty());
    }
}
