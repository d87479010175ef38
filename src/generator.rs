use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;

use crate::catalogue::WorldCatalogue;
use crate::filter::{self, FilterSpec};
use crate::model::{FactionRelation, FactionTemplate, LiveFaction, WorldState};
use crate::naming;
use crate::selector;

/// Retry budget for one `generate` call.
pub const GENERATION_ATTEMPTS: usize = 20;

/// Terminal outcomes of a generation call. None of these are panics; callers
/// treat every variant as "retain previous state".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no faction templates survived filtering")]
    FilterCollapse,
    #[error("selection exhausted: no template under its cap within the draw budget")]
    SelectionExhausted,
    #[error("exceeded {GENERATION_ATTEMPTS} attempts to generate a faction")]
    AttemptsExhausted,
}

/// A transient host-side fault while instantiating a specific template.
/// The generator excludes the template and retries.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to instantiate faction from '{template}': {reason}")]
pub struct InstantiateError {
    pub template: String,
    pub reason: String,
}

/// Host seam for turning a template into a live faction. Fallible by
/// contract: instantiation failures are values, not unwound panics.
pub trait FactionInstantiator {
    fn instantiate(
        &mut self,
        template: &FactionTemplate,
        relations: Vec<FactionRelation>,
        world: &mut WorldState,
        rng: &mut dyn RngCore,
    ) -> Result<LiveFaction, InstantiateError>;
}

/// In-crate instantiator: assigns a world id, a generated display name and
/// the supplied relations.
#[derive(Debug, Default)]
pub struct DefaultInstantiator;

impl FactionInstantiator for DefaultInstantiator {
    fn instantiate(
        &mut self,
        template: &FactionTemplate,
        relations: Vec<FactionRelation>,
        world: &mut WorldState,
        rng: &mut dyn RngCore,
    ) -> Result<LiveFaction, InstantiateError> {
        let id = world.id_gen.next_id();
        let mut faction = LiveFaction::new(id, &template.def_name, naming::faction_name(rng));
        faction.natural_goodwill = template.natural_goodwill;
        faction.relations = relations;
        Ok(faction)
    }
}

/// Goodwill a template starts from: permanent enemies at -100, natural
/// enemies at -80, everyone else at 0. Random-placeholder and derived
/// templates are always 0 regardless of inherited flags.
pub fn default_goodwill(template: &FactionTemplate) -> i32 {
    if template.is_random_category() || template.is_derived() {
        return 0;
    }
    if template.permanent_enemy {
        -100
    } else if template.natural_enemy {
        -80
    } else {
        0
    }
}

/// Goodwill policy of an already-live faction: the hostility override of its
/// template wins, otherwise its own observed natural goodwill.
///
/// # Panics
/// Panics if the faction's template is not registered.
pub fn live_goodwill(faction: &LiveFaction, catalogue: &WorldCatalogue) -> i32 {
    let template = catalogue
        .template(&faction.template)
        .unwrap_or_else(|| panic!("live_goodwill: template {} not found", faction.template));
    if template.is_random_category() || template.is_derived() {
        return 0;
    }
    if template.permanent_enemy {
        -100
    } else if template.natural_enemy {
        -80
    } else {
        faction.natural_goodwill
    }
}

/// Default relations of a newly generated faction toward every existing
/// non-player faction: goodwill is the minimum of both sides' policies, the
/// relation kind follows the goodwill thresholds. Factions whose template is
/// not registered carry no goodwill policy and get no edge.
pub fn default_relations(
    template: &FactionTemplate,
    world: &WorldState,
    catalogue: &WorldCatalogue,
) -> Vec<FactionRelation> {
    let own = default_goodwill(template);
    world
        .factions
        .values()
        .filter(|f| {
            catalogue
                .template(&f.template)
                .is_some_and(|t| !t.is_player)
        })
        .map(|f| FactionRelation::new(f.id, own.min(live_goodwill(f, catalogue))))
        .collect()
}

/// Retry orchestrator: composes filtering, the capped draw, the variant roll
/// and instantiation into one bounded, crash-free generation call.
///
/// Owns a private PRNG seeded once from the world's stable creation seed;
/// every draw consumes from that single stream, so an unchanged world replays
/// the same selection sequence.
pub struct RandomFactionGenerator {
    pool: Vec<String>,
    variant_percent: u32,
    off_books: Vec<String>,
    rng: SmallRng,
}

impl RandomFactionGenerator {
    /// Builds the base pool from the catalogue (Random-category, variant-only
    /// and hard-excluded templates are never selectable) and derives the
    /// selection stream from `world_seed`.
    pub fn new(
        catalogue: &WorldCatalogue,
        world_seed: u64,
        variant_percent: u32,
        off_books: Vec<String>,
    ) -> Self {
        let pool = catalogue.selectable_base_pool();
        tracing::trace!(
            "generator constructed with {} base templates, variant chance {variant_percent}%",
            pool.len()
        );
        let mut seeder = SmallRng::seed_from_u64(world_seed);
        let rng = SmallRng::seed_from_u64(seeder.next_u64());
        Self {
            pool,
            variant_percent,
            off_books,
            rng,
        }
    }

    /// The generator's private selection stream. Exposed so the coordinator's
    /// cosmetic rolls consume from the same per-world sequence.
    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Generate one live faction from the filtered pool. Transient
    /// instantiation faults exclude the failed template and retry within the
    /// attempt budget; every terminal outcome is a `GenerateError` value.
    pub fn generate(
        &mut self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        allow_duplicates: bool,
        filters: &[FilterSpec],
        instantiator: &mut dyn FactionInstantiator,
    ) -> Result<LiveFaction, GenerateError> {
        let mut failed: BTreeSet<String> = BTreeSet::new();
        let mut chain = filters.to_vec();
        chain.push(FilterSpec::duplicates(
            world.instantiated_templates(),
            allow_duplicates,
        ));

        for attempt in 1..=GENERATION_ATTEMPTS {
            let candidates: Vec<&FactionTemplate> = self
                .pool
                .iter()
                .filter(|d| !failed.contains(*d))
                .filter_map(|d| catalogue.template(d))
                .collect();
            let filtered = filter::apply(&candidates, &chain);
            tracing::trace!("attempt {attempt}: {} templates after filtering", filtered.len());
            if filtered.is_empty() {
                tracing::warn!("filter collapse: no faction templates survived filtering");
                return Err(GenerateError::FilterCollapse);
            }

            let base = selector::draw(&filtered, world, &mut self.rng)
                .ok_or(GenerateError::SelectionExhausted)?
                .def_name
                .clone();

            let chosen = selector::maybe_promote_variant(
                &base,
                catalogue,
                self.variant_percent,
                &mut self.rng,
            )
            .unwrap_or(base);

            // The catalogue is only appended to, so the chosen id stays valid.
            let template = catalogue
                .template(&chosen)
                .unwrap_or_else(|| panic!("generate: template {chosen} not found"))
                .clone();
            let relations = default_relations(&template, world, catalogue);
            match instantiator.instantiate(&template, relations, world, &mut self.rng) {
                Ok(faction) => {
                    tracing::trace!(
                        "generated faction '{}' from template {}",
                        faction.name,
                        faction.template
                    );
                    return Ok(faction);
                }
                Err(e) => {
                    tracing::warn!("{e}; excluding template and retrying");
                    failed.insert(e.template);
                }
            }
        }

        tracing::error!("exceeded {GENERATION_ATTEMPTS} attempts to generate a faction");
        Err(GenerateError::AttemptsExhausted)
    }

    // Filter-chain profiles matching the public replacement surface. The
    // duplicate filter is appended by `generate` itself.

    fn off_books_filter(&self) -> FilterSpec {
        FilterSpec::NameIn {
            names: self.off_books.clone(),
            invert: true,
        }
    }

    /// Any visible non-player faction.
    pub fn npc_filters(&self) -> Vec<FilterSpec> {
        vec![
            FilterSpec::Player { want: false },
            FilterSpec::Hidden { want: false },
            self.off_books_filter(),
        ]
    }

    /// Visible permanent enemies.
    pub fn enemy_filters(&self) -> Vec<FilterSpec> {
        vec![
            FilterSpec::Player { want: false },
            FilterSpec::Hidden { want: false },
            self.off_books_filter(),
            FilterSpec::PermanentEnemy { want: true },
        ]
    }

    /// Visible neutral factions: neither permanent nor natural enemies.
    pub fn trader_filters(&self) -> Vec<FilterSpec> {
        vec![
            FilterSpec::Player { want: false },
            FilterSpec::Hidden { want: false },
            self.off_books_filter(),
            FilterSpec::PermanentEnemy { want: false },
            FilterSpec::NaturalEnemy { want: false },
        ]
    }

    /// Visible natural enemies that are not permanently hostile.
    pub fn warlord_filters(&self) -> Vec<FilterSpec> {
        vec![
            FilterSpec::Player { want: false },
            FilterSpec::Hidden { want: false },
            self.off_books_filter(),
            FilterSpec::PermanentEnemy { want: false },
            FilterSpec::NaturalEnemy { want: true },
        ]
    }

    /// Restrict to an explicit def-name list. Hidden templates stay eligible
    /// here: a named list is an explicit request.
    pub fn named_filters(&self, valid_names: &[String]) -> Vec<FilterSpec> {
        vec![
            FilterSpec::Player { want: false },
            self.off_books_filter(),
            FilterSpec::NameIn {
                names: valid_names.to_vec(),
                invert: false,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::ExclusionPolicy;
    use crate::model::template::CATEGORY_DERIVED;

    fn catalogue() -> WorldCatalogue {
        let mut cat = WorldCatalogue::new(ExclusionPolicy::default());
        for t in [
            FactionTemplate::new("Pirate", "pirate band")
                .permanent_enemy()
                .natural_goodwill(-100),
            FactionTemplate::new("RoughTribe", "rough tribe")
                .natural_enemy()
                .natural_goodwill(-40),
            FactionTemplate::new("CivilOutlander", "civil outlanders").natural_goodwill(20),
            FactionTemplate::new("PlayerColony", "colony").player(),
        ] {
            cat.register_template(t).unwrap();
        }
        cat
    }

    struct FlakyInstantiator {
        reject: Vec<String>,
        inner: DefaultInstantiator,
    }

    impl FactionInstantiator for FlakyInstantiator {
        fn instantiate(
            &mut self,
            template: &FactionTemplate,
            relations: Vec<FactionRelation>,
            world: &mut WorldState,
            rng: &mut dyn RngCore,
        ) -> Result<LiveFaction, InstantiateError> {
            if self.reject.contains(&template.def_name) {
                return Err(InstantiateError {
                    template: template.def_name.clone(),
                    reason: "host refused".to_string(),
                });
            }
            self.inner.instantiate(template, relations, world, rng)
        }
    }

    struct AlwaysFails;

    impl FactionInstantiator for AlwaysFails {
        fn instantiate(
            &mut self,
            template: &FactionTemplate,
            _relations: Vec<FactionRelation>,
            _world: &mut WorldState,
            _rng: &mut dyn RngCore,
        ) -> Result<LiveFaction, InstantiateError> {
            Err(InstantiateError {
                template: template.def_name.clone(),
                reason: "host down".to_string(),
            })
        }
    }

    #[test]
    fn goodwill_policy_overrides() {
        let perm = FactionTemplate::new("P", "p").permanent_enemy();
        let natural = FactionTemplate::new("N", "n").natural_enemy();
        let neutral = FactionTemplate::new("C", "c");
        let derived = FactionTemplate::new("D", "d")
            .category(CATEGORY_DERIVED)
            .permanent_enemy();
        assert_eq!(default_goodwill(&perm), -100);
        assert_eq!(default_goodwill(&natural), -80);
        assert_eq!(default_goodwill(&neutral), 0);
        assert_eq!(default_goodwill(&derived), 0);
    }

    #[test]
    fn live_goodwill_uses_observed_value_for_neutrals() {
        let cat = catalogue();
        let mut f = LiveFaction::new(1, "CivilOutlander", "The Concord".to_string());
        f.natural_goodwill = 35;
        assert_eq!(live_goodwill(&f, &cat), 35);

        let pirate = LiveFaction::new(2, "Pirate", "The Black Banner".to_string());
        assert_eq!(live_goodwill(&pirate, &cat), -100);
    }

    #[test]
    fn relations_skip_player_and_take_min() {
        let cat = catalogue();
        let mut world = WorldState::new(1);
        world.add_faction(LiveFaction::new(1, "PlayerColony", "Colony".to_string()));
        let mut civil = LiveFaction::new(2, "CivilOutlander", "The Concord".to_string());
        civil.natural_goodwill = 20;
        world.add_faction(civil);
        world.add_faction(LiveFaction::new(3, "Pirate", "Black Banner".to_string()));

        let template = cat.template("RoughTribe").unwrap();
        let relations = default_relations(template, &world, &cat);
        assert_eq!(relations.len(), 2);
        let toward_civil = relations.iter().find(|r| r.other == 2).unwrap();
        assert_eq!(toward_civil.goodwill, -80);
        assert_eq!(toward_civil.kind, crate::model::RelationKind::Hostile);
        let toward_pirate = relations.iter().find(|r| r.other == 3).unwrap();
        assert_eq!(toward_pirate.goodwill, -100);
    }

    #[test]
    fn relations_skip_factions_with_unregistered_templates() {
        let cat = catalogue();
        let mut world = WorldState::new(1);
        world.add_faction(LiveFaction::new(1, "Ghost", "The Forgotten".to_string()));
        world.add_faction(LiveFaction::new(2, "Pirate", "Black Banner".to_string()));

        let template = cat.template("RoughTribe").unwrap();
        let relations = default_relations(template, &world, &cat);
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].other, 2);
    }

    #[test]
    fn generate_is_deterministic_per_seed() {
        for seed in [1u64, 77, 4096] {
            let mut names = Vec::new();
            for _ in 0..2 {
                let mut cat = catalogue();
                let mut world = WorldState::new(seed);
                let mut generator = RandomFactionGenerator::new(&cat, seed, 0, Vec::new());
                let mut inst = DefaultInstantiator;
                let mut sequence = Vec::new();
                for _ in 0..3 {
                    let filters = generator.npc_filters();
                    let faction = generator
                        .generate(&mut world, &mut cat, true, &filters, &mut inst)
                        .unwrap();
                    sequence.push(faction.template.clone());
                    world.add_faction(faction);
                }
                names.push(sequence);
            }
            assert_eq!(names[0], names[1], "seed {seed} diverged");
        }
    }

    #[test]
    fn filter_collapse_when_nothing_survives() {
        let mut cat = catalogue();
        let mut world = WorldState::new(1);
        let mut generator = RandomFactionGenerator::new(&cat, 1, 0, Vec::new());
        let mut inst = DefaultInstantiator;
        let filters = vec![FilterSpec::NameIn {
            names: vec!["DoesNotExist".to_string()],
            invert: false,
        }];
        assert_eq!(
            generator.generate(&mut world, &mut cat, false, &filters, &mut inst),
            Err(GenerateError::FilterCollapse)
        );
    }

    #[test]
    fn transient_failure_excludes_template_and_retries() {
        let mut cat = catalogue();
        let mut world = WorldState::new(1);
        let mut generator = RandomFactionGenerator::new(&cat, 9, 0, Vec::new());
        let mut inst = FlakyInstantiator {
            reject: vec!["Pirate".to_string(), "RoughTribe".to_string()],
            inner: DefaultInstantiator,
        };
        let filters = generator.npc_filters();
        let faction = generator
            .generate(&mut world, &mut cat, false, &filters, &mut inst)
            .unwrap();
        assert_eq!(faction.template, "CivilOutlander");
    }

    #[test]
    fn all_templates_failing_collapses_within_budget() {
        let mut cat = catalogue();
        let mut world = WorldState::new(1);
        let mut generator = RandomFactionGenerator::new(&cat, 9, 0, Vec::new());
        let mut inst = AlwaysFails;
        let filters = generator.npc_filters();
        let err = generator
            .generate(&mut world, &mut cat, false, &filters, &mut inst)
            .unwrap_err();
        // Every candidate ends up excluded, so the pool collapses before the
        // attempt budget can run out.
        assert_eq!(err, GenerateError::FilterCollapse);
    }

    #[test]
    fn cap_enforced_across_generations() {
        let mut cat = WorldCatalogue::new(ExclusionPolicy::default());
        cat.register_template(
            FactionTemplate::new("Capped", "capped").max_at_world_creation(2),
        )
        .unwrap();
        let mut world = WorldState::new(1);
        let mut generator = RandomFactionGenerator::new(&cat, 3, 0, Vec::new());
        let mut inst = DefaultInstantiator;

        for _ in 0..2 {
            let filters = generator.npc_filters();
            let faction = generator
                .generate(&mut world, &mut cat, true, &filters, &mut inst)
                .unwrap();
            world.add_faction(faction);
        }
        assert_eq!(world.live_count_for("Capped"), 2);

        let filters = generator.npc_filters();
        assert_eq!(
            generator.generate(&mut world, &mut cat, true, &filters, &mut inst),
            Err(GenerateError::SelectionExhausted)
        );
    }

    #[test]
    fn off_books_names_are_never_selected() {
        let mut cat = catalogue();
        let mut world = WorldState::new(1);
        let mut generator = RandomFactionGenerator::new(
            &cat,
            5,
            0,
            vec!["Pirate".to_string(), "RoughTribe".to_string()],
        );
        let mut inst = DefaultInstantiator;
        for _ in 0..10 {
            let filters = generator.npc_filters();
            let faction = generator
                .generate(&mut world, &mut cat, true, &filters, &mut inst)
                .unwrap();
            assert_eq!(faction.template, "CivilOutlander");
        }
    }
}
