use std::collections::BTreeSet;

use rand::Rng;
use rand::RngCore;

use crate::catalogue::WorldCatalogue;
use crate::config::FlavorNaming;
use crate::generator::{FactionInstantiator, RandomFactionGenerator};
use crate::model::{FactionRelation, LiveFaction, WorldState};
use crate::naming::NameService;

/// Commits the observable state transition of a replacement: retire the old
/// faction, register the new one, move the settlements over. The designed
/// failure-absorption point: a missing new faction degrades to a logged no-op
/// so a failed generation never aborts the surrounding pipeline.
pub struct ReplacementCoordinator {
    flavor: FlavorNaming,
}

impl ReplacementCoordinator {
    pub fn new(flavor: FlavorNaming) -> Self {
        Self { flavor }
    }

    /// Swap `old_id` for `new`. With `new == None` the world is left
    /// untouched. The insert of the new faction is idempotent, keyed by id.
    pub fn replace(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        old_id: u64,
        new: Option<LiveFaction>,
        namer: &mut dyn NameService,
        rng: &mut dyn RngCore,
    ) {
        if !world.contains_faction(old_id) {
            tracing::warn!("replace called with unknown faction id {old_id}, aborting");
            return;
        }
        let Some(mut new) = new else {
            tracing::warn!("no replacement was generated for faction {old_id}, retaining it");
            return;
        };

        // Cosmetic rename, gated to one template tag.
        if new.template.contains(&self.flavor.faction_tag)
            && !self.flavor.faction_names.is_empty()
            && rng.random::<f64>() < self.flavor.chance
        {
            let picked =
                &self.flavor.faction_names[rng.random_range(0..self.flavor.faction_names.len())];
            tracing::trace!("renaming faction '{}' to curated '{picked}'", new.name);
            new.name = picked.clone();
        }

        let new_id = new.id;
        let new_template = new.template.clone();
        let old_template = world.factions[&old_id].template.clone();
        let relations = new.relations.clone();
        tracing::trace!(
            "replacing faction {old_id} ({old_template}) with {new_id} ({new_template})"
        );

        // Register first so settlement ownership always resolves; the insert
        // itself is the idempotent membership check.
        if world.add_faction(new) {
            tracing::trace!("new faction {new_id} added to the world");
        }
        mirror_relations(world, new_id, &relations);

        let policy = catalogue
            .template(&new_template)
            .and_then(|t| t.settlement_namer.clone());
        let mut used: BTreeSet<String> = BTreeSet::new();
        let mut reassigned = 0usize;
        for sid in world.settlements_of(old_id) {
            world.reassign_settlement(sid, new_id);
            reassigned += 1;

            let name = if !self.flavor.settlement_names.is_empty()
                && rng.random::<f64>() < self.flavor.chance
            {
                let n = &self.flavor.settlement_names
                    [rng.random_range(0..self.flavor.settlement_names.len())];
                tracing::trace!("using curated settlement name '{n}'");
                Some(n.clone())
            } else {
                policy
                    .as_deref()
                    .and_then(|p| namer.settlement_name(p, &used, rng))
            };
            if let Some(name) = name {
                world.rename_settlement(sid, &name);
                used.insert(name);
            }
        }
        tracing::trace!("{reassigned} settlements reassigned from faction {old_id} to {new_id}");

        // Retire, never delete: relation history stays intact.
        if let Some(old) = world.factions.get_mut(&old_id) {
            old.defeated = true;
        }
        catalogue.hide(&old_template);
    }

    /// Replace with any visible NPC faction.
    pub fn replace_with_random_faction(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        old_id: u64,
        allow_duplicates: bool,
        namer: &mut dyn NameService,
        instantiator: &mut dyn FactionInstantiator,
    ) {
        let filters = generator.npc_filters();
        let new = self.generate_absorbing(
            world,
            catalogue,
            generator,
            allow_duplicates,
            &filters,
            instantiator,
        );
        self.commit(world, catalogue, generator, old_id, new, namer);
    }

    /// Replace with a visible permanent-enemy faction.
    pub fn replace_with_random_enemy_faction(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        old_id: u64,
        allow_duplicates: bool,
        namer: &mut dyn NameService,
        instantiator: &mut dyn FactionInstantiator,
    ) {
        let filters = generator.enemy_filters();
        let new = self.generate_absorbing(
            world,
            catalogue,
            generator,
            allow_duplicates,
            &filters,
            instantiator,
        );
        self.commit(world, catalogue, generator, old_id, new, namer);
    }

    /// Replace with a visible neutral (trade-capable) faction.
    pub fn replace_with_random_trader_faction(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        old_id: u64,
        allow_duplicates: bool,
        namer: &mut dyn NameService,
        instantiator: &mut dyn FactionInstantiator,
    ) {
        let filters = generator.trader_filters();
        let new = self.generate_absorbing(
            world,
            catalogue,
            generator,
            allow_duplicates,
            &filters,
            instantiator,
        );
        self.commit(world, catalogue, generator, old_id, new, namer);
    }

    /// Replace with a visible natural-enemy (raiding but not irreconcilable)
    /// faction.
    pub fn replace_with_random_warlord_faction(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        old_id: u64,
        allow_duplicates: bool,
        namer: &mut dyn NameService,
        instantiator: &mut dyn FactionInstantiator,
    ) {
        let filters = generator.warlord_filters();
        let new = self.generate_absorbing(
            world,
            catalogue,
            generator,
            allow_duplicates,
            &filters,
            instantiator,
        );
        self.commit(world, catalogue, generator, old_id, new, namer);
    }

    /// Replace with a faction drawn from an explicit template list.
    pub fn replace_with_named_faction(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        old_id: u64,
        allow_duplicates: bool,
        valid_names: &[String],
        namer: &mut dyn NameService,
        instantiator: &mut dyn FactionInstantiator,
    ) {
        let filters = generator.named_filters(valid_names);
        let new = self.generate_absorbing(
            world,
            catalogue,
            generator,
            allow_duplicates,
            &filters,
            instantiator,
        );
        self.commit(world, catalogue, generator, old_id, new, namer);
    }

    fn generate_absorbing(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        allow_duplicates: bool,
        filters: &[crate::filter::FilterSpec],
        instantiator: &mut dyn FactionInstantiator,
    ) -> Option<LiveFaction> {
        match generator.generate(world, catalogue, allow_duplicates, filters, instantiator) {
            Ok(faction) => Some(faction),
            Err(e) => {
                tracing::warn!("generation failed: {e}");
                None
            }
        }
    }

    fn commit(
        &self,
        world: &mut WorldState,
        catalogue: &mut WorldCatalogue,
        generator: &mut RandomFactionGenerator,
        old_id: u64,
        new: Option<LiveFaction>,
        namer: &mut dyn NameService,
    ) {
        self.replace(world, catalogue, old_id, new, namer, generator.rng_mut());
    }
}

/// Reflect the new faction's relation edges onto the factions they point at,
/// skipping edges that already exist.
fn mirror_relations(world: &mut WorldState, new_id: u64, relations: &[FactionRelation]) {
    for rel in relations {
        if rel.other == new_id {
            continue;
        }
        if let Some(other) = world.factions.get_mut(&rel.other) {
            if other.relation_with(new_id).is_none() {
                let mut back = *rel;
                back.other = new_id;
                other.relations.push(back);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::catalogue::ExclusionPolicy;
    use crate::model::{FactionTemplate, RelationKind};
    use crate::naming::WordlistNamer;

    fn setup() -> (WorldState, WorldCatalogue) {
        let mut cat = WorldCatalogue::new(ExclusionPolicy::default());
        cat.register_template(
            FactionTemplate::new("Pirate", "pirate band").settlement_namer("default"),
        )
        .unwrap();
        cat.register_template(
            FactionTemplate::new("Tribe", "tribe").settlement_namer("default"),
        )
        .unwrap();

        let mut world = WorldState::new(11);
        world.add_faction(LiveFaction::new(1, "Tribe", "The Old Tribe".to_string()));
        world.add_settlement("First Camp", 1);
        world.add_settlement("Second Camp", 1);
        (world, cat)
    }

    fn no_flavor() -> ReplacementCoordinator {
        ReplacementCoordinator::new(FlavorNaming {
            chance: 0.0,
            ..FlavorNaming::default()
        })
    }

    #[test]
    fn absent_replacement_is_a_no_op() {
        let (mut world, mut cat) = setup();
        let before_settlements = world.settlements.clone();
        let mut namer = WordlistNamer::new();
        let mut rng = SmallRng::seed_from_u64(2);

        no_flavor().replace(&mut world, &mut cat, 1, None, &mut namer, &mut rng);

        assert_eq!(world.factions.len(), 1);
        assert!(!world.factions[&1].defeated);
        assert_eq!(world.settlements, before_settlements);
        assert!(!cat.template("Tribe").unwrap().hidden);
    }

    #[test]
    fn replacement_moves_settlements_and_retires_old() {
        let (mut world, mut cat) = setup();
        let mut namer = WordlistNamer::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let new = LiveFaction::new(50, "Pirate", "The Black Banner".to_string());

        no_flavor().replace(&mut world, &mut cat, 1, Some(new), &mut namer, &mut rng);

        assert!(world.contains_faction(50));
        assert!(world.factions[&1].defeated);
        assert!(cat.template("Tribe").unwrap().hidden);
        assert!(world.settlements_of(1).is_empty());
        assert_eq!(world.settlements_of(50).len(), 2);

        // Renamed, and unique within the batch.
        let names: Vec<&str> = world.settlements.values().map(|s| s.name.as_str()).collect();
        assert!(!names.contains(&"First Camp"));
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn no_naming_policy_keeps_settlement_names() {
        let (mut world, mut cat) = setup();
        cat.register_template(FactionTemplate::new("Nameless", "nameless"))
            .unwrap();
        let mut namer = WordlistNamer::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let new = LiveFaction::new(50, "Nameless", "The Quiet Ones".to_string());

        no_flavor().replace(&mut world, &mut cat, 1, Some(new), &mut namer, &mut rng);

        let names: Vec<&str> = world.settlements.values().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"First Camp"));
        assert!(names.contains(&"Second Camp"));
        assert_eq!(world.settlements_of(50).len(), 2);
    }

    #[test]
    fn relations_are_mirrored_onto_existing_factions() {
        let (mut world, mut cat) = setup();
        cat.register_template(FactionTemplate::new("Outlander", "outlanders"))
            .unwrap();
        world.add_faction(LiveFaction::new(2, "Outlander", "The Concord".to_string()));

        let mut new = LiveFaction::new(50, "Pirate", "The Black Banner".to_string());
        new.relations.push(FactionRelation::new(2, -90));
        let mut namer = WordlistNamer::new();
        let mut rng = SmallRng::seed_from_u64(2);

        no_flavor().replace(&mut world, &mut cat, 1, Some(new), &mut namer, &mut rng);

        let back = world.factions[&2].relation_with(50).unwrap();
        assert_eq!(back.goodwill, -90);
        assert_eq!(back.kind, RelationKind::Hostile);
    }

    #[test]
    fn curated_rename_applies_with_forced_chance() {
        let (mut world, mut cat) = setup();
        let coordinator = ReplacementCoordinator::new(FlavorNaming {
            chance: 1.0,
            faction_tag: "Pirate".to_string(),
            faction_names: vec!["Wolf's Dragoons".to_string()],
            settlement_names: vec!["Serenity Valley".to_string()],
        });
        let mut namer = WordlistNamer::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let new = LiveFaction::new(50, "Pirate", "The Black Banner".to_string());

        coordinator.replace(&mut world, &mut cat, 1, Some(new), &mut namer, &mut rng);

        assert_eq!(world.factions[&50].name, "Wolf's Dragoons");
        // Both settlements hit the single curated name; only the first rename
        // can claim it, the second comes from the same list regardless.
        for s in world.settlements.values() {
            assert_eq!(s.name, "Serenity Valley");
        }
    }

    #[test]
    fn rename_gate_requires_matching_tag() {
        let (mut world, mut cat) = setup();
        let coordinator = ReplacementCoordinator::new(FlavorNaming {
            chance: 1.0,
            faction_tag: "Pirate".to_string(),
            faction_names: vec!["Wolf's Dragoons".to_string()],
            settlement_names: Vec::new(),
        });
        cat.register_template(FactionTemplate::new("Outlander", "outlanders"))
            .unwrap();
        let mut namer = WordlistNamer::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let new = LiveFaction::new(50, "Outlander", "The Concord".to_string());

        coordinator.replace(&mut world, &mut cat, 1, Some(new), &mut namer, &mut rng);

        assert_eq!(world.factions[&50].name, "The Concord");
    }
}
