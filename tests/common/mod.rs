use faction_gen::model::template::CATEGORY_RANDOM;
use faction_gen::model::{AttributeGene, VariantTemplate};
use faction_gen::{ExclusionPolicy, FactionTemplate, LiveFaction, WorldCatalogue, WorldState};

/// Exclusion data mirroring a small modded game: one hard-excluded empire,
/// one pre-existing (base, variant) combination with an override mapping,
/// one pair block and one pacifist variant.
pub fn fixture_policy() -> ExclusionPolicy {
    let mut policy = ExclusionPolicy::default();
    policy.hard_excluded.insert("Empire".to_string());
    policy.variant_only.insert("RidgebornPirate".to_string());
    policy
        .blocked_pairs
        .entry("CivilTribe".to_string())
        .or_default()
        .insert("Duneborn".to_string());
    policy.overrides.insert(
        ("Pirate".to_string(), "Ridgeborn".to_string()),
        "RidgebornPirate".to_string(),
    );
    policy
}

pub fn build_catalogue() -> WorldCatalogue {
    let mut cat = WorldCatalogue::new(fixture_policy());
    for t in [
        FactionTemplate::new("PlayerColony", "colony").player(),
        FactionTemplate::new("Pirate", "pirate band")
            .permanent_enemy()
            .natural_goodwill(-100)
            .settlement_namer("default"),
        FactionTemplate::new("RoughOutlander", "rough outlanders")
            .natural_enemy()
            .natural_goodwill(-40)
            .settlement_namer("default"),
        FactionTemplate::new("CivilOutlander", "civil outlanders")
            .natural_goodwill(20)
            .settlement_namer("default"),
        FactionTemplate::new("RoughTribe", "rough tribe")
            .natural_enemy()
            .settlement_namer("default"),
        FactionTemplate::new("CivilTribe", "civil tribe").settlement_namer("default"),
        FactionTemplate::new("Empire", "empire").max_at_world_creation(1),
        FactionTemplate::new("Cultists", "cultists").hidden().permanent_enemy(),
        FactionTemplate::new("RandomNpc", "unknown faction")
            .category(CATEGORY_RANDOM)
            .starting_count(5),
        FactionTemplate::new("RidgebornPirate", "ridgeborn pirate band")
            .permanent_enemy()
            .settlement_namer("default"),
    ] {
        cat.register_template(t).unwrap();
    }

    for v in [
        VariantTemplate::new("Ridgeborn", "ridgeborn"),
        VariantTemplate::new("Duneborn", "duneborn"),
        VariantTemplate::new("Meek", "meek")
            .with_attributes(vec![AttributeGene::new("Pacifist", true)]),
    ] {
        cat.register_variant(v).unwrap();
    }
    cat
}

pub fn spawn_faction(world: &mut WorldState, template: &str, name: &str) -> u64 {
    let id = world.id_gen.next_id();
    world.add_faction(LiveFaction::new(id, template, name.to_string()));
    id
}

/// World with a player colony, a civil tribe holding two settlements and a
/// pirate band holding one.
pub fn build_world(seed: u64) -> (WorldState, u64, u64) {
    let mut world = WorldState::new(seed);
    spawn_faction(&mut world, "PlayerColony", "New Dawn");
    let tribe = spawn_faction(&mut world, "CivilTribe", "The Old Dominion");
    world.add_settlement("First Camp", tribe);
    world.add_settlement("Second Camp", tribe);
    let pirates = spawn_faction(&mut world, "Pirate", "The Black Banner");
    world.add_settlement("The Cove", pirates);
    (world, tribe, pirates)
}
