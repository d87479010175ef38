use faction_gen::model::template::CATEGORY_RANDOM;
use faction_gen::synth::synthesize_variant_templates;
use faction_gen::{
    DefaultInstantiator, ExclusionPolicy, FactionTemplate, RandomFactionGenerator,
    ReplacementCoordinator, Settings, StartCountPolicy, VariantTemplate, WordlistNamer,
    WorldCatalogue, WorldState,
};

fn main() {
    let settings = Settings::default();

    let mut cat = WorldCatalogue::new(ExclusionPolicy::default());
    for t in [
        FactionTemplate::new("PlayerColony", "colony").player(),
        FactionTemplate::new("Pirate", "pirate band")
            .permanent_enemy()
            .natural_goodwill(-100)
            .starting_count(1)
            .settlement_namer("default"),
        FactionTemplate::new("RoughTribe", "rough tribe")
            .natural_enemy()
            .starting_count(2)
            .settlement_namer("default"),
        FactionTemplate::new("CivilOutlander", "civil outlanders")
            .natural_goodwill(20)
            .starting_count(1)
            .settlement_namer("default"),
        FactionTemplate::new("RandomNpc", "unknown faction")
            .category(CATEGORY_RANDOM)
            .settlement_namer("default"),
    ] {
        cat.register_template(t).unwrap();
    }
    cat.register_variant(VariantTemplate::new("Ridgeborn", "ridgeborn"))
        .unwrap();
    cat.policy
        .add_user_exclusions(settings.user_excluded.iter());

    let synthesized = synthesize_variant_templates(&mut cat);
    eprintln!("synthesized {synthesized} derived templates");

    let mut start_counts = StartCountPolicy::default();
    start_counts.apply(&mut cat, settings.remove_other_factions);

    let mut world = WorldState::new(42);
    let player = world.id_gen.next_id();
    world.add_faction(faction_gen::LiveFaction::new(player, "PlayerColony", "New Dawn".to_string()));
    let pirates = world.id_gen.next_id();
    world.add_faction(faction_gen::LiveFaction::new(pirates, "Pirate", "The Black Banner".to_string()));
    world.add_settlement("The Cove", pirates);
    world.add_settlement("Wreckers' Rest", pirates);

    let mut generator =
        RandomFactionGenerator::new(&cat, world.seed, settings.variant_percent, Vec::new());
    let mut namer = WordlistNamer::new();
    let mut inst = DefaultInstantiator;
    let coordinator = ReplacementCoordinator::new(settings.flavor.clone());

    coordinator.replace_with_random_faction(
        &mut world,
        &mut cat,
        &mut generator,
        pirates,
        settings.allow_duplicates,
        &mut namer,
        &mut inst,
    );

    for f in world.factions.values() {
        let status = if f.defeated { "defeated" } else { "live" };
        eprintln!(
            "Faction {} ({}): template={} goodwill={} {}",
            f.id, f.name, f.template, f.natural_goodwill, status
        );
    }
    for s in world.settlements.values() {
        eprintln!("Settlement {} ({}): faction={}", s.id, s.name, s.faction);
    }

    start_counts.restore(&mut cat);
}
