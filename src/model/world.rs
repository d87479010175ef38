use std::collections::BTreeMap;

use super::faction::LiveFaction;
use super::settlement::Settlement;
use crate::id::IdGenerator;

/// Mutable world state the engine operates on: the live faction set and the
/// settlements they own.
///
/// `seed` is the world's stable creation seed; generators derive their PRNG
/// stream from it so repeated runs against an unchanged world replay the same
/// selections.
#[derive(Debug)]
pub struct WorldState {
    pub seed: u64,
    pub factions: BTreeMap<u64, LiveFaction>,
    pub settlements: BTreeMap<u64, Settlement>,
    pub id_gen: IdGenerator,
}

impl WorldState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            factions: BTreeMap::new(),
            settlements: BTreeMap::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Insert a faction if its id is not already present. Returns true if the
    /// faction was inserted. Membership is keyed by id, so re-adding the same
    /// faction is a no-op.
    pub fn add_faction(&mut self, faction: LiveFaction) -> bool {
        if self.factions.contains_key(&faction.id) {
            return false;
        }
        self.factions.insert(faction.id, faction);
        true
    }

    pub fn contains_faction(&self, id: u64) -> bool {
        self.factions.contains_key(&id)
    }

    /// Add a settlement owned by `faction`, assigning it a unique id.
    ///
    /// # Panics
    /// Panics if `faction` does not exist in the world.
    pub fn add_settlement(&mut self, name: &str, faction: u64) -> u64 {
        assert!(
            self.factions.contains_key(&faction),
            "add_settlement: faction {faction} not found"
        );
        let id = self.id_gen.next_id();
        self.settlements.insert(id, Settlement::new(id, name, faction));
        id
    }

    /// Number of live factions bound to the given template, defeated ones
    /// included. Computed on demand from the faction set; this is the ground
    /// truth for population-cap checks.
    pub fn live_count_for(&self, def_name: &str) -> usize {
        self.factions
            .values()
            .filter(|f| f.template == def_name)
            .count()
    }

    /// Def names of every template currently instantiated in the world.
    pub fn instantiated_templates(&self) -> Vec<String> {
        self.factions.values().map(|f| f.template.clone()).collect()
    }

    /// Ids of settlements owned by the given faction, in id order.
    pub fn settlements_of(&self, faction: u64) -> Vec<u64> {
        self.settlements
            .values()
            .filter(|s| s.faction == faction)
            .map(|s| s.id)
            .collect()
    }

    /// Hand a settlement to a new owner.
    ///
    /// # Panics
    /// Panics if the settlement or the new owner does not exist.
    pub fn reassign_settlement(&mut self, settlement: u64, faction: u64) {
        assert!(
            self.factions.contains_key(&faction),
            "reassign_settlement: faction {faction} not found"
        );
        let s = self
            .settlements
            .get_mut(&settlement)
            .unwrap_or_else(|| panic!("reassign_settlement: settlement {settlement} not found"));
        s.faction = faction;
    }

    /// # Panics
    /// Panics if the settlement does not exist.
    pub fn rename_settlement(&mut self, settlement: u64, name: &str) {
        let s = self
            .settlements
            .get_mut(&settlement)
            .unwrap_or_else(|| panic!("rename_settlement: settlement {settlement} not found"));
        s.name = name.to_string();
    }
}
