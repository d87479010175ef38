use std::collections::BTreeMap;

use crate::catalogue::WorldCatalogue;

/// World-creation seeding policy: when "replace other factions" is on, the
/// host's regular templates stop seeding factions and the engine's Random
/// placeholders seed instead. Keeps the counts it zeroes so a settings flip
/// restores them exactly.
#[derive(Debug, Default)]
pub struct StartCountPolicy {
    regular_saved: BTreeMap<String, u32>,
    random_saved: BTreeMap<String, u32>,
}

impl StartCountPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the configured direction in one call.
    pub fn apply(&mut self, catalogue: &mut WorldCatalogue, remove_other_factions: bool) {
        if remove_other_factions {
            self.suppress(catalogue);
        } else {
            self.restore(catalogue);
        }
    }

    /// Zero the starting count of every regular template (visible, non-player,
    /// non-placeholder, not hard-excluded) and give the Random placeholders
    /// their recorded counts back.
    pub fn suppress(&mut self, catalogue: &mut WorldCatalogue) {
        let mut to_zero = Vec::new();
        for t in catalogue.templates() {
            if t.hidden
                || t.is_player
                || t.is_random_category()
                || catalogue.is_hard_excluded(&t.def_name)
            {
                continue;
            }
            to_zero.push((t.def_name.clone(), t.starting_count));
        }
        for (def, count) in to_zero {
            self.regular_saved.entry(def.clone()).or_insert(count);
            catalogue.set_starting_count(&def, 0);
        }

        for (def, count) in std::mem::take(&mut self.random_saved) {
            catalogue.set_starting_count(&def, count);
        }
    }

    /// Undo: restore regular templates' counts and suppress the Random
    /// placeholders again.
    pub fn restore(&mut self, catalogue: &mut WorldCatalogue) {
        for (def, count) in std::mem::take(&mut self.regular_saved) {
            catalogue.set_starting_count(&def, count);
        }

        let randoms: Vec<(String, u32)> = catalogue
            .templates()
            .filter(|t| t.is_random_category())
            .map(|t| (t.def_name.clone(), t.starting_count))
            .collect();
        for (def, count) in randoms {
            self.random_saved.entry(def.clone()).or_insert(count);
            catalogue.set_starting_count(&def, 0);
        }
    }
}
