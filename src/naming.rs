use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rand::Rng;
use rand::RngCore;

const FACTION_PREFIXES: &[&str] = &[
    "Iron", "Silver", "Golden", "Shadow", "Storm", "Crimson", "Ashen", "Frost", "Stone", "Dark",
    "Bright", "Ember", "Thorn", "Raven", "Amber", "Azure", "Obsidian", "Jade", "Scarlet", "Ivory",
];

const FACTION_TYPES: &[&str] = &[
    "Covenant", "March", "Dominion", "League", "Order", "Compact", "Banner", "Hold", "Concord",
    "Reach", "Accord", "Circle", "Crown",
];

/// Generate a random faction display name: "The {Prefix} {Type}".
pub fn faction_name(rng: &mut dyn RngCore) -> String {
    let prefix = FACTION_PREFIXES[rng.random_range(0..FACTION_PREFIXES.len())];
    let kind = FACTION_TYPES[rng.random_range(0..FACTION_TYPES.len())];
    format!("The {prefix} {kind}")
}

/// Host seam for settlement naming: maps a template's naming policy plus the
/// batch's used-name set to a candidate name. `None` means the host has no
/// name to offer and the caller keeps the current one.
pub trait NameService {
    fn settlement_name(
        &mut self,
        policy: &str,
        used: &BTreeSet<String>,
        rng: &mut dyn RngCore,
    ) -> Option<String>;
}

const SETTLEMENT_STARTS: &[&str] = &[
    "Ash", "Bleak", "Cinder", "Dun", "Elder", "Fall", "Grim", "Hollow", "Karn", "Low", "Mirth",
    "North", "Oaken", "Pale", "Rust", "Salt", "Thorn", "Vale", "Wick", "Wolf",
];

const SETTLEMENT_ENDS: &[&str] = &[
    "burg", "crest", "fell", "ford", "gate", "haven", "hold", "march", "moor", "mouth", "reach",
    "rest", "stead", "watch",
];

const FALLBACK_SUFFIXES: &[&str] = &["Landing", "Crossing", "Refuge", "Outpost"];

const NAME_ATTEMPTS: usize = 5;

/// Default in-crate namer: composes names from per-policy wordlists, retrying
/// a bounded number of times to dodge the used set, then falling back to a
/// suffixed form.
#[derive(Debug, Default)]
pub struct WordlistNamer {
    /// Extra (start, end) wordlists keyed by policy name. Policies without an
    /// entry use the built-in lists.
    policies: BTreeMap<String, (Vec<String>, Vec<String>)>,
}

impl WordlistNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: &str, starts: Vec<String>, ends: Vec<String>) -> Self {
        self.policies
            .insert(policy.to_string(), (starts, ends));
        self
    }

    fn compose(&self, policy: &str, rng: &mut dyn RngCore) -> String {
        match self.policies.get(policy) {
            Some((starts, ends)) => {
                let s = &starts[rng.random_range(0..starts.len())];
                let e = &ends[rng.random_range(0..ends.len())];
                format!("{s}{e}")
            }
            None => {
                let s = SETTLEMENT_STARTS[rng.random_range(0..SETTLEMENT_STARTS.len())];
                let e = SETTLEMENT_ENDS[rng.random_range(0..SETTLEMENT_ENDS.len())];
                format!("{s}{e}")
            }
        }
    }
}

impl NameService for WordlistNamer {
    fn settlement_name(
        &mut self,
        policy: &str,
        used: &BTreeSet<String>,
        rng: &mut dyn RngCore,
    ) -> Option<String> {
        for _ in 0..NAME_ATTEMPTS {
            let name = self.compose(policy, rng);
            if !used.contains(&name) {
                return Some(name);
            }
        }
        let base = self.compose(policy, rng);
        let suffix = FALLBACK_SUFFIXES[rng.random_range(0..FALLBACK_SUFFIXES.len())];
        let name = format!("{base} {suffix}");
        if used.contains(&name) { None } else { Some(name) }
    }
}
