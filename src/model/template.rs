use serde::{Deserialize, Serialize};

use super::variant::VariantTemplate;

/// Category tag for placeholder templates the engine replaces at world entry.
pub const CATEGORY_RANDOM: &str = "Random";

/// Category tag for templates synthesized from (base, variant) pairs.
pub const CATEGORY_DERIVED: &str = "Derived";

/// Weighted variant assignment carried by a derived template.
///
/// Synthesized templates carry exactly one chance at full weight; the type
/// mirrors the host's weighted-set shape so hand-authored templates can use it too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantChance {
    pub variant: String,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantChanceSet {
    pub chances: Vec<VariantChance>,
}

impl VariantChanceSet {
    /// A set with 100% weight on a single variant.
    pub fn single(variant: &str) -> Self {
        Self {
            chances: vec![VariantChance {
                variant: variant.to_string(),
                weight: 1.0,
            }],
        }
    }
}

/// Immutable-after-registration descriptor a live faction is instantiated from.
///
/// `def_name` is the unique key across the template registry. `hidden` and
/// `max_at_world_creation` are the only fields mutated after registration,
/// and only through [`WorldCatalogue::promote`] / [`WorldCatalogue::hide`].
///
/// [`WorldCatalogue::promote`]: crate::catalogue::WorldCatalogue::promote
/// [`WorldCatalogue::hide`]: crate::catalogue::WorldCatalogue::hide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionTemplate {
    pub def_name: String,
    pub label: String,
    pub category_tag: String,
    pub is_player: bool,
    pub hidden: bool,
    pub permanent_enemy: bool,
    pub natural_enemy: bool,
    /// Maximum simultaneous live instances. 0 = unbounded.
    pub max_at_world_creation: u32,
    /// Instances the host seeds at world creation.
    pub starting_count: u32,
    pub natural_goodwill: i32,
    /// Naming-policy key used when renaming settlements for this faction.
    pub settlement_namer: Option<String>,
    pub variant_set: Option<VariantChanceSet>,
}

impl FactionTemplate {
    pub fn new(def_name: &str, label: &str) -> Self {
        Self {
            def_name: def_name.to_string(),
            label: label.to_string(),
            category_tag: String::new(),
            is_player: false,
            hidden: false,
            permanent_enemy: false,
            natural_enemy: false,
            max_at_world_creation: 0,
            starting_count: 1,
            natural_goodwill: 0,
            settlement_namer: None,
            variant_set: None,
        }
    }

    pub fn category(mut self, tag: &str) -> Self {
        self.category_tag = tag.to_string();
        self
    }

    pub fn player(mut self) -> Self {
        self.is_player = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn permanent_enemy(mut self) -> Self {
        self.permanent_enemy = true;
        self
    }

    pub fn natural_enemy(mut self) -> Self {
        self.natural_enemy = true;
        self
    }

    pub fn max_at_world_creation(mut self, max: u32) -> Self {
        self.max_at_world_creation = max;
        self
    }

    pub fn starting_count(mut self, count: u32) -> Self {
        self.starting_count = count;
        self
    }

    pub fn natural_goodwill(mut self, goodwill: i32) -> Self {
        self.natural_goodwill = goodwill;
        self
    }

    pub fn settlement_namer(mut self, policy: &str) -> Self {
        self.settlement_namer = Some(policy.to_string());
        self
    }

    /// Explicit field-by-field copy of `base` specialized for a derived
    /// template. Exhaustive on purpose: adding a field to the struct forces a
    /// decision about whether derived templates inherit it.
    pub fn derived_from(base: &Self, def_name: String, variant: &VariantTemplate) -> Self {
        Self {
            def_name,
            label: format!("{} {}", variant.label, base.label),
            category_tag: CATEGORY_DERIVED.to_string(),
            is_player: base.is_player,
            hidden: true,
            permanent_enemy: base.permanent_enemy,
            natural_enemy: base.natural_enemy,
            // Fully suppressed until promoted at selection time.
            max_at_world_creation: 0,
            starting_count: 0,
            natural_goodwill: base.natural_goodwill,
            settlement_namer: base.settlement_namer.clone(),
            variant_set: Some(VariantChanceSet::single(&variant.def_name)),
        }
    }

    pub fn is_random_category(&self) -> bool {
        self.category_tag == CATEGORY_RANDOM
    }

    pub fn is_derived(&self) -> bool {
        self.category_tag == CATEGORY_DERIVED
    }
}
