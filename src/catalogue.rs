use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::model::{FactionTemplate, VariantTemplate};

/// Separator used when deriving a template identifier from a (variant, base)
/// pair. Variant ids are validated separator-free at registration, which keeps
/// the derived identifier injective over the pair.
pub const DERIVED_SEPARATOR: char = '_';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("faction template '{0}' is already registered")]
    DuplicateTemplate(String),
    #[error("variant template '{0}' is already registered")]
    DuplicateVariant(String),
    #[error("variant id '{0}' contains the reserved separator '{DERIVED_SEPARATOR}'")]
    ReservedSeparator(String),
}

/// Static exclusion data steering synthesis and base-pool assembly. All of it
/// is construction-time configuration supplied by the host, none of it is
/// hard-coded policy.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    /// Template ids permanently barred from the selectable pool and from
    /// synthesis (default policy set plus user-configured extras).
    pub hard_excluded: BTreeSet<String>,
    /// Templates that are already a (base, variant) combination; excluded from
    /// the base pool and never used as a synthesis base.
    pub variant_only: BTreeSet<String>,
    /// Variants never used for synthesis or promotion, anywhere.
    pub blocked_variants: BTreeSet<String>,
    /// Per-base-template blocked variants.
    pub blocked_pairs: BTreeMap<String, BTreeSet<String>>,
    /// Fixed identifier for a specific (base, variant) pair, used instead of
    /// the default derived identifier.
    pub overrides: BTreeMap<(String, String), String>,
}

impl ExclusionPolicy {
    /// Merge user-configured exclusions into the hard-excluded set.
    pub fn add_user_exclusions<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        self.hard_excluded.extend(names.into_iter().cloned());
    }
}

/// Owned registry of faction and variant templates plus the exclusion policy.
///
/// One catalogue per world; every engine component receives it explicitly, so
/// independent worlds (and tests) never share registry state.
#[derive(Debug, Default)]
pub struct WorldCatalogue {
    templates: BTreeMap<String, FactionTemplate>,
    variants: BTreeMap<String, VariantTemplate>,
    pub policy: ExclusionPolicy,
}

impl WorldCatalogue {
    pub fn new(policy: ExclusionPolicy) -> Self {
        Self {
            templates: BTreeMap::new(),
            variants: BTreeMap::new(),
            policy,
        }
    }

    /// # Panics
    /// Panics if the template's `def_name` is empty.
    pub fn register_template(&mut self, template: FactionTemplate) -> Result<(), CatalogueError> {
        assert!(
            !template.def_name.is_empty(),
            "register_template: empty def_name"
        );
        if self.templates.contains_key(&template.def_name) {
            return Err(CatalogueError::DuplicateTemplate(template.def_name));
        }
        self.templates.insert(template.def_name.clone(), template);
        Ok(())
    }

    /// # Panics
    /// Panics if the variant's `def_name` is empty.
    pub fn register_variant(&mut self, variant: VariantTemplate) -> Result<(), CatalogueError> {
        assert!(
            !variant.def_name.is_empty(),
            "register_variant: empty def_name"
        );
        if variant.def_name.contains(DERIVED_SEPARATOR) {
            return Err(CatalogueError::ReservedSeparator(variant.def_name));
        }
        if self.variants.contains_key(&variant.def_name) {
            return Err(CatalogueError::DuplicateVariant(variant.def_name));
        }
        self.variants.insert(variant.def_name.clone(), variant);
        Ok(())
    }

    pub fn template(&self, def_name: &str) -> Option<&FactionTemplate> {
        self.templates.get(def_name)
    }

    pub fn variant(&self, def_name: &str) -> Option<&VariantTemplate> {
        self.variants.get(def_name)
    }

    pub fn templates(&self) -> impl Iterator<Item = &FactionTemplate> {
        self.templates.values()
    }

    pub fn variants(&self) -> impl Iterator<Item = &VariantTemplate> {
        self.variants.values()
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn is_hard_excluded(&self, def_name: &str) -> bool {
        self.policy.hard_excluded.contains(def_name)
    }

    pub fn is_variant_blocked(&self, variant: &str) -> bool {
        self.policy.blocked_variants.contains(variant)
    }

    pub fn is_pair_blocked(&self, base: &str, variant: &str) -> bool {
        self.policy
            .blocked_pairs
            .get(base)
            .is_some_and(|set| set.contains(variant))
    }

    pub fn override_for(&self, base: &str, variant: &str) -> Option<&str> {
        self.policy
            .overrides
            .get(&(base.to_string(), variant.to_string()))
            .map(String::as_str)
    }

    /// Whether a template may take part in derived-template synthesis and in
    /// the selection-time variant roll.
    pub fn is_variant_eligible(&self, template: &FactionTemplate) -> bool {
        !template.is_player
            && !template.hidden
            && !template.is_derived()
            && !template.is_random_category()
            && !self.policy.variant_only.contains(&template.def_name)
            && !self.is_hard_excluded(&template.def_name)
    }

    /// Def names of every template eligible for the selection pool: skips the
    /// Random placeholder category, variant-only combinations and
    /// hard-excluded ids.
    pub fn selectable_base_pool(&self) -> Vec<String> {
        let mut pool = Vec::new();
        for t in self.templates.values() {
            if t.is_random_category() {
                continue;
            }
            if self.policy.variant_only.contains(&t.def_name) {
                tracing::trace!("excluding variant-only template from base pool: {}", t.def_name);
                continue;
            }
            if self.is_hard_excluded(&t.def_name) {
                tracing::trace!("excluding hard-excluded template from base pool: {}", t.def_name);
                continue;
            }
            pool.push(t.def_name.clone());
        }
        pool
    }

    /// Lift a derived template into the selectable world: cap at least 1 and
    /// no longer hidden. Called at the moment the template is actually drawn.
    ///
    /// # Panics
    /// Panics if the template does not exist.
    pub fn promote(&mut self, def_name: &str) {
        let t = self
            .templates
            .get_mut(def_name)
            .unwrap_or_else(|| panic!("promote: template {def_name} not found"));
        t.max_at_world_creation = t.max_at_world_creation.max(1);
        t.hidden = false;
    }

    /// Adjust how many instances the host seeds at world creation. Startup
    /// policy hook; templates are otherwise immutable after registration.
    ///
    /// # Panics
    /// Panics if the template does not exist.
    pub fn set_starting_count(&mut self, def_name: &str, count: u32) {
        let t = self
            .templates
            .get_mut(def_name)
            .unwrap_or_else(|| panic!("set_starting_count: template {def_name} not found"));
        t.starting_count = count;
    }

    /// Hide a template (retirement path for a replaced faction's template).
    ///
    /// # Panics
    /// Panics if the template does not exist.
    pub fn hide(&mut self, def_name: &str) {
        let t = self
            .templates
            .get_mut(def_name)
            .unwrap_or_else(|| panic!("hide: template {def_name} not found"));
        t.hidden = true;
    }
}
