use rand::Rng;
use rand::RngCore;
use rand::seq::SliceRandom;

use crate::catalogue::WorldCatalogue;
use crate::model::{FactionTemplate, WorldState};
use crate::synth::resolve_identifier;

/// Re-roll budget for a single draw before it is abandoned as exhausted.
pub const DRAW_ATTEMPTS: usize = 20;

/// Uniform draw of one template from the pool, re-rolling while the drawn
/// template's population cap is already met by the world's live factions.
///
/// Deliberately uniform over pool entries rather than cap headroom: a
/// heavily-capped pool burns re-rolls instead of reshaping the distribution.
/// Returns `None` when the pool is empty or the attempt budget runs out
/// (selection exhausted).
pub fn draw<'a>(
    pool: &[&'a FactionTemplate],
    world: &WorldState,
    rng: &mut dyn RngCore,
) -> Option<&'a FactionTemplate> {
    if pool.is_empty() {
        return None;
    }
    for _ in 0..DRAW_ATTEMPTS {
        let template = pool[rng.random_range(0..pool.len())];
        let cap = template.max_at_world_creation;
        if cap == 0 || world.live_count_for(&template.def_name) < cap as usize {
            tracing::trace!("selected base template: {}", template.def_name);
            return Some(template);
        }
    }
    tracing::trace!("draw abandoned: no template under its cap within {DRAW_ATTEMPTS} attempts");
    None
}

/// Second draw from the same stream: roll whether the chosen base should be
/// swapped for one of its derived variant templates, and if so promote the
/// first variant (in PRNG-shuffled order) that resolves to a registered
/// template. Returns the derived template's def name, or `None` to keep the
/// base unchanged.
pub fn maybe_promote_variant(
    base_def: &str,
    catalogue: &mut WorldCatalogue,
    variant_percent: u32,
    rng: &mut dyn RngCore,
) -> Option<String> {
    if !catalogue.has_variants() {
        return None;
    }
    let base = catalogue.template(base_def)?;
    if !catalogue.is_variant_eligible(base) {
        return None;
    }

    let roll: f64 = rng.random();
    if roll >= f64::from(variant_percent) / 100.0 {
        tracing::trace!("variant roll {roll:.2} failed against {variant_percent}%");
        return None;
    }

    let mut candidates: Vec<String> = catalogue
        .variants()
        .filter(|v| !catalogue.is_variant_blocked(&v.def_name))
        .map(|v| v.def_name.clone())
        .collect();
    candidates.shuffle(rng);

    for variant_id in &candidates {
        let Some(def_name) = resolve_identifier(catalogue, variant_id, base_def) else {
            continue;
        };
        if catalogue.template(&def_name).is_some() {
            catalogue.promote(&def_name);
            tracing::trace!("promoted variant template {def_name} replacing {base_def}");
            return Some(def_name);
        }
    }

    // No candidate resolved to a registered template; keep the base.
    None
}
