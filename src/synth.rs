use crate::catalogue::{DERIVED_SEPARATOR, WorldCatalogue};
use crate::model::FactionTemplate;

/// Resolve the identifier a (base, variant) pair derives to.
///
/// Returns `None` ("skip") when an override mapping points at an identifier
/// that is already registered: the canonical template exists, so nothing must
/// be synthesized for this pair. Otherwise returns the override identifier or
/// the default `"{variant}{sep}{base}"` form, which is injective over the pair
/// because variant ids are registered separator-free.
///
/// # Panics
/// Panics if either id is empty. Passing empty ids is a contract violation,
/// not a recoverable fault.
pub fn resolve_identifier(
    catalogue: &WorldCatalogue,
    variant_id: &str,
    base_id: &str,
) -> Option<String> {
    assert!(!variant_id.is_empty(), "resolve_identifier: empty variant id");
    assert!(!base_id.is_empty(), "resolve_identifier: empty base id");

    if let Some(mapped) = catalogue.override_for(base_id, variant_id) {
        if catalogue.template(mapped).is_some() {
            // Canonical template already defined; signal the caller to skip.
            return None;
        }
        return Some(mapped.to_string());
    }

    Some(format!("{variant_id}{DERIVED_SEPARATOR}{base_id}"))
}

/// One-time load pass: synthesize a derived template for every eligible
/// (base, variant) combination and register it, suppressed and hidden, so the
/// selector can later promote it. Returns the number of templates created.
///
/// Never overwrites: a pair resolving to an already-registered identifier is
/// logged and skipped.
pub fn synthesize_variant_templates(catalogue: &mut WorldCatalogue) -> usize {
    let capable: Vec<String> = catalogue
        .variants()
        .filter(|v| v.violence_capable())
        .map(|v| v.def_name.clone())
        .collect();
    tracing::trace!("{} violence-capable variants available", capable.len());

    let bases: Vec<String> = catalogue
        .templates()
        .filter(|t| catalogue.is_variant_eligible(t))
        .map(|t| t.def_name.clone())
        .collect();

    let mut created = 0;
    for base_id in &bases {
        for variant_id in &capable {
            if catalogue.is_variant_blocked(variant_id) {
                continue;
            }
            if catalogue.is_pair_blocked(base_id, variant_id) {
                tracing::trace!("blocked pair: {base_id} cannot take variant {variant_id}");
                continue;
            }

            let Some(def_name) = resolve_identifier(catalogue, variant_id, base_id) else {
                tracing::trace!(
                    "skipping synthesis: override for ({variant_id}, {base_id}) already registered"
                );
                continue;
            };

            if catalogue.template(&def_name).is_some() {
                tracing::warn!("attempted to synthesize duplicate template '{def_name}', skipping");
                continue;
            }

            let base = catalogue
                .template(base_id)
                .unwrap_or_else(|| panic!("synthesize: base template {base_id} not found"));
            let variant = catalogue
                .variant(variant_id)
                .unwrap_or_else(|| panic!("synthesize: variant {variant_id} not found"));
            let derived = FactionTemplate::derived_from(base, def_name, variant);

            // Registration cannot collide: the id was checked just above and
            // nothing else mutates the catalogue during this pass.
            if let Err(e) = catalogue.register_template(derived) {
                tracing::warn!("failed to register derived template: {e}");
                continue;
            }
            created += 1;
        }
    }

    tracing::trace!("synthesized {created} derived faction templates");
    created
}
