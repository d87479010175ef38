use crate::model::FactionTemplate;

/// A named, referentially transparent predicate over faction templates.
///
/// Filters compose by intersection: each one independently keeps or drops a
/// template, so the final pool is the same for any filter ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// Keep templates whose player flag equals `want`.
    Player { want: bool },
    /// Keep templates whose hidden flag equals `want`.
    Hidden { want: bool },
    /// Keep templates whose permanent-enemy flag equals `want`.
    PermanentEnemy { want: bool },
    /// Keep templates whose natural-enemy flag equals `want`.
    NaturalEnemy { want: bool },
    /// Keep templates whose def name is in `names` (or not in, with `invert`).
    NameIn { names: Vec<String>, invert: bool },
    /// Keep everything.
    KeepAll,
}

impl FilterSpec {
    /// Filter out templates already instantiated in the world, or keep
    /// everything when duplicates are permitted.
    pub fn duplicates(existing: Vec<String>, allow_duplicates: bool) -> Self {
        if allow_duplicates {
            FilterSpec::KeepAll
        } else {
            FilterSpec::NameIn {
                names: existing,
                invert: true,
            }
        }
    }

    pub fn keep(&self, template: &FactionTemplate) -> bool {
        match self {
            FilterSpec::Player { want } => template.is_player == *want,
            FilterSpec::Hidden { want } => template.hidden == *want,
            FilterSpec::PermanentEnemy { want } => template.permanent_enemy == *want,
            FilterSpec::NaturalEnemy { want } => template.natural_enemy == *want,
            FilterSpec::NameIn { names, invert } => {
                names.iter().any(|n| n == &template.def_name) != *invert
            }
            FilterSpec::KeepAll => true,
        }
    }
}

/// Intersect the pool with every filter in sequence. Short-circuits once the
/// pool empties; no filter ever runs against an empty pool. An empty result is
/// not an error here, callers report it as exhaustion.
pub fn apply<'a>(
    pool: &[&'a FactionTemplate],
    filters: &[FilterSpec],
) -> Vec<&'a FactionTemplate> {
    let mut kept: Vec<&FactionTemplate> = pool.to_vec();
    for filter in filters {
        if kept.is_empty() {
            break;
        }
        kept.retain(|t| filter.keep(t));
    }
    kept
}
