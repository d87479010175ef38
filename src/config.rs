use serde::{Deserialize, Serialize};

/// Low-probability curated renaming applied when a replacement lands.
/// Flavor only: the lists, the chance and the gating tag are all data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorNaming {
    /// Probability of a curated substitution per faction / per settlement.
    pub chance: f64,
    /// Substring of the template def name the faction rename is gated to.
    pub faction_tag: String,
    pub faction_names: Vec<String>,
    pub settlement_names: Vec<String>,
}

impl Default for FlavorNaming {
    fn default() -> Self {
        Self {
            chance: 0.01,
            faction_tag: "Pirate".to_string(),
            faction_names: [
                "Zal's Irregulars",
                "The Salt Reavers",
                "Wolf's Dragoons",
            ]
            .map(String::from)
            .to_vec(),
            settlement_names: [
                "Zal's Rest",
                "Serenity Valley",
                "Hadley's Hope",
                "Cave of Ridges",
                "Paradise City",
                "Shangri-La",
                "Sietch Tabr",
                "The Hermitage",
                "Hill Valley",
                "Lankhmar",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// User-facing engine configuration. Serialized whole by the host's settings
/// store; unknown fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Percentage chance (0-100) that a drawn base template is swapped for a
    /// derived variant template.
    pub variant_percent: u32,
    /// Permit templates already instantiated in the world to be drawn again.
    pub allow_duplicates: bool,
    /// Suppress the host's default faction seeding at world creation.
    pub remove_other_factions: bool,
    /// Extra template def names barred from selection, merged into the
    /// hard-excluded set at catalogue construction.
    pub user_excluded: Vec<String>,
    pub verbose: bool,
    pub flavor: FlavorNaming,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant_percent: 15,
            allow_duplicates: false,
            remove_other_factions: true,
            user_excluded: Vec::new(),
            verbose: false,
            flavor: FlavorNaming::default(),
        }
    }
}
