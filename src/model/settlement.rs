use serde::{Deserialize, Serialize};

/// A world entity owned by a live faction. The engine only needs ownership
/// and a display name; terrain, inventory and the rest live host-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: u64,
    pub name: String,
    /// Id of the owning live faction.
    pub faction: u64,
}

impl Settlement {
    pub fn new(id: u64, name: &str, faction: u64) -> Self {
        Self {
            id,
            name: name.to_string(),
            faction,
        }
    }
}
