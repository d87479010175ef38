pub mod faction;
pub mod settlement;
pub mod template;
pub mod variant;
pub mod world;

pub use faction::{FactionRelation, LiveFaction, RelationKind};
pub use settlement::Settlement;
pub use template::{
    CATEGORY_DERIVED, CATEGORY_RANDOM, FactionTemplate, VariantChance, VariantChanceSet,
};
pub use variant::{AttributeGene, VariantTemplate};
pub use world::WorldState;
