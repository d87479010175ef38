pub mod catalogue;
pub mod config;
pub mod filter;
pub mod flush;
pub mod generator;
pub mod id;
pub mod model;
pub mod naming;
pub mod replace;
pub mod selector;
pub mod startup;
pub mod synth;

pub use catalogue::{CatalogueError, ExclusionPolicy, WorldCatalogue};
pub use config::{FlavorNaming, Settings};
pub use filter::FilterSpec;
pub use generator::{
    DefaultInstantiator, FactionInstantiator, GenerateError, InstantiateError,
    RandomFactionGenerator,
};
pub use id::IdGenerator;
pub use model::{
    FactionRelation, FactionTemplate, LiveFaction, RelationKind, Settlement, VariantTemplate,
    WorldState,
};
pub use naming::{NameService, WordlistNamer};
pub use replace::ReplacementCoordinator;
pub use startup::StartCountPolicy;
