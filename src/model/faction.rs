use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    Hostile,
    Neutral,
    Ally,
}

impl RelationKind {
    /// Relation kind implied by a goodwill value: hostile at or below -80,
    /// allied at or above 80, neutral in between.
    pub fn from_goodwill(goodwill: i32) -> Self {
        if goodwill <= -80 {
            RelationKind::Hostile
        } else if goodwill >= 80 {
            RelationKind::Ally
        } else {
            RelationKind::Neutral
        }
    }
}

/// One directed edge in the relation graph: how this faction stands toward
/// `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRelation {
    pub other: u64,
    pub goodwill: i32,
    pub kind: RelationKind,
}

impl FactionRelation {
    pub fn new(other: u64, goodwill: i32) -> Self {
        Self {
            other,
            goodwill,
            kind: RelationKind::from_goodwill(goodwill),
        }
    }
}

/// An instantiated faction bound to a template.
///
/// Live factions are never removed from the world; a replaced faction is
/// marked `defeated` and its template hidden so the relation history of
/// every other faction stays intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFaction {
    pub id: u64,
    /// `def_name` of the template this faction was instantiated from.
    pub template: String,
    pub name: String,
    pub natural_goodwill: i32,
    pub defeated: bool,
    pub relations: Vec<FactionRelation>,
}

impl LiveFaction {
    pub fn new(id: u64, template: &str, name: String) -> Self {
        Self {
            id,
            template: template.to_string(),
            name,
            natural_goodwill: 0,
            defeated: false,
            relations: Vec::new(),
        }
    }

    pub fn relation_with(&self, other: u64) -> Option<&FactionRelation> {
        self.relations.iter().find(|r| r.other == other)
    }
}
