use serde::{Deserialize, Serialize};

/// A heritable attribute carried by a variant. Only the work-disabling flag
/// matters to this engine; everything else about the attribute stays host-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGene {
    pub def_name: String,
    pub disables_violent_work: bool,
}

impl AttributeGene {
    pub fn new(def_name: &str, disables_violent_work: bool) -> Self {
        Self {
            def_name: def_name.to_string(),
            disables_violent_work,
        }
    }
}

/// Descriptor of a genetic variant that can be combined with a base faction
/// template to synthesize a derived template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTemplate {
    pub def_name: String,
    pub label: String,
    pub attributes: Vec<AttributeGene>,
}

impl VariantTemplate {
    pub fn new(def_name: &str, label: &str) -> Self {
        Self {
            def_name: def_name.to_string(),
            label: label.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<AttributeGene>) -> Self {
        self.attributes = attributes;
        self
    }

    /// A variant can field fighters unless one of its attributes disables
    /// violent work. No attributes at all means trivially capable.
    pub fn violence_capable(&self) -> bool {
        !self.attributes.iter().any(|a| a.disables_violent_work)
    }
}
