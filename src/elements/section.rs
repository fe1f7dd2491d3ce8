//! Truss sections: the binding of members to a material and an area

use serde::{Deserialize, Serialize};

/// How sections are created during model assembly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPolicy {
    /// One dedicated section per element
    #[default]
    PerElement,
    /// One section per distinct (area, material) pair
    Deduplicate,
}

/// A named truss section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section name (`Sec-<n>`)
    pub name: String,
    /// Catalog name of the assigned material
    pub material: String,
    /// Cross-sectional area in model units
    pub area: f64,
    /// 0-based indices of the elements carrying this section
    pub elements: Vec<usize>,
}

impl Section {
    /// Create the `index`-th section
    pub fn new(index: usize, material: &str, area: f64) -> Self {
        Self {
            name: format!("Sec-{}", index),
            material: material.to_string(),
            area,
            elements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_naming() {
        let section = Section::new(3, "polymer", 0.25);
        assert_eq!(section.name, "Sec-3");
        assert!(section.elements.is_empty());
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: SectionPolicy = serde_json::from_str("\"deduplicate\"").unwrap();
        assert_eq!(policy, SectionPolicy::Deduplicate);
        assert_eq!(SectionPolicy::default(), SectionPolicy::PerElement);
    }
}
