//! Structural model - nodes, elements, sections and their materials

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::elements::{Element, Material, MaterialCatalog, Node, NodeId, Section, SectionPolicy};
use crate::error::{PrepError, PrepResult};
use crate::tables::{CoordinateRow, TopologyRow};

/// Names of the entities derived from a model name
///
/// This is the run context passed explicitly between stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNames {
    pub model: String,
    pub part: String,
    pub instance: String,
    pub step: String,
    pub job: String,
}

impl ModelNames {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            part: format!("part-{}", model),
            instance: format!("instance-{}", model),
            step: format!("step-{}", model),
            job: format!("job-{}", model),
        }
    }
}

/// The assembled truss model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralModel {
    /// Model name
    pub name: String,
    nodes: Vec<Node>,
    elements: Vec<Element>,
    sections: Vec<Section>,
    /// Section index of every element, empty until sections are assigned
    element_sections: Vec<usize>,
    /// Materials referenced by at least one section
    materials: BTreeMap<String, Material>,
}

impl StructuralModel {
    /// Build nodes and elements from the coordinate and topology tables
    ///
    /// Node `i` (0-based row) gets id `i + 1`. Element node references are
    /// resolved through [`StructuralModel::resolve`].
    pub fn build(
        name: &str,
        topology: &[TopologyRow],
        coordinates: &[CoordinateRow],
    ) -> PrepResult<Self> {
        if coordinates.is_empty() {
            return Err(PrepError::InvalidInput(
                "coordinate table has no nodes".to_string(),
            ));
        }
        if topology.is_empty() {
            return Err(PrepError::InvalidInput(
                "topology table has no members".to_string(),
            ));
        }

        let nodes = coordinates
            .iter()
            .enumerate()
            .map(|(idx, c)| Node::new(NodeId(idx + 1), c.x, c.y, c.z))
            .collect();

        let mut model = Self {
            name: name.to_string(),
            nodes,
            elements: Vec::with_capacity(topology.len()),
            sections: Vec::new(),
            element_sections: Vec::new(),
            materials: BTreeMap::new(),
        };

        for (idx, row) in topology.iter().enumerate() {
            let element = model
                .make_element(idx, row)
                .map_err(|e| e.at_row("topology", idx))?;
            model.elements.push(element);
        }

        tracing::info!(
            "Built model '{}': {} nodes, {} elements",
            model.name,
            model.nodes.len(),
            model.elements.len()
        );

        Ok(model)
    }

    fn make_element(&self, idx: usize, row: &TopologyRow) -> PrepResult<Element> {
        if row.start == row.end {
            return Err(PrepError::InvalidInput(format!(
                "element connects node {} to itself",
                row.start
            )));
        }
        if !(row.area.is_finite() && row.area > 0.0) {
            return Err(PrepError::InvalidInput(format!(
                "cross-section area must be positive (received {})",
                row.area
            )));
        }

        let node_indices = [self.resolve(row.start)?, self.resolve(row.end)?];
        let [a, b] = node_indices;
        if self.nodes[a].distance_to(&self.nodes[b]) < 1e-12 {
            tracing::warn!(
                "Element {} connects coincident nodes {} and {}",
                idx,
                row.start,
                row.end
            );
        }

        Ok(Element {
            index: idx,
            start: row.start,
            end: row.end,
            area: row.area,
            material: row.material.clone(),
            node_indices,
        })
    }

    /// Translate an external 1-based node id into an index of [`Self::nodes`]
    pub fn resolve(&self, id: NodeId) -> PrepResult<usize> {
        match id.0 {
            n if n >= 1 && n <= self.nodes.len() => Ok(n - 1),
            n => Err(PrepError::DanglingReference {
                node: n,
                node_count: self.nodes.len(),
            }),
        }
    }

    /// Look up a node by its external id
    pub fn node(&self, id: NodeId) -> PrepResult<&Node> {
        Ok(&self.nodes[self.resolve(id)?])
    }

    /// Create sections for every element and bind their materials
    ///
    /// With [`SectionPolicy::PerElement`] section `Sec-i` belongs to element
    /// `i` alone. Re-assigning replaces any previous sections.
    pub fn assign_sections(
        &mut self,
        catalog: &MaterialCatalog,
        policy: SectionPolicy,
    ) -> PrepResult<()> {
        let mut sections: Vec<Section> = Vec::new();
        let mut element_sections = Vec::with_capacity(self.elements.len());
        let mut materials = BTreeMap::new();
        let mut shared: HashMap<(u64, String), usize> = HashMap::new();

        for element in &self.elements {
            let material = catalog
                .lookup(&element.material)
                .map_err(|e| e.at_row("topology", element.index))?;
            materials
                .entry(material.name.clone())
                .or_insert_with(|| material.clone());

            let section_idx = match policy {
                SectionPolicy::PerElement => {
                    sections.push(Section::new(sections.len(), &material.name, element.area));
                    sections.len() - 1
                }
                SectionPolicy::Deduplicate => *shared
                    .entry((element.area.to_bits(), element.material.clone()))
                    .or_insert_with(|| {
                        sections.push(Section::new(sections.len(), &material.name, element.area));
                        sections.len() - 1
                    }),
            };
            sections[section_idx].elements.push(element.index);
            element_sections.push(section_idx);
        }

        self.sections = sections;
        self.element_sections = element_sections;
        self.materials = materials;

        tracing::info!(
            "Assigned {} sections ({:?}) using {} materials; total length {:.6}, total mass {:.6e}",
            self.sections.len(),
            policy,
            self.materials.len(),
            self.total_length(),
            self.total_mass().unwrap_or(0.0)
        );

        Ok(())
    }

    /// Whether every element has a section
    pub fn sections_assigned(&self) -> bool {
        !self.elements.is_empty() && self.element_sections.len() == self.elements.len()
    }

    /// Section carrying element `index`
    pub fn section_of(&self, index: usize) -> Option<&Section> {
        self.element_sections
            .get(index)
            .and_then(|&section| self.sections.get(section))
    }

    /// Length of element `index`
    pub fn element_length(&self, index: usize) -> Option<f64> {
        let [a, b] = self.elements.get(index)?.node_indices;
        Some(self.nodes[a].distance_to(&self.nodes[b]))
    }

    /// Sum of all member lengths
    pub fn total_length(&self) -> f64 {
        (0..self.elements.len())
            .filter_map(|idx| self.element_length(idx))
            .sum()
    }

    /// Sum of density * area * length, once sections are assigned
    pub fn total_mass(&self) -> Option<f64> {
        if !self.sections_assigned() {
            return None;
        }
        let mut mass = 0.0;
        for element in &self.elements {
            let section = self.section_of(element.index)?;
            let material = self.materials.get(&section.material)?;
            mass += material.density * section.area * self.element_length(element.index)?;
        }
        Some(mass)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Materials referenced by the assigned sections
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(rows: &[[f64; 3]]) -> Vec<CoordinateRow> {
        rows.iter()
            .map(|&[x, y, z]| CoordinateRow { x, y, z })
            .collect()
    }

    fn member(start: usize, end: usize, area: f64, material: &str) -> TopologyRow {
        TopologyRow {
            start: NodeId(start),
            end: NodeId(end),
            area,
            material: material.to_string(),
        }
    }

    fn two_bar() -> StructuralModel {
        StructuralModel::build(
            "two_bar",
            &[member(1, 2, 1.0, "polymer"), member(2, 3, 1.0, "polymer")],
            &coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]),
        )
        .unwrap()
    }

    #[test]
    fn test_build_two_bar() {
        let model = two_bar();
        assert_eq!(model.node_count(), 3);
        assert_eq!(model.element_count(), 2);
        assert_eq!(model.elements()[0].node_ids(), [NodeId(1), NodeId(2)]);
        assert_eq!(model.elements()[1].node_ids(), [NodeId(2), NodeId(3)]);
        assert_eq!(model.elements()[1].node_indices(), [1, 2]);
        assert_eq!(model.nodes()[2].id, NodeId(3));
    }

    #[test]
    fn test_resolved_indices_in_range() {
        let model = two_bar();
        for element in model.elements() {
            for idx in element.node_indices() {
                assert!(idx < model.node_count());
            }
        }
    }

    #[test]
    fn test_resolve_bounds() {
        let model = two_bar();
        assert_eq!(model.resolve(NodeId(1)).unwrap(), 0);
        assert_eq!(model.resolve(NodeId(3)).unwrap(), 2);
        assert!(matches!(
            model.resolve(NodeId(0)),
            Err(PrepError::DanglingReference { node: 0, node_count: 3 })
        ));
        assert!(matches!(
            model.resolve(NodeId(4)),
            Err(PrepError::DanglingReference { node: 4, .. })
        ));
    }

    #[test]
    fn test_dangling_element_reference() {
        let err = StructuralModel::build(
            "bad",
            &[member(1, 2, 1.0, "polymer"), member(2, 9, 1.0, "polymer")],
            &coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
        )
        .unwrap_err();
        match err {
            PrepError::AtRow { table, row, source } => {
                assert_eq!(table, "topology");
                assert_eq!(row, 1);
                assert!(matches!(*source, PrepError::DanglingReference { node: 9, .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rejects_self_loop_and_bad_area() {
        let nodes = coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let err = StructuralModel::build("bad", &[member(2, 2, 1.0, "polymer")], &nodes)
            .unwrap_err();
        assert!(matches!(err.root(), PrepError::InvalidInput(_)));

        let err = StructuralModel::build("bad", &[member(1, 2, 0.0, "polymer")], &nodes)
            .unwrap_err();
        assert!(matches!(err.root(), PrepError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_range_section_index_from_json() {
        let mut model = two_bar();
        model
            .assign_sections(&MaterialCatalog::standard(1.0), SectionPolicy::PerElement)
            .unwrap();
        let mut json = serde_json::to_value(&model).unwrap();
        json["element_sections"] = serde_json::json!([0, 7]);
        let model: StructuralModel = serde_json::from_value(json).unwrap();

        assert!(model.section_of(0).is_some());
        assert!(model.section_of(1).is_none());
        assert!(model.total_mass().is_none());
    }

    #[test]
    fn test_one_section_per_element() {
        let mut model = two_bar();
        model
            .assign_sections(&MaterialCatalog::standard(1.0), SectionPolicy::PerElement)
            .unwrap();
        assert_eq!(model.sections().len(), model.element_count());
        for element in model.elements() {
            let section = model.section_of(element.index).unwrap();
            assert_eq!(section.elements, vec![element.index]);
            assert_eq!(section.name, format!("Sec-{}", element.index));
            assert_eq!(section.material, "polymer");
        }
        assert_eq!(model.materials().count(), 1);
    }

    #[test]
    fn test_deduplicated_sections() {
        let mut model = StructuralModel::build(
            "dedup",
            &[
                member(1, 2, 1.0, "polymer"),
                member(2, 3, 2.0, "polymer"),
                member(1, 3, 1.0, "polymer"),
            ],
            &coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]),
        )
        .unwrap();
        model
            .assign_sections(&MaterialCatalog::standard(1.0), SectionPolicy::Deduplicate)
            .unwrap();
        assert_eq!(model.sections().len(), 2);
        assert_eq!(model.sections()[0].elements, vec![0, 2]);
        assert_eq!(model.section_of(1).unwrap().name, "Sec-1");
    }

    #[test]
    fn test_unknown_material_fails_assignment() {
        let mut model = StructuralModel::build(
            "steel",
            &[member(1, 2, 1.0, "steel")],
            &coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
        )
        .unwrap();
        let err = model
            .assign_sections(&MaterialCatalog::standard(1.0), SectionPolicy::PerElement)
            .unwrap_err();
        assert!(matches!(err.root(), PrepError::UnknownMaterial(name) if name == "steel"));
        assert!(!model.sections_assigned());
    }

    #[test]
    fn test_total_mass() {
        let mut model = two_bar();
        assert!(model.total_mass().is_none());
        model
            .assign_sections(&MaterialCatalog::standard(1.0), SectionPolicy::PerElement)
            .unwrap();
        assert!((model.total_length() - 2.0).abs() < 1e-12);
        assert!((model.total_mass().unwrap() - 2360.0).abs() < 1e-9);
    }

    #[test]
    fn test_model_names() {
        let names = ModelNames::new("25_bar");
        assert_eq!(names.part, "part-25_bar");
        assert_eq!(names.instance, "instance-25_bar");
        assert_eq!(names.step, "step-25_bar");
        assert_eq!(names.job, "job-25_bar");
    }
}
