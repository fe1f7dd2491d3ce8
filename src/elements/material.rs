//! Material properties and the material catalog

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Linear-elastic material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Catalog key referenced by the topology table
    pub name: String,
    /// Density (kg/m³ in SI)
    pub density: f64,
    /// Modulus of elasticity (Pa in SI)
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(name: &str, density: f64, e: f64, nu: f64) -> Self {
        Self {
            name: name.to_string(),
            density,
            e,
            nu,
        }
    }

    /// The photopolymer the reference models are printed in
    pub fn polymer() -> Self {
        Self::new("polymer", 1180.0, 2_558_647_069.0, 0.4)
    }

    /// Convert SI constants to a model whose length unit is `1 / scale` metres
    ///
    /// Density goes with `scale^-4` and modulus with `scale^-2`, so a
    /// millimetre model (`scale = 1000`) ends up in tonne/mm³ and N/mm².
    ///
    /// The constants are divided by the powers of `scale`, not multiplied.
    /// Decks produced by tools that multiply by the unit factor will show
    /// densities and moduli larger by `scale^8` and `scale^4` respectively.
    pub fn in_units(&self, scale: f64) -> Self {
        Self {
            name: self.name.clone(),
            density: self.density / scale.powi(4),
            e: self.e / scale.powi(2),
            nu: self.nu,
        }
    }

    /// Check the constants describe a physically admissible isotropic material
    pub fn validate(&self) -> PrepResult<()> {
        if self.name.trim().is_empty() {
            return Err(PrepError::InvalidInput("material name is empty".to_string()));
        }
        if !(self.e.is_finite() && self.e > 0.0) {
            return Err(PrepError::InvalidInput(format!(
                "material '{}' has non-positive elastic modulus {}",
                self.name, self.e
            )));
        }
        if !(self.density.is_finite() && self.density >= 0.0) {
            return Err(PrepError::InvalidInput(format!(
                "material '{}' has negative density {}",
                self.name, self.density
            )));
        }
        if !(self.nu > -1.0 && self.nu < 0.5) {
            return Err(PrepError::InvalidInput(format!(
                "material '{}' has Poisson's ratio {} outside (-1, 0.5)",
                self.name, self.nu
            )));
        }
        Ok(())
    }
}

/// Registry of named materials, already converted to model units
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, Material>,
}

impl MaterialCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog, scaled to the model length unit
    pub fn standard(scale: f64) -> Self {
        let mut catalog = Self::new();
        let polymer = Material::polymer().in_units(scale);
        catalog.materials.insert(polymer.name.clone(), polymer);
        catalog
    }

    /// Add a material given in model units
    pub fn insert(&mut self, material: Material) -> PrepResult<()> {
        material.validate()?;
        if self.materials.contains_key(&material.name) {
            return Err(PrepError::InvalidInput(format!(
                "material '{}' is defined twice",
                material.name
            )));
        }
        self.materials.insert(material.name.clone(), material);
        Ok(())
    }

    /// Look up a material by name
    pub fn lookup(&self, name: &str) -> PrepResult<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| PrepError::UnknownMaterial(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}
