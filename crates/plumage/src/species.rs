//! Species lookup for observations.
//!
//! When the user commits a common name in the autocomplete, the
//! [`SpeciesService`] resolves it against a [`SpeciesRepository`] and
//! attaches every matching species to the [`Observation`].
//!
//! # Example
//!
//! ```
//! use plumage::species::{Observation, Species, SpeciesCatalog, SpeciesService};
//!
//! let catalog = SpeciesCatalog::new(vec![
//!     Species::new(1, "Barn Owl", "Tyto alba"),
//!     Species::new(2, "Wren", "Troglodytes troglodytes"),
//! ]);
//! let service = SpeciesService::new(catalog);
//!
//! let observation = service.add_species(Observation::new(7, "Barn Owl"));
//! assert_eq!(observation.species.len(), 1);
//! assert_eq!(observation.species[0].scientific_name, "Tyto alba");
//! ```

use std::path::Path;
use std::sync::Arc;

use plumage_core::logging::{span_names, targets};
use plumage_core::PerfSpan;
use serde::{Deserialize, Serialize};

use crate::candidate::RawItem;
use crate::error::{read_structured, Result};
use crate::source::CandidateSource;

/// A bird species record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Species {
    pub id: u64,
    pub common_name: String,
    pub scientific_name: String,
}

impl Species {
    /// Create a species record.
    pub fn new(id: u64, common_name: impl Into<String>, scientific_name: impl Into<String>) -> Self {
        Self {
            id,
            common_name: common_name.into(),
            scientific_name: scientific_name.into(),
        }
    }
}

/// A field observation, named by the common name the observer entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub id: u64,
    pub common_name: String,
    /// Species associated with the observation.
    #[serde(default)]
    pub species: Vec<Species>,
}

impl Observation {
    /// Create an observation with no associated species.
    pub fn new(id: u64, common_name: impl Into<String>) -> Self {
        Self {
            id,
            common_name: common_name.into(),
            species: Vec::new(),
        }
    }

    /// Associate a species. Returns `false` if one with the same id is
    /// already associated.
    pub fn add_species(&mut self, species: Species) -> bool {
        if self.species.iter().any(|s| s.id == species.id) {
            return false;
        }
        self.species.push(species);
        true
    }
}

/// A store of species records, queried by common name.
pub trait SpeciesRepository: Send + Sync {
    /// All species whose common name equals `name` exactly.
    fn find_by_common_name(&self, name: &str) -> Vec<Species>;
}

impl<R: SpeciesRepository + ?Sized> SpeciesRepository for Arc<R> {
    fn find_by_common_name(&self, name: &str) -> Vec<Species> {
        (**self).find_by_common_name(name)
    }
}

/// On-disk catalog layout: a top-level `species` array.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    species: Vec<Species>,
}

/// An in-memory species repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
}

impl SpeciesCatalog {
    /// Create a catalog from records.
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// Parse a catalog from TOML (`[[species]]` tables).
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(s)?;
        Ok(Self::new(file.species))
    }

    /// Parse a catalog from JSON (`{"species": [...]}`).
    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(s)?;
        Ok(Self::new(file.species))
    }

    /// Load a catalog from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file: CatalogFile = read_structured(path.as_ref())?;
        tracing::debug!(target: targets::SPECIES, path = %path.as_ref().display(), count = file.species.len(), "catalog loaded");
        Ok(Self::new(file.species))
    }

    /// Add a record.
    pub fn insert(&mut self, species: Species) {
        self.species.push(species);
    }

    /// All records, in insertion order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// The distinct common names as an autocomplete source.
    pub fn candidates(&self) -> CandidateSource {
        let mut names: Vec<&str> = Vec::with_capacity(self.species.len());
        for species in &self.species {
            if !names.contains(&species.common_name.as_str()) {
                names.push(&species.common_name);
            }
        }
        CandidateSource::List(names.into_iter().map(RawItem::from).collect())
    }
}

impl SpeciesRepository for SpeciesCatalog {
    fn find_by_common_name(&self, name: &str) -> Vec<Species> {
        self.species
            .iter()
            .filter(|s| s.common_name == name)
            .cloned()
            .collect()
    }
}

/// Resolves observations' common names into species.
#[derive(Debug, Clone)]
pub struct SpeciesService<R> {
    repository: R,
}

impl<R: SpeciesRepository> SpeciesService<R> {
    /// Create a service over a repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Species matching a common name. No match yields an empty list.
    #[tracing::instrument(skip(self), target = "plumage::species", level = "trace")]
    pub fn find_by(&self, common_name: &str) -> Vec<Species> {
        self.repository.find_by_common_name(common_name)
    }

    /// Attach every species matching the observation's common name.
    pub fn add_species(&self, mut observation: Observation) -> Observation {
        let _span = PerfSpan::new(span_names::LOOKUP);
        let found = self.find_by(&observation.common_name);
        tracing::debug!(
            target: targets::SPECIES,
            observation = observation.id,
            common_name = %observation.common_name,
            matches = found.len(),
            "resolved species"
        );
        for species in found {
            observation.add_species(species);
        }
        observation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpeciesCatalog {
        SpeciesCatalog::new(vec![
            Species::new(1, "Barn Owl", "Tyto alba"),
            Species::new(2, "Wren", "Troglodytes troglodytes"),
            Species::new(3, "Barn Owl", "Tyto furcata"),
        ])
    }

    #[test]
    fn test_find_is_exact() {
        let catalog = catalog();
        assert_eq!(catalog.find_by_common_name("Barn Owl").len(), 2);
        assert!(catalog.find_by_common_name("barn owl").is_empty());
        assert!(catalog.find_by_common_name("Owl").is_empty());
    }

    #[test]
    fn test_add_species_attaches_all_matches() {
        let service = SpeciesService::new(catalog());
        let observation = service.add_species(Observation::new(1, "Barn Owl"));
        let ids: Vec<u64> = observation.species.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_add_species_without_match() {
        let service = SpeciesService::new(catalog());
        let observation = service.add_species(Observation::new(1, "Dodo"));
        assert!(observation.species.is_empty());
        assert_eq!(observation.common_name, "Dodo");
    }

    #[test]
    fn test_observation_ignores_duplicates() {
        let service = SpeciesService::new(catalog());
        let observation = service.add_species(Observation::new(1, "Wren"));
        let observation = service.add_species(observation);
        assert_eq!(observation.species.len(), 1);
    }

    #[test]
    fn test_shared_repository() {
        let service = SpeciesService::new(Arc::new(catalog()));
        assert_eq!(service.find_by("Wren")[0].id, 2);
    }

    #[test]
    fn test_candidates_are_distinct_names() {
        assert_eq!(
            catalog().candidates(),
            CandidateSource::List(vec![RawItem::from("Barn Owl"), RawItem::from("Wren")])
        );
    }

    #[test]
    fn test_catalog_from_toml_and_json() {
        let toml_catalog = SpeciesCatalog::from_toml_str(
            r#"
            [[species]]
            id = 1
            common_name = "Barn Owl"
            scientific_name = "Tyto alba"
            "#,
        )
        .unwrap();
        let json_catalog = SpeciesCatalog::from_json_str(
            r#"{"species": [{"id": 1, "common_name": "Barn Owl", "scientific_name": "Tyto alba"}]}"#,
        )
        .unwrap();

        assert_eq!(toml_catalog, json_catalog);
        assert_eq!(toml_catalog.len(), 1);
        assert!(SpeciesCatalog::from_json_str("[]").is_err());
    }

    #[test]
    fn test_catalog_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("species.json");
        std::fs::write(
            &path,
            r#"{"species": [{"id": 4, "common_name": "Kestrel", "scientific_name": "Falco tinnunculus"}]}"#,
        )
        .unwrap();

        let catalog = SpeciesCatalog::load(&path).unwrap();
        assert_eq!(catalog.species()[0].common_name, "Kestrel");

        assert!(SpeciesCatalog::load(dir.path().join("absent.json")).is_err());
    }
}
