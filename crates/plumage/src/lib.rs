//! Plumage: accessible autocomplete and species lookup for bird-observation forms.
//!
//! This crate builds on [`plumage_core`]'s document model and signals:
//!
//! - **Autocomplete**: an ARIA combobox that filters candidate names as the
//!   user types, with keyboard and pointer selection ([`autocomplete`])
//! - **Candidates and sources**: plain names, label/value pairs, CSV strings
//!   or list elements in the document ([`Candidate`], [`CandidateSource`])
//! - **Species lookup**: resolves a committed common name into species
//!   records attached to an observation ([`species`])
//! - **Accessibility**: role mapping for hosts with a native accessibility
//!   tree ([`accessibility`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use parking_lot::Mutex;
//! use plumage::autocomplete::{Autocomplete, AutocompleteConfig, Key, Registry};
//! use plumage::species::{Observation, Species, SpeciesCatalog, SpeciesService};
//! use plumage_core::Document;
//!
//! let catalog = SpeciesCatalog::new(vec![
//!     Species::new(1, "Barn Owl", "Tyto alba"),
//!     Species::new(2, "Snowy Owl", "Bubo scandiacus"),
//! ]);
//!
//! let mut doc = Document::new();
//! let input = doc.create_element("input");
//! doc.append_child(doc.root(), input).unwrap();
//!
//! let registry = Registry::new();
//! let config = AutocompleteConfig::new().with_list(catalog.candidates());
//! let mut widget = Autocomplete::attach(&mut doc, &registry, input, config).unwrap();
//!
//! let committed = Arc::new(Mutex::new(None));
//! let sink = committed.clone();
//! widget.selected.connect(move |candidate| {
//!     *sink.lock() = Some(candidate.value.clone());
//! });
//!
//! doc.set_value(input, "snow").unwrap();
//! widget.handle_input(&mut doc).unwrap();
//! widget.handle_keydown(&mut doc, Key::ArrowDown).unwrap();
//! widget.handle_keydown(&mut doc, Key::Enter).unwrap();
//!
//! let name = committed.lock().clone().unwrap();
//! let service = SpeciesService::new(catalog);
//! let observation = service.add_species(Observation::new(1, name));
//! assert_eq!(observation.species[0].scientific_name, "Bubo scandiacus");
//! ```

pub mod accessibility;
pub mod autocomplete;
mod candidate;
mod error;
mod source;
pub mod species;

pub use accessibility::AccessibleRole;
pub use autocomplete::{Autocomplete, AutocompleteConfig, CloseReason, Registry};
pub use candidate::{Candidate, RawItem};
pub use error::{Error, Result};
pub use source::CandidateSource;
