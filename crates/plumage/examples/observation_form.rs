//! Observation form demo.
//!
//! Builds a small form, attaches autocompletes to every `input.awesomplete`,
//! simulates a user typing and picking a species, then resolves the pick
//! against a species catalog.
//!
//! Run with: cargo run -p plumage --example observation_form
//!
//! Set `RUST_LOG=plumage=trace` to see the widget's internal logging.

use std::sync::Arc;

use parking_lot::Mutex;
use plumage::autocomplete::{AutocompleteConfig, Key, Registry};
use plumage::species::{Observation, Species, SpeciesCatalog, SpeciesService};
use plumage_core::{Document, DocumentTreeDebug, TreeFormatOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plumage=info")),
        )
        .init();

    let catalog = SpeciesCatalog::new(vec![
        Species::new(1, "Barn Owl", "Tyto alba"),
        Species::new(2, "Snowy Owl", "Bubo scandiacus"),
        Species::new(3, "Little Owl", "Athene noctua"),
        Species::new(4, "Short-eared Owl", "Asio flammeus"),
        Species::new(5, "Kestrel", "Falco tinnunculus"),
    ]);

    let mut doc = Document::new();
    let form = doc.create_element("form");
    doc.append_child(doc.root(), form)?;

    let species_input = doc.create_element("input");
    doc.add_class(species_input, "awesomplete")?;
    doc.set_attribute(species_input, "data-autofirst", "")?;
    doc.append_child(form, species_input)?;

    let site_input = doc.create_element("input");
    doc.add_class(site_input, "awesomplete")?;
    doc.set_attribute(site_input, "data-list", "Minsmere, Titchwell, Slimbridge")?;
    doc.append_child(form, site_input)?;

    let registry = Registry::new();
    let config = AutocompleteConfig::new().with_list(catalog.candidates());
    let mut widgets = registry.attach_all(&mut doc, &config)?;
    println!("attached {} autocompletes", registry.len());

    let picked = Arc::new(Mutex::new(None));
    let sink = picked.clone();
    widgets[0].selected.connect(move |candidate| {
        *sink.lock() = Some(candidate.value.clone());
    });

    let species = &mut widgets[0];
    doc.focus(species_input)?;
    doc.set_value(species_input, "owl")?;
    species.handle_input(&mut doc)?;
    println!(
        "\"owl\" suggests: {}",
        species
            .suggestions()
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let tree = DocumentTreeDebug::with_options(TreeFormatOptions::minimal());
    println!("\n{}", tree.format_subtree(&doc, form)?);

    species.handle_keydown(&mut doc, Key::ArrowDown)?;
    species.handle_keydown(&mut doc, Key::Enter)?;

    let Some(name) = picked.lock().clone() else {
        println!("nothing selected");
        return Ok(());
    };

    let service = SpeciesService::new(catalog);
    let observation = service.add_species(Observation::new(1, name));
    for s in &observation.species {
        println!("observed {} ({})", s.common_name, s.scientific_name);
    }

    for widget in widgets {
        widget.destroy(&mut doc)?;
    }
    println!("\n{}", DocumentTreeDebug::new().format_document(&doc)?);

    Ok(())
}
