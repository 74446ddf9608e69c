//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the engine end to end against the in-memory remote.
//! - Keep output deterministic for quick local sanity checks.

use expotax_core::{CascadingSelector, InMemoryRemote, TaxonomyService};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("expotax_core version={}", expotax_core::core_version());

    let mut service = TaxonomyService::new(InMemoryRemote::new(3), 3);
    let linea = service.create(0, "IA", None)?;
    let sublinea = service.create(1, "Deep Learning", Some(&linea.code))?;
    let area = service.create(2, "Redes Neuronales", Some(&sublinea.code))?;

    let mut selector = CascadingSelector::new(3);
    selector.refresh(service.store(), service.index());
    selector.select(service.store(), service.index(), 0, &linea.code)?;
    println!(
        "selected línea `{}` -> sublíneas {:?}",
        linea.name,
        selector.options_for(1)
    );

    for hit in service.search(2, "ia") {
        println!("search hit at level 2: {} ({})", hit.name, hit.code);
    }

    let removed = service.delete(0, &linea.code)?;
    println!("cascade removed {} nodes (incl. `{}`)", removed.len(), area.name);
    Ok(())
}
