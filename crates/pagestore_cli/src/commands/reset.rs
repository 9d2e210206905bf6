//! Reset command implementation.

use pagestore_core::{Connector, RecordStore};

/// Wipes the isolated namespace.
pub fn run<C: Connector>(store: &RecordStore<C>) -> Result<(), Box<dyn std::error::Error>> {
    if !store.manager().is_isolated() {
        return Err("reset only runs against the isolated database; pass --isolated".into());
    }
    store.clear_all()?;
    println!("isolated database cleared");
    Ok(())
}
