//! Allocate command implementation.

use pagestore_core::{Connector, RecordStore};

/// Prints the next key of `table`.
pub fn run<C: Connector>(
    store: &RecordStore<C>,
    table: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", store.make_key_for_table(table)?);
    Ok(())
}
