//! Page command implementation.

use pagestore_core::{Connector, RecordStore};
use pagestore_models::Page;

/// Prints the markdown of `domain`/`name`.
pub fn run<C: Connector>(
    store: &RecordStore<C>,
    domain: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = Page::new(domain, name);
    store.load(&mut page)?;
    println!("{}", page.markdown);
    Ok(())
}
