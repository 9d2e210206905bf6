//! Listing commands.
//!
//! Each record is printed as one line of JSON holding its key and its
//! exported fields.

use pagestore_core::{Connector, Model, RecordStore};
use pagestore_models::{Domain, File, Page, User};
use serde::Serialize;
use serde_json::{Map, Value};

/// One listed record.
#[derive(Debug, Serialize)]
pub struct Listing {
    /// Primary key.
    pub key: String,
    /// Exported fields.
    pub record: Map<String, Value>,
}

impl Listing {
    fn of<M: Model>(record: &M) -> Self {
        Self {
            key: record.key(),
            record: record.export(),
        }
    }
}

/// Prints every registered record of `prototype`'s type.
pub fn run<C, M>(store: &RecordStore<C>, prototype: M) -> Result<usize, Box<dyn std::error::Error>>
where
    C: Connector,
    M: Model + Clone,
{
    let mut iter = store.list(prototype)?;
    let mut printed = 0;
    while let Some(record) = iter.next() {
        println!("{}", serde_json::to_string(&Listing::of(record))?);
        printed += 1;
    }
    if printed < iter.count() {
        tracing::warn!(
            registered = iter.count(),
            printed,
            "some registered records could not be loaded"
        );
    }
    Ok(printed)
}

/// Lists every user.
pub fn users<C: Connector>(store: &RecordStore<C>) -> Result<(), Box<dyn std::error::Error>> {
    run(store, User::default())?;
    Ok(())
}

/// Lists every custom domain.
pub fn domains<C: Connector>(store: &RecordStore<C>) -> Result<(), Box<dyn std::error::Error>> {
    run(store, Domain::default())?;
    Ok(())
}

/// Lists the pages of `domain`.
pub fn pages<C: Connector>(
    store: &RecordStore<C>,
    domain: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run(store, Page::for_domain(domain))?;
    Ok(())
}

/// Lists the files of `domain`.
pub fn files<C: Connector>(
    store: &RecordStore<C>,
    domain: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = store.config().data_dir.clone();
    run(store, File::for_domain(domain, data_dir))?;
    Ok(())
}
