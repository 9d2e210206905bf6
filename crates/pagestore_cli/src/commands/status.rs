//! Status command implementation.

use pagestore_core::{Connector, RecordStore};
use pagestore_models::{Domain, File, Page, User};
use pagestore_storage::Connection;
use serde::Serialize;

/// Store status report.
#[derive(Debug, Serialize)]
pub struct StatusResult {
    /// Store address.
    pub url: String,
    /// Whether commands run against the isolated database.
    pub isolated: bool,
    /// Whether the store answered a ping.
    pub reachable: bool,
    /// Registered users.
    pub users: usize,
    /// Registered custom domains.
    pub domains: usize,
    /// Per-tenant page counts.
    pub tenants: Vec<TenantStats>,
}

/// Record counts for one tenant.
#[derive(Debug, Serialize)]
pub struct TenantStats {
    /// Tenant domain.
    pub domain: String,
    /// Registered pages.
    pub pages: usize,
    /// Registered files.
    pub files: usize,
}

/// Runs the status command.
pub fn run<C: Connector>(
    store: &RecordStore<C>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = StatusResult {
        url: store.config().url.clone(),
        isolated: store.manager().is_isolated(),
        reachable: false,
        users: 0,
        domains: 0,
        tenants: Vec::new(),
    };

    if let Err(err) = store.manager().acquire().and_then(|mut conn| conn.ping()) {
        tracing::warn!(error = %err, "store unreachable");
    } else {
        result.reachable = true;
        count_records(store, &mut result)?;
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

fn count_records<C: Connector>(
    store: &RecordStore<C>,
    result: &mut StatusResult,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = store.registered_keys(&User::default())?;
    for key in &users {
        let domain = key.trim_start_matches("user:").to_string();
        let pages = store.registered_keys(&Page::for_domain(domain.as_str()))?;
        let files = store.registered_keys(&File::for_domain(
            domain.as_str(),
            store.config().data_dir.clone(),
        ))?;
        result.tenants.push(TenantStats {
            domain,
            pages: pages.len(),
            files: files.len(),
        });
    }
    result.users = users.len();
    result.domains = store.registered_keys(&Domain::default())?.len();
    Ok(())
}

fn print_text_output(result: &StatusResult) {
    println!("Store:     {}", result.url);
    println!("Isolated:  {}", result.isolated);
    println!("Reachable: {}", result.reachable);
    println!("Users:     {}", result.users);
    println!("Domains:   {}", result.domains);
    for tenant in &result.tenants {
        println!(
            "  {:<20} {:>5} pages {:>5} files",
            tenant.domain, tenant.pages, tenant.files
        );
    }
}
