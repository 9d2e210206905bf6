//! Custom domains pointing at a tenant's site.

use crate::validate::{is_valid_domain, is_valid_external_domain};
use pagestore_codec::{field_table, Field, Schema};
use pagestore_core::Model;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Maps a custom host name to the tenant serving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domain {
    /// Host name the tenant pointed at the service.
    pub external_domain: String,
    /// Tenant serving that host.
    pub internal_domain: String,
}

impl Domain {
    /// Creates a mapping from `external` to `internal`.
    pub fn new(external: impl Into<String>, internal: impl Into<String>) -> Self {
        Self {
            external_domain: external.into(),
            internal_domain: internal.into(),
        }
    }
}

impl Schema for Domain {
    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Domain>] = field_table!(Domain {
            "external_domain" => external_domain: Text,
            "internal_domain" => internal_domain: Text,
        });
        FIELDS
    }
}

impl Model for Domain {
    fn key(&self) -> String {
        format!("domains:{}", self.external_domain)
    }

    fn registration_key(&self) -> String {
        "domains".to_string()
    }

    fn validate(&self) -> bool {
        if !is_valid_external_domain(&self.external_domain) {
            debug!(external = %self.external_domain, "illegal external domain");
            return false;
        }
        if !is_valid_domain(&self.internal_domain) {
            debug!(internal = %self.internal_domain, "illegal internal domain");
            return false;
        }
        true
    }

    fn make_default(&mut self) {}

    fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("internal_domain".into(), json!(self.internal_domain));
        out.insert("external_domain".into(), json!(self.external_domain));
        out
    }
}
