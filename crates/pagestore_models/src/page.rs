//! Markdown pages.

use crate::validate::{is_valid_domain, is_valid_filename};
use pagestore_codec::{field_table, Field, Schema};
use pagestore_core::{Model, Renamable};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Name given to a page created without one.
pub const DEFAULT_PAGE_NAME: &str = "new_page.md";

const DEFAULT_MARKDOWN: &str = "## Default new page\nThis is an example page.";
const DEFAULT_HTML: &str = "<h1>Default new page</h1><p>This is an example page.</p>";

/// A page of a tenant's site.
///
/// Stored at `pages:<domain>:<name>` and listed in `pages:<domain>`. The
/// markdown is the editable source, the HTML its rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Owning tenant.
    pub domain: String,
    /// File name, part of the key.
    pub name: String,
    /// Editable source.
    pub markdown: String,
    /// Rendered output.
    pub html: String,
}

impl Page {
    /// Creates a page handle for `domain`/`name`.
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a listing prototype for every page of `domain`.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self::new(domain, "")
    }
}

impl Schema for Page {
    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Page>] = field_table!(Page {
            "domain" => domain: Text,
            "name" => name: Text,
            "markdown" => markdown: Text,
            "html" => html: Text,
        });
        FIELDS
    }
}

impl Model for Page {
    fn key(&self) -> String {
        format!("pages:{}:{}", self.domain, self.name)
    }

    fn registration_key(&self) -> String {
        format!("pages:{}", self.domain)
    }

    fn validate(&self) -> bool {
        if !is_valid_domain(&self.domain) {
            debug!(page = %self.name, domain = %self.domain, "illegal domain");
            return false;
        }
        if !is_valid_filename(&self.name) {
            debug!(page = %self.name, "illegal filename");
            return false;
        }
        true
    }

    fn make_default(&mut self) {
        if self.name.is_empty() {
            self.name = DEFAULT_PAGE_NAME.to_string();
        }
        if self.markdown.is_empty() {
            self.markdown = DEFAULT_MARKDOWN.to_string();
        }
        if self.html.is_empty() {
            self.html = DEFAULT_HTML.to_string();
        }
    }

    fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out.insert("markdown".into(), json!(self.markdown));
        out
    }
}

impl Renamable for Page {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
