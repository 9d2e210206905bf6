//! Property-based test generators using proptest.
//!
//! Generated values satisfy the entity validation rules.

use pagestore_models::{Domain, Page};
use proptest::prelude::*;

/// Strategy for generating valid tenant domains.
pub fn domain_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,15}").expect("Invalid regex")
}

/// Strategy for generating valid page and file names.
pub fn filename_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}\\.(md|txt|png)").expect("Invalid regex")
}

/// Strategy for generating page bodies, including multi-line text.
pub fn markdown_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("(#{0,3} ?[A-Za-z0-9 .,!]{0,40}\n){0,5}").expect("Invalid regex")
}

/// Strategy for generating valid pages.
pub fn page_strategy() -> impl Strategy<Value = Page> {
    (domain_strategy(), filename_strategy(), markdown_strategy()).prop_map(
        |(domain, name, markdown)| {
            let mut page = Page::new(domain, name);
            page.html = format!("<pre>{markdown}</pre>");
            page.markdown = markdown;
            page
        },
    )
}

/// Strategy for generating valid custom domain mappings.
pub fn domain_mapping_strategy() -> impl Strategy<Value = Domain> {
    (
        prop::string::string_regex("[a-z0-9]{2,12}(\\.[a-z]{2,6}){1,2}").expect("Invalid regex"),
        domain_strategy(),
    )
        .prop_map(|(external, internal)| Domain::new(external, internal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagestore_core::Model;

    proptest! {
        #[test]
        fn generated_pages_validate(page in page_strategy()) {
            prop_assert!(page.validate());
        }

        #[test]
        fn generated_mappings_validate(domain in domain_mapping_strategy()) {
            prop_assert!(domain.validate());
        }
    }
}
