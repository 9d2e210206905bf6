//! Shared field patterns.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DOMAIN: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
    static ref EXTERNAL_DOMAIN: Regex = Regex::new(r"^[A-Za-z0-9.]*$").unwrap();
    static ref FILENAME: Regex = Regex::new(r"^[A-Za-z0-9_.]+$").unwrap();
    static ref FILENAME_ILLEGAL: Regex = Regex::new(r"[^A-Za-z0-9_.]+").unwrap();
    static ref DOMAIN_ILLEGAL: Regex = Regex::new(r"[^A-Za-z0-9]+").unwrap();
    static ref EMAIL: Regex = Regex::new(
        r"^([a-zA-Z0-9_\-.]+)@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.)|(([a-zA-Z0-9\-]+\.)+))([a-zA-Z]{2,4}|[0-9]{1,3})(\]?)$"
    )
    .unwrap();
}

/// Tenant names: ASCII letters and digits only.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN.is_match(domain)
}

/// Custom domains: letters, digits and dots, at least two characters.
pub fn is_valid_external_domain(domain: &str) -> bool {
    domain.len() >= 2 && EXTERNAL_DOMAIN.is_match(domain)
}

/// Page and file names.
pub fn is_valid_filename(name: &str) -> bool {
    FILENAME.is_match(name)
}

/// Loose email shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Strips every character a filename may not contain.
pub fn sanitize_filename(name: &str) -> String {
    FILENAME_ILLEGAL.replace_all(name, "").into_owned()
}

/// Lowercases `name` and strips everything but letters and digits.
pub fn domain_from_name(name: &str) -> String {
    DOMAIN_ILLEGAL
        .replace_all(&name.to_lowercase(), "")
        .into_owned()
}
