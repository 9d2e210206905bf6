//! Site owners.

use crate::validate::{domain_from_name, is_valid_domain, is_valid_email};
use pagestore_codec::{field_table, Field, Schema};
use pagestore_core::Model;
use rand::Rng;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Number of characters in a generated password salt.
pub const SALT_LENGTH: usize = 32;

const SALT_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A site owner, keyed by their subdomain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Password hash; never exported.
    pub password_hash: String,
    /// Password salt; never exported.
    pub password_salt: String,
    /// Contact address.
    pub email: String,
    /// Contact number.
    pub phone_number: String,
    /// Free-form profile text.
    pub bio: String,
    /// Subdomain, the identity of the user.
    pub domain: String,
}

impl User {
    /// Creates a user with a freshly generated password salt.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let password_salt = (0..SALT_LENGTH)
            .map(|_| char::from(SALT_LETTERS[rng.gen_range(0..SALT_LETTERS.len())]))
            .collect();
        Self {
            password_salt,
            ..Self::default()
        }
    }

    /// Creates a lookup handle for the user owning `domain`.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }
}

impl Schema for User {
    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<User>] = field_table!(User {
            "name" => name: Text,
            "password_hash" => password_hash: Text,
            "password_salt" => password_salt: Text,
            "email" => email: Text,
            "phone_number" => phone_number: Text,
            "bio" => bio: Text,
            "domain" => domain: Text,
        });
        FIELDS
    }
}

impl Model for User {
    fn key(&self) -> String {
        format!("user:{}", self.domain)
    }

    fn registration_key(&self) -> String {
        "users".to_string()
    }

    fn validate(&self) -> bool {
        if !is_valid_domain(&self.domain) {
            debug!(user = %self.name, domain = %self.domain, "illegal domain");
            return false;
        }
        if !is_valid_email(&self.email) {
            debug!(user = %self.name, email = %self.email, "illegal email");
            return false;
        }
        if self.password_salt.len() < SALT_LENGTH {
            debug!(user = %self.name, "password salt too short");
            return false;
        }
        true
    }

    /// Guesses the domain from the name when no domain is set.
    fn make_default(&mut self) {
        if self.domain.is_empty() && !self.name.is_empty() {
            self.domain = domain_from_name(&self.name);
        }
    }

    fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out.insert("email".into(), json!(self.email));
        out.insert("phone_number".into(), json!(self.phone_number));
        out.insert("domain".into(), json!(self.domain));
        out
    }
}
