//! The envelope: the logical request/response unit of the protocol.
//!
//! An envelope is a short tag string naming the operation (or the outcome,
//! for responses) plus a mapping of named string fields.  It is immutable
//! once built: constructors take everything up front and the struct exposes
//! only getters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Well-known envelope tags.
///
/// Request tags name the operation; response tags are fixed outcome markers.
/// Any response tag other than [`tag::SUCCESS`] is treated as failure.
pub mod tag {
    /// Authentication request for an existing account.
    pub const LOGIN: &str = "login";
    /// Account creation request.
    pub const REGISTER: &str = "register";
    /// Positive server response.
    pub const SUCCESS: &str = "success";
    /// Negative server response.
    pub const FAILURE: &str = "failure";
}

/// Field names used by the authentication requests.
pub mod field {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const CARD_NUMBER: &str = "card_number";
}

/// A request or response unit exchanged over the protocol.
///
/// # Examples
///
/// ```rust
/// use ebooking_core::Envelope;
///
/// let req = Envelope::login("alice", "hunter2");
/// assert_eq!(req.tag(), "login");
/// assert_eq!(req.get("username"), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    tag: String,
    fields: HashMap<String, String>,
}

impl Envelope {
    /// Creates an envelope with the given tag and fields.
    ///
    /// The tag must be non-empty; the codec rejects empty tags on both
    /// encode and decode.
    pub fn new(tag: impl Into<String>, fields: HashMap<String, String>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }

    /// Creates an envelope with a tag and no fields.
    pub fn bare(tag: impl Into<String>) -> Self {
        Self::new(tag, HashMap::new())
    }

    /// Builds a `login` request.
    pub fn login(username: &str, password: &str) -> Self {
        let mut fields = HashMap::new();
        fields.insert(field::USERNAME.to_string(), username.to_string());
        fields.insert(field::PASSWORD.to_string(), password.to_string());
        Self::new(tag::LOGIN, fields)
    }

    /// Builds a `register` request.
    pub fn register(username: &str, password: &str, card_number: &str) -> Self {
        let mut fields = HashMap::new();
        fields.insert(field::USERNAME.to_string(), username.to_string());
        fields.insert(field::PASSWORD.to_string(), password.to_string());
        fields.insert(field::CARD_NUMBER.to_string(), card_number.to_string());
        Self::new(tag::REGISTER, fields)
    }

    /// The tag naming the operation (requests) or the outcome (responses).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Looks up a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All fields, in no particular order.
    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// Whether this envelope is the positive server response.
    pub fn is_success(&self) -> bool {
        self.tag == tag::SUCCESS
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
