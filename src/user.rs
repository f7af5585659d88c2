use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A user as listed by the backend.
///
/// The name is both what is shown and what identifies the user.
/// Any other fields the backend sends along are ignored.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The name of the user.
    pub name: String,
}

impl User {
    /// Create a user with the given name.
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
