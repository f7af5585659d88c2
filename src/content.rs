use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A named piece of content belonging to some user.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// The name of the item, typically a file name.
    pub name: String,
}

impl ContentItem {
    /// Create an item with the given name.
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl Display for ContentItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
