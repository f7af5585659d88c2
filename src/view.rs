use std::fmt::Display;

use itertools::Itertools;

use crate::state::PanelState;

/// A user as shown in the user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserButton {
    /// The text of the button, which is the user's name.
    pub name: String,

    /// Whether this is the selected user.
    pub active: bool,
}

/// A single row of the content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    /// The text of the row, which is the item's name.
    pub name: String,
}

/// What a frontend should draw.
///
/// Produced from a [`PanelState`] and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// One button per user, in the order the backend listed them.
    pub users: Vec<UserButton>,

    /// One row per content item, in the order the backend listed them.
    pub content: Vec<ContentRow>,

    /// The selected user label.
    pub selected: Option<String>,
}

impl View {
    /// Render the given state.
    pub fn render(state: &PanelState) -> Self {
        Self {
            users: state
                .users
                .iter()
                .map(|user| UserButton {
                    name: user.name.clone(),
                    active: state.is_selected(&user.name),
                })
                .collect(),
            content: state
                .content
                .iter()
                .map(|item| ContentRow {
                    name: item.name.clone(),
                })
                .collect(),
            selected: state.selected.as_ref().map(|user| user.name.clone()),
        }
    }

    /// The text of the selected user label.
    /// Empty if nobody has been selected yet.
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or_default()
    }

    /// The names on the user buttons, in order.
    pub fn user_names(&self) -> Vec<&str> {
        self.users.iter().map(|button| button.name.as_str()).collect()
    }

    /// The names in the content list, in order.
    pub fn content_names(&self) -> Vec<&str> {
        self.content.iter().map(|row| row.name.as_str()).collect()
    }

    /// The buttons currently marked active.
    pub fn active_users(&self) -> Vec<&str> {
        self.users
            .iter()
            .filter(|button| button.active)
            .map(|button| button.name.as_str())
            .collect()
    }
}

impl From<&PanelState> for View {
    fn from(state: &PanelState) -> Self {
        Self::render(state)
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let users = self
            .users
            .iter()
            .map(|button| {
                if button.active {
                    format!("[*{}*]", button.name)
                } else {
                    format!("[{}]", button.name)
                }
            })
            .join(" ");

        writeln!(f, "Users: {users}")?;
        writeln!(f, "Selected: {}", self.selected_label())?;
        write!(f, "Content:")?;
        for row in &self.content {
            write!(f, "\n  - {}", row.name)?;
        }

        Ok(())
    }
}
