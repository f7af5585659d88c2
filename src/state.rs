use crate::{content::ContentItem, user::User};

/// Everything the panel knows.
///
/// The lists hold whatever the latest successful fetch returned,
/// in the order the backend returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    /// The latest list of users.
    pub users: Vec<User>,

    /// The latest content list.
    /// Not necessarily the content of the selected user, see [`PanelState::replace_content`].
    pub content: Vec<ContentItem>,

    /// The selected user, if any.
    /// Once set it is only ever overwritten, never cleared.
    pub selected: Option<User>,
}

impl PanelState {
    /// Select the user with the given name.
    /// The name is not required to be among the known users.
    pub fn select(&mut self, name: &str) {
        self.selected = Some(User::new(name));
    }

    /// Is the user with this name the selected one?
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected
            .as_ref()
            .map_or(false, |selected| selected.name == name)
    }

    /// Replace the list of users.
    pub fn replace_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    /// Replace the content list.
    ///
    /// There is no check that the content belongs to the selected user.
    /// Whichever content fetch completes last wins.
    pub fn replace_content(&mut self, content: Vec<ContentItem>) {
        self.content = content;
    }
}
