//! Creator credits and story arcs

use super::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A person credited on an issue, with the set of roles they filled
///
/// A creator whose role set normalises to empty carries no information and is
/// dropped wherever creator lists are built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Creator {
    pub name: String,
    pub roles: BTreeSet<Role>,
}

impl Creator {
    pub fn new(name: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Add a role to this credit
    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role);
    }
}

/// A story arc an issue belongs to, with its position when known
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoryArc {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

impl StoryArc {
    pub fn new(title: impl Into<String>, number: Option<u32>) -> Self {
        Self {
            title: title.into(),
            number,
        }
    }
}
