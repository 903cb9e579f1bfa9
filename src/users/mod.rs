//! Fixed user table the demo looks records up in

use serde::Serialize;
use std::fmt;

pub type UserId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Moderator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: &'static str,
    pub role: Role,
    pub active: bool,
}

impl User {
    /// One-line summary shown inside a display card
    pub fn summary(&self) -> String {
        format!(
            "User: {} ({}) - {}",
            self.name,
            self.role,
            if self.active { "Active" } else { "Inactive" }
        )
    }
}

/// The only records that exist. Never mutated.
pub static USERS: [User; 5] = [
    User { id: 1, name: "Alice", role: Role::Admin, active: true },
    User { id: 2, name: "Bob", role: Role::User, active: false },
    User { id: 3, name: "Charlie", role: Role::Moderator, active: true },
    User { id: 4, name: "Diana", role: Role::User, active: true },
    User { id: 5, name: "Eve", role: Role::Admin, active: false },
];

/// Linear search for the first record with a matching id
pub fn find_user(id: UserId) -> Option<&'static User> {
    USERS.iter().find(|user| user.id == id)
}

/// Position of a user in the table (used by the selector)
pub fn position_of(id: UserId) -> Option<usize> {
    USERS.iter().position(|user| user.id == id)
}
