use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse the optional role column of a roster.
    /// An empty cell means `User`.
    pub fn from_cell(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "user" | "no" | "n" | "false" | "0" => Some(Role::User),
            "admin" | "yes" | "y" | "true" | "1" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// One row of the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub department: String,
    pub credential: String,
    #[serde(default)]
    pub role: Role,
}

impl Employee {
    pub fn new(id: &str, name: &str, department: &str, credential: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            department: department.to_string(),
            credential: credential.to_string(),
            role,
        }
    }
}
