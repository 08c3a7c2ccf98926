use serde::Serialize;

use crate::types::EntityId;

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Sign-up input. The caller hashes the password before handing it over.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(EntityId),
    Name(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => user.id == *id,
            Self::Name(name) => user.name == *name,
        }
    }
}
