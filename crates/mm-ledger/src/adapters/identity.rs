//! Static identity resolver.
//!
//! Stands in for certificate-based role lookup: a fixed table of
//! credentials plus an optional default role for everyone else.

use crate::domain::entities::Role;
use crate::domain::errors::IdentityError;
use crate::ports::outbound::IdentityResolver;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    roles: HashMap<String, Role>,
    default_role: Option<Role>,
}

impl StaticIdentityResolver {
    /// Resolver that knows no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that answers `role` for any unlisted credential.
    pub fn with_default(role: Role) -> Self {
        Self {
            roles: HashMap::new(),
            default_role: Some(role),
        }
    }

    /// Register `credential` with an explicit role.
    pub fn with_role(mut self, credential: impl Into<String>, role: Role) -> Self {
        self.roles.insert(credential.into(), role);
        self
    }

    /// Register `credential` with a raw role code.
    pub fn with_role_code(self, credential: impl Into<String>, code: u8) -> Result<Self, IdentityError> {
        let role = Role::from_code(code).ok_or(IdentityError::UnknownRole { code })?;
        Ok(self.with_role(credential, role))
    }
}

impl IdentityResolver for StaticIdentityResolver {
    fn resolve_role(&self, credential: &str) -> Result<Role, IdentityError> {
        self.roles
            .get(credential)
            .copied()
            .or(self.default_role)
            .ok_or_else(|| IdentityError::UnknownCredential {
                credential: credential.to_string(),
            })
    }
}
