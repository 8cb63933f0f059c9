//! Caller identity passed into every lifecycle operation.

use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// Who is performing an operation, as resolved by the authorization layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: DbId,
    pub is_admin: bool,
}

impl ActorContext {
    /// Build a context from a user id and the role claim carried by the token.
    pub fn from_role(user_id: DbId, role: &str) -> Self {
        Self {
            user_id,
            is_admin: role == ROLE_ADMIN,
        }
    }

    /// A regular (non-admin) user.
    pub fn user(user_id: DbId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// An administrator.
    pub fn admin(user_id: DbId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    pub fn is_owner(&self, owner_id: DbId) -> bool {
        self.user_id == owner_id
    }

    /// Whether this actor may mutate an asset owned by `owner_id` at all.
    pub fn is_owner_or_admin(&self, owner_id: DbId) -> bool {
        self.is_admin || self.is_owner(owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_sets_flag() {
        assert!(ActorContext::from_role(1, "admin").is_admin);
        assert!(!ActorContext::from_role(1, "seller").is_admin);
        assert!(!ActorContext::from_role(1, "ADMIN").is_admin);
    }

    #[test]
    fn owner_or_admin() {
        assert!(ActorContext::user(7).is_owner_or_admin(7));
        assert!(!ActorContext::user(7).is_owner_or_admin(8));
        assert!(ActorContext::admin(1).is_owner_or_admin(8));
    }
}
