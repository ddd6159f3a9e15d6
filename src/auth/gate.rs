use crate::auth::user::{Principal, UserRole};
use crate::error::AuthError;

/// Guard that admits only principals holding one exact role.
///
/// Endpoints needing different roles build different gates; nothing is
/// inherited between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    required: UserRole,
}

/// Build a gate for `required`
pub fn require_role(required: UserRole) -> RoleGate {
    RoleGate { required }
}

impl RoleGate {
    /// Pass the principal through unchanged, or reject with `Forbidden`
    pub fn check(&self, principal: Principal) -> Result<Principal, AuthError> {
        if role_satisfies(principal.role, self.required) {
            Ok(principal)
        } else {
            log::debug!(
                "User {} with role {} denied: {} required",
                principal.id,
                principal.role,
                self.required
            );
            Err(AuthError::Forbidden)
        }
    }
}

// Adding a role forces every pairing to be decided here.
fn role_satisfies(actual: UserRole, required: UserRole) -> bool {
    match (actual, required) {
        (UserRole::User, UserRole::User) => true,
        (UserRole::Therapist, UserRole::Therapist) => true,
        (UserRole::User, UserRole::Therapist) => false,
        (UserRole::Therapist, UserRole::User) => false,
    }
}
