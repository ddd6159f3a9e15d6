//! Authentication and authorization module

pub mod clock;
pub mod gate;
pub mod login;
pub mod password;
pub mod resolver;
pub mod token;
pub mod user;

// Re-export main components
pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{require_role, RoleGate};
pub use login::LoginService;
pub use password::{hash_password, verify_password};
pub use resolver::IdentityResolver;
pub use token::{extract_bearer_token, Claims, TokenManager};
pub use user::{CredentialRecord, Principal, UserId, UserRole};
