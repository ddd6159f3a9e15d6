// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Token defaults
pub const DEFAULT_ALGORITHM: &str = "HS256";
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;
/// Longest token lifetime the server will accept
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;

pub const MIN_SIGNING_KEY_LEN: usize = 32;
pub const TOKEN_TYPE: &str = "bearer";

// Failed logins never complete faster than this
pub const DEFAULT_LOGIN_FAILURE_FLOOR_MS: u64 = 100;
