//! Domain-level constants.
//!
//! These constants define business rules and security parameters.

// =============================================================================
// Password hashing
// =============================================================================

/// Largest password (in bytes) the hasher accepts
pub const MAX_PASSWORD_BYTES: usize = 4096;

/// Argon2id memory cost in KiB
pub const ARGON2_MEMORY_COST_KIB: u32 = 19_456;

/// Argon2id number of passes
pub const ARGON2_TIME_COST: u32 = 2;

/// Argon2id degree of parallelism
pub const ARGON2_PARALLELISM: u32 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Authorization scheme name carried in front of every token
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
