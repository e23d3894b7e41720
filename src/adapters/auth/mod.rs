//! Authentication adapters.
//!
//! - `jwt` - HS256 session tokens (`TokenIssuer` + `SessionValidator`)
//! - `argon2_hasher` - Argon2id `PasswordHasher`

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::JwtSessionService;
