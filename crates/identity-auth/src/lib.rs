//! Connection handshake identity resolution.
//!
//! A connecting client presents a bearer token. The token only proves who
//! the client is; role and display name always come from the user
//! directory, so a stale token can never smuggle in an old role.
//!
//! - [`TokenVerifier`]: HS256 JWT verification
//! - [`UserDirectory`]: async lookup seam, with an in-memory implementation
//!   kept in sync by the mutation adapters
//! - [`resolve_identity`]: the full handshake (verify, look up, normalize)

mod directory;
mod error;
mod identity;
mod token;

pub use directory::{InMemoryUserDirectory, UserDirectory};
pub use error::{AuthError, AuthResult};
pub use identity::{resolve_identity, ResolvedIdentity};
pub use token::{Claims, TokenVerifier};
