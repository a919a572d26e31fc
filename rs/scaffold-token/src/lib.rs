//! JWT token generation and validation for service-to-service authentication.
//!
//! Create and verify the HS256 tokens a session-backed web app hands to its
//! microservices. Tokens carry the user's identity, organization, role and
//! permissions, and are bound to an issuer and an audience.
//!
//! See [`Claims`] for the payload, [`Config`] for the shared settings and
//! [`Codec`] for signing and verification.

mod claims;
mod codec;
mod config;
mod error;
mod inspect;

pub use claims::*;
pub use codec::*;
pub use config::*;
pub use error::*;
pub use inspect::*;
