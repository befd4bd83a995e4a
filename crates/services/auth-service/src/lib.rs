//! Auth Service Library
//!
//! Credential verification and the token lifecycle (sign up, sign in,
//! refresh rotation, sign out). Storage and token signing are reached
//! through the `UserRepository` and `TokenSigner` traits, so the crate has
//! no knowledge of the database or the HTTP layer.

pub mod hashing;
pub mod repository;
pub mod service;
pub mod token;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use repository::UserRepository;
pub use service::{AuthService, SignUp, TokenManager};
pub use token::{Claims, JwtSigner, TokenPair, TokenSigner, TokenSubject};
pub use verifier::CredentialVerifier;

#[cfg(any(test, feature = "test-utils"))]
pub use repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use token::MockTokenSigner;
#[cfg(any(test, feature = "test-utils"))]
pub use service::MockAuthService;
