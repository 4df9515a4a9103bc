//! Auth Service Library
//!
//! The authentication domain service: registration, password login and
//! bearer-token self-lookup over any [`domain::AccountStore`], with tokens
//! produced by the HS512 [`token::TokenCodec`].

pub mod service;
pub mod token;

pub use service::{AuthService, Authenticator};
pub use token::{bearer, split_bearer, Audience, Claims, RegisteredClaims, TokenCodec};
