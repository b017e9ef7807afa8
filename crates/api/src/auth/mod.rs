//! Authentication primitives.
//!
//! - [`jwt`]: HS256 access-token validation (and generation for tooling and
//!   tests). Tokens are issued by the identity service.

pub mod jwt;
