//! # xwt - Signed Tokens, Two Claim Encodings
//!
//! > Compact signed tokens with JSON (JWT) or protobuf (PWT) claims behind one contract.
//!
//! **xwt** produces and verifies tokens of the form `header.payload.signature`. The header is
//! always JSON; the payload is either a JSON object or a protobuf message. Every claims
//! representation implements the [`Claims`] trait, so the parser and the validator never need to
//! know which wire encoding is in use.
//!
//! ## Overview
//!
//! Four representations ship with the crate:
//!
//! - [`MapClaims`]: a free-form JSON object with no schema declared up front
//! - [`RegisteredClaims`]: the RFC 7519 registered claims as a fixed JSON structure
//! - [`PwtClaims`]: the same registered claims as a protobuf message
//! - your own structs embedding one of the above, with `#[derive(Claims)]`
//!
//! ## Quick Start
//!
//! ```ignore
//! use xwt::*;
//!
//! let parser = Parser::new(ParserConfig::new().valid_methods(["HS256"]));
//! let token = parser.parse(token_str, RegisteredClaims::default(), |_token| {
//!     Ok(Key::symmetric(b"secret".to_vec()).into())
//! })?;
//!
//! println!("Subject: {:?}", token.claims().subject()?);
//! ```
//!
//! ## Parsing Flow
//!
//! ```text
//! split into 3 segments
//!     │ base64url + JSON
//!     ▼
//! header decoded ── payload handed to Claims::unmarshal
//!     │ header alg
//!     ▼
//! signing method resolved ── allow-list enforced
//!     │ keyfunc(&token)
//!     ▼
//! signature verified (one key, or each key of a set in order)
//!     │ Validator
//!     ▼
//! Token::is_valid() == true
//! ```
//!
//! A failure at any step returns a [`ParseError`] holding the classified [`Error`] and the
//! partially populated [`Token`]. Branch on [`ErrorKind`]: an expired token is
//! [`ErrorKind::InvalidClaims`], a forged one is [`ErrorKind::SignatureInvalid`].
//!
//! ## Algorithm Support
//!
//! Methods live in a process-wide registry keyed by the header `alg`:
//!
//! - **HMAC** (always enabled): HS256, HS384, HS512
//! - **`ecdsa`**: ES256, ES384
//! - **`eddsa`**: EdDSA (Ed25519)
//!
//! Register more with [`register_signing_method`] during start-up.
//!
//! ## Features
//!
//! - **`ecdsa`** / **`eddsa`**: asymmetric methods backed by `ring`
//! - **`derive`**: `#[derive(Claims)]` for user-composed claims
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! Set [`ParserConfig::valid_methods`]. The allow-list is enforced before any key is resolved or
//! any cryptographic work happens.
//!
//! ### "none" Algorithm Rejection
//!
//! The `"none"` algorithm (unsigned tokens) is always rejected per [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725),
//! and cannot be registered.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate.
//!
//! ### Map Claims and Zero Timestamps
//!
//! [`MapClaims`] reads a native numeric `0` in `exp`, `nbf` or `iat` as absent
//! ([`claims::MAP_CLAIMS_ZERO_IS_ABSENT`]). Use a structured representation when the epoch is a
//! meaningful value.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) — JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) — JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) — JSON Web Signature Best Practices

// Lets the derive macro's `::xwt` paths resolve inside this crate
extern crate self as xwt;

// Core modules
pub mod codec;
pub mod error;
mod limits;
pub mod utils;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;

// Token and parser
mod parser;
pub mod token;

// ============================================================================
// PUBLIC API
// ============================================================================

// Parsing flow
pub use parser::{ParseError, Parser, ParserConfig};
pub use token::{Header, Token};

// Claims
pub use claims::{
    ClaimStrings, Claims, ClaimsType, DecodeOptions, MapClaims, NumericDate, PwtClaims,
    RegisteredClaims, Validator, ValidatorConfig,
};

// Algorithms and keys
pub use algorithm::{SigningMethod, register_signing_method, registered_algorithms, signing_method};
pub use keys::{EcdsaCurve, Key, VerificationKey, VerificationKeySet};

pub use error::{BoxError, ClaimError, Error, ErrorKind, Result};

#[cfg(feature = "derive")]
pub use xwt_derive::Claims;
