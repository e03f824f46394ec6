//! Size limit constants for input validation

/// Default maximum length for a compact token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum length for the `alg` header value accepted by the registry
/// Algorithm names are short (e.g., "HS256", "ES384", "EdDSA")
pub(crate) const MAX_ALG_LENGTH: usize = 16;
