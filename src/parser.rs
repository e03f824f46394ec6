//! Parsing and verification pipeline
//!
//! [`Parser::parse_with_claims`] runs every step: split, decode header, decode
//! claims, resolve `alg`, enforce the allow-list, decode the signature, call
//! the keyfunc, verify against one key or each key of a set, then validate the
//! claims. The first failing step stops the pipeline and comes back as a
//! [`ParseError`] carrying the partially populated [`Token`].

use crate::algorithm::{self, SigningMethod};
use crate::claims::{Claims, DecodeOptions, Validator, ValidatorConfig};
use crate::error::{BoxError, Error, ErrorKind, Result, Segment};
use crate::keys::VerificationKey;
use crate::limits::MAX_TOKEN_LENGTH;
use crate::token::{Header, Token};
use crate::utils::base64url;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Parser options, fixed at [`Parser::new`]
///
/// Loadable from any serde format with `#[serde(default)]` semantics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Algorithm allow-list; empty means every registered method
    pub valid_methods: Vec<String>,

    /// Keep JSON numbers exact when decoding claims
    pub use_json_number: bool,

    /// Skip the claims validator entirely
    pub skip_claims_validation: bool,

    /// Reject non-canonical base64
    pub decode_strict: bool,

    /// Accept `=` padded segments
    pub decode_padding_allowed: bool,

    /// Longest accepted token, in bytes
    pub max_token_length: usize,

    /// Claims validation settings
    pub validator: ValidatorConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            valid_methods: Vec::new(),
            use_json_number: false,
            skip_claims_validation: false,
            decode_strict: false,
            decode_padding_allowed: false,
            max_token_length: MAX_TOKEN_LENGTH,
            validator: ValidatorConfig::default(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept these algorithms
    pub fn valid_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn use_json_number(mut self) -> Self {
        self.use_json_number = true;
        self
    }

    /// Disable claims validation (use with extreme caution!)
    pub fn skip_claims_validation(mut self) -> Self {
        self.skip_claims_validation = true;
        self
    }

    pub fn decode_strict(mut self) -> Self {
        self.decode_strict = true;
        self
    }

    pub fn decode_padding_allowed(mut self) -> Self {
        self.decode_padding_allowed = true;
        self
    }

    pub fn max_token_length(mut self, bytes: usize) -> Self {
        self.max_token_length = bytes;
        self
    }

    pub fn validator(mut self, config: ValidatorConfig) -> Self {
        self.validator = config;
        self
    }

    /// Shorthand for the validator leeway
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.validator.leeway = leeway;
        self
    }
}

/// Failure of a parse call: the classified error plus the token as far as it
/// was built
///
/// The token is absent only when the input could not be split into segments.
/// Its claims are unverified.
pub struct ParseError<C> {
    token: Option<Token<C>>,
    error: Error,
}

impl<C> ParseError<C> {
    fn new(token: Option<Token<C>>, error: Error) -> Self {
        Self { token, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.error.is(kind)
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn token(&self) -> Option<&Token<C>> {
        self.token.as_ref()
    }

    pub fn into_error(self) -> Error {
        self.error
    }

    pub fn into_parts(self) -> (Option<Token<C>>, Error) {
        (self.token, self.error)
    }
}

impl<C> fmt::Debug for ParseError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseError")
            .field("error", &self.error)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl<C> fmt::Display for ParseError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<C> std::error::Error for ParseError<C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl<C> From<ParseError<C>> for Error {
    fn from(err: ParseError<C>) -> Self {
        err.error
    }
}

/// Token parser
///
/// Immutable after construction and safe to share between threads. Each call
/// must be given its own claims value.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
    validator: Validator,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        let validator = Validator::new(config.validator.clone());
        Self { config, validator }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decode one base64url segment using the configured padding and strictness
    pub fn decode_segment(
        &self,
        segment: &str,
    ) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        base64url::decode_segment(
            segment,
            self.config.decode_padding_allowed,
            self.config.decode_strict,
        )
    }

    /// Parse, verify and validate with a keyfunc
    ///
    /// Shorthand for [`Parser::parse_with_claims`] with `Some(key_func)`.
    pub fn parse<C, F>(
        &self,
        token: &str,
        claims: C,
        key_func: F,
    ) -> std::result::Result<Token<C>, ParseError<C>>
    where
        C: Claims,
        F: FnOnce(&Token<C>) -> std::result::Result<VerificationKey, BoxError>,
    {
        self.parse_with_claims(token, claims, Some(key_func))
    }

    /// Parse, verify and validate `token`, decoding its payload into `claims`
    ///
    /// `key_func` receives the unverified token (header, claims and method
    /// populated) and returns a key or an ordered key set. With a key set, the
    /// keys are tried in order and only the last failure is reported.
    pub fn parse_with_claims<C, F>(
        &self,
        token: &str,
        claims: C,
        key_func: Option<F>,
    ) -> std::result::Result<Token<C>, ParseError<C>>
    where
        C: Claims,
        F: FnOnce(&Token<C>) -> std::result::Result<VerificationKey, BoxError>,
    {
        let mut token = self.parse_unverified(token, claims)?;
        match self.verify(&mut token, key_func) {
            Ok(()) => {
                token.valid = true;
                Ok(token)
            }
            Err(error) => {
                tracing::debug!(kind = ?error.kind(), error = %error, "token rejected");
                Err(ParseError::new(Some(token), error))
            }
        }
    }

    /// Split and decode without checking the signature or the claims
    ///
    /// WARNING: the returned token is untrusted. Only use this for diagnostics,
    /// or when the signature was already checked elsewhere.
    pub fn parse_unverified<C: Claims>(
        &self,
        token: &str,
        claims: C,
    ) -> std::result::Result<Token<C>, ParseError<C>> {
        if token.len() > self.config.max_token_length {
            return Err(ParseError::new(
                None,
                Error::TokenTooLarge {
                    size: token.len(),
                    max: self.config.max_token_length,
                },
            ));
        }

        let segments = token.split('.').count();
        if segments != 3 {
            tracing::debug!(segments, "token rejected: wrong segment count");
            return Err(ParseError::new(None, Error::SegmentCount(segments)));
        }

        let mut parsed = Token::unparsed(token, claims);
        match self.decode(&mut parsed) {
            Ok(()) => Ok(parsed),
            Err(error) => {
                tracing::debug!(kind = ?error.kind(), error = %error, "token rejected");
                Err(ParseError::new(Some(parsed), error))
            }
        }
    }

    fn decode_part(&self, segment: &str, part: Segment) -> Result<Vec<u8>> {
        self.decode_segment(segment).map_err(|source| Error::Base64 {
            segment: part,
            source,
        })
    }

    /// Header, claims and method resolution
    fn decode<C: Claims>(&self, token: &mut Token<C>) -> Result<()> {
        let mut segments = token.raw.split('.');
        let header_segment = segments.next().unwrap_or_default();
        let claims_segment = segments.next().unwrap_or_default();

        // Decode and parse header
        let header_json = self.decode_part(header_segment, Segment::Header)?;
        let header: Map<String, Value> =
            serde_json::from_slice(&header_json).map_err(Error::HeaderJson)?;
        let header = Header::from(header);

        // Decode payload into the caller's claims
        let claims_bytes = self.decode_part(claims_segment, Segment::Claims)?;
        let options = DecodeOptions {
            use_json_number: self.config.use_json_number,
        };
        token.header = header;
        token
            .claims
            .unmarshal_with_options(&claims_bytes, &options)
            .map_err(|e| Error::ClaimsDecode(Box::new(e)))?;

        // Resolve the signing method
        let alg = token.header.algorithm().ok_or(Error::AlgorithmUnspecified)?;
        if alg.eq_ignore_ascii_case("none") {
            return Err(Error::AlgorithmNoneRejected);
        }
        let method = algorithm::signing_method(alg)
            .ok_or_else(|| Error::AlgorithmUnavailable(alg.to_string()))?;
        token.method = Some(method);
        Ok(())
    }

    /// Allow-list, signature, key resolution, verification and validation
    fn verify<C, F>(&self, token: &mut Token<C>, key_func: Option<F>) -> Result<()>
    where
        C: Claims,
        F: FnOnce(&Token<C>) -> std::result::Result<VerificationKey, BoxError>,
    {
        let method = token.method.clone().ok_or(Error::AlgorithmUnspecified)?;

        // Checked before any cryptographic work
        let allowed = &self.config.valid_methods;
        if !allowed.is_empty() && !allowed.iter().any(|m| m == method.alg()) {
            tracing::warn!(alg = method.alg(), "algorithm not in allow-list");
            return Err(Error::AlgorithmNotAllowed {
                found: method.alg().to_string(),
                allowed: allowed.clone(),
            });
        }

        token.signature = self.decode_part(token.signature_segment(), Segment::Signature)?;

        let key_func = key_func.ok_or(Error::MissingKeyFunc)?;
        let key = key_func(&*token).map_err(Error::KeyFunc)?;

        verify_signature(
            method.as_ref(),
            token.signing_input(),
            &token.signature,
            &key,
        )?;

        if !self.config.skip_claims_validation {
            self.validator.validate(&token.claims)?;
        }
        Ok(())
    }
}

/// Try each candidate key in order; only the last failure is surfaced
fn verify_signature(
    method: &dyn SigningMethod,
    signing_input: &str,
    signature: &[u8],
    key: &VerificationKey,
) -> Result<()> {
    let keys = match key {
        VerificationKey::Single(key) => std::slice::from_ref(key),
        VerificationKey::Set(set) => set.keys(),
    };
    if keys.is_empty() {
        return Err(Error::EmptyKeySet);
    }

    let mut last_error = None;
    for (attempt, key) in keys.iter().enumerate() {
        match method.verify(signing_input, signature, key) {
            Ok(()) => {
                tracing::trace!(attempt, candidates = keys.len(), "signature verified");
                return Ok(());
            }
            Err(e) => last_error = Some(e),
        }
    }

    tracing::debug!(candidates = keys.len(), "no candidate key verified the signature");
    Err(Error::Signature(Box::new(
        last_error.unwrap_or(Error::SignatureMismatch),
    )))
}
