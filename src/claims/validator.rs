use super::{Claims, NumericDate};
use crate::error::{ClaimError, Error};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Clock used by the [`Validator`] instead of the system time
pub type TimeFn = Arc<dyn Fn() -> NumericDate + Send + Sync>;

/// Configuration for claims validation
///
/// Loadable from any serde format; `leeway` accepts humantime strings such as
/// `"30s"`. The clock can only be set in code.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Clock skew tolerance applied to `exp`, `nbf` and `iat`
    #[serde(with = "humantime_serde")]
    pub leeway: Duration,

    /// Registered claim names that must be present and non-empty
    pub required_claims: Vec<String>,

    /// `aud` must contain this value
    pub expected_audience: Option<String>,

    /// `iss` must equal this value
    pub expected_issuer: Option<String>,

    /// `sub` must equal this value
    pub expected_subject: Option<String>,

    #[serde(skip)]
    pub time_fn: Option<TimeFn>,
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("leeway", &self.leeway)
            .field("required_claims", &self.required_claims)
            .field("expected_audience", &self.expected_audience)
            .field("expected_issuer", &self.expected_issuer)
            .field("expected_subject", &self.expected_subject)
            .field("time_fn", &self.time_fn.as_ref().map(|_| ".."))
            .finish()
    }
}

impl ValidatorConfig {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set clock skew tolerance
    pub fn leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Require a registered claim (`iss`, `sub`, `aud`, `exp`, `nbf`, `iat`, `jti`)
    pub fn require_claim(mut self, name: impl Into<String>) -> Self {
        self.required_claims.push(name.into());
        self
    }

    pub fn expect_audience(mut self, audience: impl Into<String>) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    pub fn expect_subject(mut self, subject: impl Into<String>) -> Self {
        self.expected_subject = Some(subject.into());
        self
    }

    /// Replace the system clock, e.g. for deterministic tests
    pub fn time_fn<F>(mut self, now: F) -> Self
    where
        F: Fn() -> NumericDate + Send + Sync + 'static,
    {
        self.time_fn = Some(Arc::new(now));
        self
    }
}

/// Claims validator
///
/// Immutable once built and safe to share between threads. Never mutates the
/// claims it inspects.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate claims, reporting the first violation
    pub fn validate<C: Claims + ?Sized>(&self, claims: &C) -> Result<(), ClaimError> {
        match self.violations(claims).into_iter().next() {
            None => Ok(()),
            Some(violation) => {
                tracing::debug!(error = %violation, "claims rejected");
                Err(violation)
            }
        }
    }

    /// Every violation found, in check order; empty when the claims are acceptable
    pub fn violations<C: Claims + ?Sized>(&self, claims: &C) -> Vec<ClaimError> {
        let now = self.now();
        let leeway = self.config.leeway;
        let mut found = Vec::new();

        // Validate expiration
        match claims.expiration_time() {
            Ok(Some(exp)) if now.saturating_sub(leeway) >= exp => {
                found.push(ClaimError::Expired {
                    expired_at: exp,
                    now,
                    leeway,
                })
            }
            Err(e) => found.push(unreadable("exp", e)),
            _ => {}
        }

        // Validate not-before
        match claims.not_before() {
            Ok(Some(nbf)) if now.saturating_add(leeway) < nbf => {
                found.push(ClaimError::NotYetValid {
                    not_before: nbf,
                    now,
                    leeway,
                })
            }
            Err(e) => found.push(unreadable("nbf", e)),
            _ => {}
        }

        // Validate issued-at
        match claims.issued_at() {
            Ok(Some(iat)) if iat > now.saturating_add(leeway) => {
                found.push(ClaimError::IssuedInFuture {
                    issued_at: iat,
                    now,
                    leeway,
                })
            }
            Err(e) => found.push(unreadable("iat", e)),
            _ => {}
        }

        for name in &self.config.required_claims {
            match presence(claims, name) {
                None => found.push(ClaimError::MissingClaim(name.clone())),
                Some((_, Ok(true))) => {}
                Some((_, Ok(false))) => found.push(ClaimError::MissingClaim(name.clone())),
                // Temporal read errors were reported above
                Some(("exp" | "nbf" | "iat", Err(_))) => {}
                Some((claim, Err(e))) => found.push(unreadable(claim, e)),
            }
        }

        if let Some(expected) = &self.config.expected_audience {
            match claims.audience() {
                Ok(aud) if !aud.contains(expected) => found.push(ClaimError::AudienceMismatch {
                    expected: expected.clone(),
                    found: aud,
                }),
                Err(e) => found.push(unreadable("aud", e)),
                _ => {}
            }
        }

        if let Some(expected) = &self.config.expected_issuer {
            match claims.issuer() {
                Ok(iss) if iss != Some(expected.as_str()) => {
                    found.push(ClaimError::IssuerMismatch {
                        expected: expected.clone(),
                        found: iss.map(str::to_string),
                    })
                }
                Err(e) => found.push(unreadable("iss", e)),
                _ => {}
            }
        }

        if let Some(expected) = &self.config.expected_subject {
            match claims.subject() {
                Ok(sub) if sub != Some(expected.as_str()) => {
                    found.push(ClaimError::SubjectMismatch {
                        expected: expected.clone(),
                        found: sub.map(str::to_string),
                    })
                }
                Err(e) => found.push(unreadable("sub", e)),
                _ => {}
            }
        }

        found
    }

    fn now(&self) -> NumericDate {
        match &self.config.time_fn {
            Some(now) => now(),
            None => NumericDate::now(),
        }
    }
}

fn unreadable(claim: &'static str, source: Error) -> ClaimError {
    ClaimError::Unreadable {
        claim,
        source: Box::new(source),
    }
}

/// Whether a registered claim is present and non-empty; `None` for unknown names
fn presence<C: Claims + ?Sized>(
    claims: &C,
    name: &str,
) -> Option<(&'static str, crate::Result<bool>)> {
    let non_empty = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());
    Some(match name {
        "exp" => ("exp", claims.expiration_time().map(|v| v.is_some())),
        "nbf" => ("nbf", claims.not_before().map(|v| v.is_some())),
        "iat" => ("iat", claims.issued_at().map(|v| v.is_some())),
        "iss" => ("iss", claims.issuer().map(non_empty)),
        "sub" => ("sub", claims.subject().map(non_empty)),
        "jti" => ("jti", claims.jwt_id().map(non_empty)),
        "aud" => ("aud", claims.audience().map(|aud| !aud.is_empty())),
        _ => return None,
    })
}
