//! HS256 session token signer.
//!
//! Issuer and audience are pinned at construction. Expiry is checked against
//! the injected clock rather than system time so leeway behaviour stays
//! deterministic under test.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;

use crate::domain::ports::{TokenSigner, TokenSignerError};
use crate::domain::{SessionClaims, SessionToken, TokenPolicy};

/// [`TokenSigner`] producing compact HS256 tokens.
pub struct JwtTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    leeway: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenSigner {
    /// Build a signer from a shared secret.
    ///
    /// Tokens verify only when their `iss` and `aud` match `policy`.
    pub fn new(
        secret: &[u8],
        policy: &TokenPolicy,
        leeway: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenSignerError> {
        if secret.is_empty() {
            return Err(TokenSignerError::signing("signing secret must not be empty"));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[policy.issuer.as_str()]);
        validation.set_audience(&[policy.audience.as_str()]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            leeway,
            clock,
        })
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, claims: &SessionClaims) -> Result<SessionToken, TokenSignerError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map(SessionToken::new)
            .map_err(|err| TokenSignerError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenSignerError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenSignerError::invalid(err.to_string()))?;
        let cutoff = self
            .clock
            .utc()
            .checked_sub_signed(self.leeway)
            .map_or(i64::MIN, |at| at.timestamp());
        if data.claims.exp <= cutoff {
            return Err(TokenSignerError::Expired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountId;
    use crate::test_support::{MutableClock, fixture_timestamp};
    use rstest::rstest;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn policy() -> TokenPolicy {
        TokenPolicy::new("idp", "clients", Duration::hours(24))
    }

    fn signer_with(clock: Arc<MutableClock>, policy: &TokenPolicy) -> JwtTokenSigner {
        JwtTokenSigner::new(SECRET, policy, Duration::seconds(30), clock).expect("signer")
    }

    fn claims() -> SessionClaims {
        policy()
            .claims_for(&AccountId::from_bytes([5; 12]), fixture_timestamp())
            .expect("expiry in range")
    }

    #[test]
    fn signed_tokens_verify_back_into_their_claims() {
        let signer = signer_with(Arc::new(MutableClock::default()), &policy());
        let token = signer.sign(&claims()).expect("sign");

        assert_eq!(token.as_str().split('.').count(), 3);
        assert_eq!(signer.verify(token.as_str()).expect("verify"), claims());
    }

    #[rstest]
    #[case(Duration::hours(24) + Duration::seconds(29), true)]
    #[case(Duration::hours(24) + Duration::seconds(30), false)]
    #[case(Duration::hours(48), false)]
    fn expiry_honours_leeway(#[case] elapsed: Duration, #[case] accepted: bool) {
        let clock = Arc::new(MutableClock::default());
        let signer = signer_with(clock.clone(), &policy());
        let token = signer.sign(&claims()).expect("sign");

        clock.advance_seconds(elapsed.num_seconds());
        let outcome = signer.verify(token.as_str());

        if accepted {
            assert!(outcome.is_ok(), "expected acceptance, got {outcome:?}");
        } else {
            assert_eq!(outcome, Err(TokenSignerError::Expired));
        }
    }

    #[test]
    fn tokens_for_another_audience_are_invalid() {
        let clock = Arc::new(MutableClock::default());
        let issuing = signer_with(
            clock.clone(),
            &TokenPolicy::new("idp", "someone-else", Duration::hours(1)),
        );
        let foreign = TokenPolicy::new("idp", "someone-else", Duration::hours(1))
            .claims_for(&AccountId::from_bytes([5; 12]), fixture_timestamp())
            .expect("expiry in range");
        let token = issuing.sign(&foreign).expect("sign");

        let err = signer_with(clock, &policy())
            .verify(token.as_str())
            .expect_err("audience mismatch");

        assert!(matches!(err, TokenSignerError::Invalid { .. }));
    }

    #[test]
    fn tampered_tokens_are_invalid() {
        let signer = signer_with(Arc::new(MutableClock::default()), &policy());
        let token = signer.sign(&claims()).expect("sign");
        let tampered = format!("{}x", token.as_str());

        let err = signer.verify(&tampered).expect_err("bad signature");

        assert!(matches!(err, TokenSignerError::Invalid { .. }));
    }

    #[test]
    fn empty_secrets_are_refused() {
        let result = JwtTokenSigner::new(
            b"",
            &policy(),
            Duration::seconds(0),
            Arc::new(MutableClock::default()),
        );

        assert!(matches!(result, Err(TokenSignerError::Signing { .. })));
    }
}
