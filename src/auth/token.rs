//! Session tokens: signed, time-limited JWTs carrying the user ID as the
//! subject claim, presented via an `Authorization: Bearer <token>` header.

// Code in this module is adapted from https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{AppState, Error, user::UserID};

/// How long a session token stays valid after it is issued.
pub const SESSION_TOKEN_DURATION: Duration = Duration::hours(1);

/// The response body carrying a freshly signed session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed session token.
    pub token: String,
}

/// The contents of a session token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user this token acts on behalf of.
    pub sub: String,
    /// The time the token was issued as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The ID of the user this token is bound to.
    ///
    /// # Errors
    /// Returns [Error::Unauthenticated] if the subject claim is not an integer.
    pub fn user_id(&self) -> Result<UserID, Error> {
        self.sub
            .parse()
            .map(UserID::new)
            .map_err(|_| Error::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::Unauthenticated)?;

        let state = AppState::from_ref(state);

        decode_session_token(bearer.token(), &state.jwt_keys.decoding)
    }
}

/// Sign a new session token bound to `user_id`, expiring after
/// [SESSION_TOKEN_DURATION].
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_session_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64().to_string(),
        iat: now.unix_timestamp(),
        exp: (now + SESSION_TOKEN_DURATION).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("Could not sign session token: {error}");
        Error::TokenCreation
    })
}

/// Verify the signature and expiry of a session token.
///
/// # Errors
/// Returns [Error::Unauthenticated] if the token is malformed, its signature
/// does not match, or it has expired.
pub fn decode_session_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Header, encode};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, state::JwtKeys, user::UserID};

    use super::{Claims, decode_session_token, encode_session_token};

    #[test]
    fn round_trip_preserves_user_id() {
        let keys = JwtKeys::from_secret("foobar");
        let user_id = UserID::new(42);

        let token = encode_session_token(user_id, &keys.encoding).unwrap();
        let claims = decode_session_token(&token, &keys.decoding).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn decode_fails_on_garbage() {
        let keys = JwtKeys::from_secret("foobar");

        assert_eq!(
            decode_session_token("not.a.token", &keys.decoding),
            Err(Error::Unauthenticated)
        );
    }

    #[test]
    fn decode_fails_on_wrong_secret() {
        let keys = JwtKeys::from_secret("foobar");
        let other_keys = JwtKeys::from_secret("bazqux");

        let token = encode_session_token(UserID::new(1), &keys.encoding).unwrap();

        assert_eq!(
            decode_session_token(&token, &other_keys.decoding),
            Err(Error::Unauthenticated)
        );
    }

    #[test]
    fn decode_fails_on_expired_token() {
        let keys = JwtKeys::from_secret("foobar");
        // Far enough in the past to clear the validation leeway.
        let issued_at = OffsetDateTime::now_utc() - Duration::hours(3);
        let claims = Claims {
            sub: "1".to_string(),
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + Duration::hours(1)).unix_timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert_eq!(
            decode_session_token(&token, &keys.decoding),
            Err(Error::Unauthenticated)
        );
    }
}
