//! Sample provider settings and canned identity provider responses.
//!
//! Every provider in [`simple_oauth2_settings`] points at
//! `https://example.com`, which is the host [`crate::MockTransport`] answers for.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use simple_oauth2_core::{Oauth2Error, RawSettingsTable, Result};

/// Base URL shared by every fixture provider.
pub const BASE_URL: &str = "https://example.com";

pub const CONFIGURATION_URL: &str = "https://example.com/.well-known/openid-configuration";
pub const TOKEN_URL: &str = "https://example.com/token";
pub const USERINFO_URL: &str = "https://example.com/userinfo";

/// Access token returned by the mocked token endpoint.
pub const ACCESS_TOKEN: &str = "abcdefghijklmnopqrstuwxz";

/// HS256 secret the mocked ID token is signed with.
pub const ID_TOKEN_SECRET: &[u8] = b"key";

pub const USER_SUB: &str = "1234567890";
pub const USER_EMAIL: &str = "test@test.com";
pub const USER_PREFERRED_USERNAME: &str = "test";

/// Characters trimmed from the end of the authorization code to form `aud`.
const CODE_SUFFIX_LEN: usize = 5;

/// Claims carried by the mocked ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub email: String,
    pub preferred_username: String,
    pub aud: String,
}

/// Discovery document served at the configuration endpoint.
pub fn configuration_response() -> Value {
    json!({
        "authorization_endpoint": "https://example.com/authorize",
        "token_endpoint": "https://example.com/token",
        "userinfo_endpoint": "https://example.com/userinfo",
        "jwks_uri": "https://example.com/.well-known/jwks.json",
        "end_session_endpoint": "https://example.com/logout",
        "login_endpoint": "https://example.com/login",
        "id_token_signing_alg_values_supported": ["plain", "HS256"],
    })
}

/// Claims served by the userinfo endpoint.
pub fn userinfo_response() -> Value {
    json!({
        "sub": USER_SUB,
        "email": USER_EMAIL,
        "preferred_username": USER_PREFERRED_USERNAME,
    })
}

/// Audience the mocked ID token carries for a given authorization code.
///
/// Tests build codes as `<client id><5 chars>`, so dropping the last five
/// characters yields the client id. Shorter codes give an empty audience.
pub fn audience_for_code(code: &str) -> String {
    let keep = code.chars().count().saturating_sub(CODE_SUFFIX_LEN);
    code.chars().take(keep).collect()
}

/// Sign the mocked ID token for `code`.
pub fn id_token(code: &str) -> Result<String> {
    let claims = IdTokenClaims {
        sub: USER_SUB.to_string(),
        email: USER_EMAIL.to_string(),
        preferred_username: USER_PREFERRED_USERNAME.to_string(),
        aud: audience_for_code(code),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(ID_TOKEN_SECRET),
    )
    .map_err(|e| Oauth2Error::Signing(e.to_string()))
}

/// Body of the token endpoint's response to `code`.
pub fn token_response(code: &str) -> Result<Value> {
    Ok(json!({
        "access_token": ACCESS_TOKEN,
        "id_token": id_token(code)?,
    }))
}

/// Sample provider settings, keyed by alias.
///
/// - `pkce-plain` / `pkce-s256`: PKCE with the named challenge method
/// - `pkce-unknown-alg`: PKCE with an unsupported method
/// - `no-pkce`: PKCE disabled
/// - `extra-params`: extra authorization parameters `foo=bar`, `baz=qux`
/// - `token-fails` / `userinfo-fails`: endpoint paths the mock does not serve
pub fn simple_oauth2_settings() -> RawSettingsTable {
    let mut table = RawSettingsTable::new();

    table.insert(
        "pkce-plain".to_string(),
        json!({
            "CLIENT_ID": "pkce-plain",
            "CLIENT_SECRET": "pkce-plain",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "CODE_CHALLENGE_METHOD": "plain",
        }),
    );
    table.insert(
        "pkce-s256".to_string(),
        json!({
            "CLIENT_ID": "pkce-s256",
            "CLIENT_SECRET": "pkce-s256",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "CODE_CHALLENGE_METHOD": "s256",
        }),
    );
    table.insert(
        "pkce-unknown-alg".to_string(),
        json!({
            "CLIENT_ID": "pkce-s256",
            "CLIENT_SECRET": "pkce-s256",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "CODE_CHALLENGE_METHOD": "unknown",
        }),
    );
    table.insert(
        "no-pkce".to_string(),
        json!({
            "CLIENT_ID": "no-pkce",
            "CLIENT_SECRET": "no-pkce",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "USE_PKCE": false,
        }),
    );
    table.insert(
        "extra-params".to_string(),
        json!({
            "CLIENT_ID": "extra-params",
            "CLIENT_SECRET": "extra-params",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "USE_PKCE": false,
            "AUTHORIZATION_EXTRA_PARAMETERS": {"foo": "bar", "baz": "qux"},
        }),
    );
    table.insert(
        "token-fails".to_string(),
        json!({
            "CLIENT_ID": "token-fails",
            "CLIENT_SECRET": "token-fails",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "USE_PKCE": false,
            "TOKEN_PATH": "/unknown",
        }),
    );
    table.insert(
        "userinfo-fails".to_string(),
        json!({
            "CLIENT_ID": "userinfo-fails",
            "CLIENT_SECRET": "userinfo-fails",
            "BASE_URL": BASE_URL,
            "REDIRECT_URI": "https://example.com/callback",
            "POST_LOGOUT_REDIRECT_URI": "https://example.com/logout",
            "USE_PKCE": false,
            "USERINFO_PATH": "/unknown",
        }),
    );

    table
}
