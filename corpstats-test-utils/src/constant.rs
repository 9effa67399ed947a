//! Test configuration constants for EVE ESI client setup.
//!
//! These values are not real credentials but placeholder values for testing purposes.

/// User agent string for test ESI client requests.
pub static TEST_USER_AGENT: &str =
    "MyApp/1.0 (contact@example.com; +https://github.com/autumn-order/corpstats)";

/// Mock ESI OAuth2 client ID for testing.
pub static TEST_ESI_CLIENT_ID: &str = "esi_client_id";

/// Mock ESI OAuth2 client secret for testing.
pub static TEST_ESI_CLIENT_SECRET: &str = "esi_client_secret";

/// Mock OAuth2 callback URL for testing.
pub static TEST_CALLBACK_URL: &str = "http://localhost:8080/auth/callback";

/// Access token stored on mock corp stats units.
pub static TEST_ACCESS_TOKEN: &str = "access_token";
