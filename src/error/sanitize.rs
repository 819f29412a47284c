/// Driver error sanitizer
///
/// Maps raw driver failures onto a fixed set of user-presentable messages.
/// The output is always one of the constants below, never a fragment of the
/// input, so hosts, usernames and passwords embedded in driver text cannot leak.

use once_cell::sync::Lazy;
use regex::Regex;

pub const CONNECTION_REFUSED: &str = "Connection refused - check host and port";
pub const ACCESS_DENIED: &str = "Access denied - check username and password";
pub const UNKNOWN_DATABASE: &str = "Unknown database - check database name";
pub const UNKNOWN_HOST: &str = "Unknown host - check hostname";
pub const CONNECTION_FAILED: &str = "Connection failed - check connection settings";
pub const CONNECTION_ERROR: &str = "Database connection error";
pub const FALLBACK: &str = "Database connection failed";

/// Ordered signature table; first match wins
///
/// Numeric error codes are checked before any free-text alternative, since
/// driver text can embed user-controlled names (users, databases, hosts).
/// Codes cover both PDO-style (`SQLSTATE[HY000] [1045]`) and sqlx-style
/// (`1045 (28000): ...`) renderings of the same MySQL error numbers.
static SIGNATURES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // error codes
        (r"\[2002\]|\b2002 \(|\b2003 \(", CONNECTION_REFUSED),
        (r"\[1045\]|\b1045 \(", ACCESS_DENIED),
        (r"\[1049\]|\b1049 \(", UNKNOWN_DATABASE),
        (r"\[2005\]|\b2005 \(", UNKNOWN_HOST),
        (r"SQLSTATE\[08006\]|\(08006\)", CONNECTION_FAILED),
        // free text
        (r"(?i)connection refused|os error 111", CONNECTION_REFUSED),
        (r"(?i)access denied", ACCESS_DENIED),
        (r"(?i)unknown database|unable to open database file", UNKNOWN_DATABASE),
        (
            r"(?i)unknown mysql server host|failed to lookup address|name or service not known",
            UNKNOWN_HOST,
        ),
        (r"(?i)pool timed out|connection reset", CONNECTION_FAILED),
        (r"SQLSTATE\[.*\]", CONNECTION_ERROR),
    ]
    .into_iter()
    .map(|(pattern, message)| (Regex::new(pattern).unwrap(), message))
    .collect()
});

/// Sanitize a raw driver message into a safe, categorical message
pub fn sanitize(raw: &str) -> &'static str {
    SIGNATURES
        .iter()
        .find(|(pattern, _)| pattern.is_match(raw))
        .map(|(_, message)| *message)
        .unwrap_or(FALLBACK)
}
