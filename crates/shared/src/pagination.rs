//! Cursor-based pagination utilities.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Smallest page a listing will return.
pub const MIN_PAGE_SIZE: i64 = 1;

/// Largest page a listing will return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Error type for cursor operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Position in a newest-first listing: the last row already handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub occurred_at: DateTime<Utc>,
    pub id: i64,
}

impl Cursor {
    pub fn new(occurred_at: DateTime<Utc>, id: i64) -> Self {
        Self { occurred_at, id }
    }

    /// Encodes the cursor as an opaque URL-safe token.
    ///
    /// The token is base64(RFC3339_timestamp:id); the id breaks ties between
    /// rows that share a timestamp.
    pub fn encode(&self) -> String {
        let raw = format!(
            "{}:{}",
            self.occurred_at
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            self.id
        );
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    /// Decodes a token produced by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CursorError::InvalidEncoding)?;

        let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

        // Timestamps contain colons, the id never does.
        let colon_pos = s.rfind(':').ok_or(CursorError::InvalidFormat)?;
        let (timestamp_str, id_str) = (&s[..colon_pos], &s[colon_pos + 1..]);

        let id: i64 = id_str.parse().map_err(|_| CursorError::InvalidId)?;
        let occurred_at = DateTime::parse_from_rfc3339(timestamp_str)
            .map_err(|_| CursorError::InvalidTimestamp)?
            .with_timezone(&Utc);

        Ok(Self { occurred_at, id })
    }
}

/// Clamps a requested page size into `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(requested: Option<i64>, default: i64) -> i64 {
    requested
        .unwrap_or(default)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}
