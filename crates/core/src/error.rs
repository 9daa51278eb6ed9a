//! Structural classification for persistence errors.
//!
//! Callers branch on [`ErrorKind`] instead of matching error messages or
//! comparing against shared sentinel values.

use serde::Serialize;

/// The category a persistence failure falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No row matched the requested ID (and owner, where scoped).
    NotFound,
    /// A unique constraint rejected the write.
    Conflict,
    /// Input was rejected before any statement was issued.
    Validation,
    /// A statement failed to execute.
    Query,
    /// A row could not be mapped onto its entity.
    Scan,
    /// Iterating a row stream failed.
    Cursor,
}

impl ErrorKind {
    /// HTTP status an outer transport layer should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Validation => 400,
            ErrorKind::Query | ErrorKind::Scan | ErrorKind::Cursor => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Validation => "validation",
            ErrorKind::Query => "query",
            ErrorKind::Scan => "scan",
            ErrorKind::Cursor => "cursor",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ErrorKind::NotFound.http_status(), 404);
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(ErrorKind::Validation.http_status(), 400);
    }

    #[test]
    fn storage_failures_map_to_500() {
        for kind in [ErrorKind::Query, ErrorKind::Scan, ErrorKind::Cursor] {
            assert_eq!(kind.http_status(), 500, "{kind}");
        }
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }
}
