//! # Pagination Resolver
//!
//! Offset and cursor pagination state, bounds validation and the wire page
//! object.
//!
//! Bounds:
//! - page size ≤ 200 (default 20)
//! - page offset ≤ 800
//!
//! A cursor already encodes the filter and sort of the request that produced
//! it, so cursor requests must not carry their own.

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Maximum records per page
pub const PAGINATION_MAX_SIZE: u32 = 200;

/// Page size when none is given
pub const PAGINATION_DEFAULT_SIZE: u32 = 20;

/// Maximum page offset
pub const PAGINATION_MAX_OFFSET: u32 = 800;

/// Page offset when none is given
pub const PAGINATION_DEFAULT_OFFSET: u32 = 0;

/// Opaque position token plus the direction to move from it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    /// Records after the cursor
    After(String),
    /// Records before the cursor
    Before(String),
    /// First page of the cursor's result set
    Start(String),
    /// Last page of the cursor's result set
    End(String),
}

impl Cursor {
    /// The opaque token
    pub fn token(&self) -> &str {
        match self {
            Cursor::After(t) | Cursor::Before(t) | Cursor::Start(t) | Cursor::End(t) => t,
        }
    }
}

/// Page navigation from a known cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
    Start,
    End,
}

impl Navigation {
    /// Attach the navigation direction to a cursor token
    pub fn cursor(self, token: impl Into<String>) -> Cursor {
        let token = token.into();
        match self {
            Navigation::Next => Cursor::After(token),
            Navigation::Previous => Cursor::Before(token),
            Navigation::Start => Cursor::Start(token),
            Navigation::End => Cursor::End(token),
        }
    }
}

/// Pagination state of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pagination {
    /// Numeric window over the filtered, sorted result
    Offset {
        size: Option<u32>,
        offset: Option<u32>,
    },
    /// Window addressed by a cursor
    Cursor {
        cursor: Cursor,
        size: Option<u32>,
        offset: Option<u32>,
    },
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::Offset {
            size: None,
            offset: None,
        }
    }
}

impl Pagination {
    /// Offset pagination
    pub fn offset(size: Option<u32>, offset: Option<u32>) -> Self {
        Pagination::Offset { size, offset }
    }

    /// Offset pagination with only a page size
    pub fn size(size: u32) -> Self {
        Self::offset(Some(size), None)
    }

    /// Cursor pagination
    pub fn cursor(cursor: Cursor, size: Option<u32>, offset: Option<u32>) -> Self {
        Pagination::Cursor {
            cursor,
            size,
            offset,
        }
    }

    /// Derive pagination from a page cursor
    pub fn navigate(
        navigation: Navigation,
        token: impl Into<String>,
        size: Option<u32>,
        offset: Option<u32>,
    ) -> Self {
        Self::cursor(navigation.cursor(token), size, offset)
    }

    /// Same position with a different page size
    pub fn with_size(&self, size: u32) -> Self {
        let mut next = self.clone();
        match &mut next {
            Pagination::Offset { size: s, .. } | Pagination::Cursor { size: s, .. } => {
                *s = Some(size)
            }
        }
        next
    }

    /// Returns true in cursor mode
    pub fn is_cursor(&self) -> bool {
        matches!(self, Pagination::Cursor { .. })
    }

    /// Returns true if nothing was set explicitly
    pub fn is_unset(&self) -> bool {
        matches!(
            self,
            Pagination::Offset {
                size: None,
                offset: None
            }
        )
    }

    /// Requested page size, if any
    pub fn requested_size(&self) -> Option<u32> {
        match self {
            Pagination::Offset { size, .. } | Pagination::Cursor { size, .. } => *size,
        }
    }

    /// Requested page offset, if any
    pub fn requested_offset(&self) -> Option<u32> {
        match self {
            Pagination::Offset { offset, .. } | Pagination::Cursor { offset, .. } => *offset,
        }
    }

    /// Page size with the default applied
    pub fn resolved_size(&self) -> u32 {
        self.requested_size().unwrap_or(PAGINATION_DEFAULT_SIZE)
    }

    /// Page offset with the default applied
    pub fn resolved_offset(&self) -> u32 {
        self.requested_offset().unwrap_or(PAGINATION_DEFAULT_OFFSET)
    }

    /// The cursor, in cursor mode
    pub fn cursor_position(&self) -> Option<&Cursor> {
        match self {
            Pagination::Cursor { cursor, .. } => Some(cursor),
            Pagination::Offset { .. } => None,
        }
    }

    /// Check size and offset bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(size) = self.requested_size() {
            validate_size(size)?;
        }
        if let Some(offset) = self.requested_offset() {
            validate_offset(offset)?;
        }
        Ok(())
    }

    /// Build the wire page object
    pub fn to_body(&self) -> PageBody {
        match self {
            Pagination::Offset { size, offset } => PageBody {
                cursor: None,
                size: *size,
                offset: *offset,
            },
            Pagination::Cursor {
                cursor,
                size,
                offset,
            } => PageBody {
                cursor: Some(cursor.clone()),
                size: *size,
                offset: *offset,
            },
        }
    }
}

/// Wire page object: `{size?, offset?}` or `{after|before|start|end, size?, offset?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBody {
    #[serde(flatten)]
    pub cursor: Option<Cursor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Page metadata reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Opaque cursor for the returned page
    #[serde(default)]
    pub cursor: String,

    /// Whether more records follow
    #[serde(default)]
    pub more: bool,
}

impl PageMeta {
    /// Create page metadata
    pub fn new(cursor: impl Into<String>, more: bool) -> Self {
        Self {
            cursor: cursor.into(),
            more,
        }
    }

    /// True if another page can be requested from this one
    pub fn has_next(&self) -> bool {
        self.more && !self.cursor.is_empty()
    }
}

/// Check a page size
pub fn validate_size(size: u32) -> Result<u32, ValidationError> {
    if size > PAGINATION_MAX_SIZE {
        return Err(ValidationError::PageSizeExceeded {
            size,
            max: PAGINATION_MAX_SIZE,
        });
    }
    Ok(size)
}

/// Check a page offset
pub fn validate_offset(offset: u32) -> Result<u32, ValidationError> {
    if offset > PAGINATION_MAX_OFFSET {
        return Err(ValidationError::PageOffsetExceeded {
            offset,
            max: PAGINATION_MAX_OFFSET,
        });
    }
    Ok(offset)
}

/// Check a bulk batch size: at least one record, at most one full page
pub fn validate_batch_size(batch_size: u32) -> Result<u32, ValidationError> {
    if batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(
            "batch size must be at least 1".to_string(),
        ));
    }
    if batch_size > PAGINATION_MAX_SIZE {
        return Err(ValidationError::InvalidBatchSize(format!(
            "batch size {} exceeds max limit of {}",
            batch_size, PAGINATION_MAX_SIZE
        )));
    }
    Ok(batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_bounds() {
        assert_eq!(validate_size(0).unwrap(), 0);
        assert_eq!(validate_size(200).unwrap(), 200);

        let err = validate_size(201).unwrap_err();
        assert!(err.to_string().contains("exceeds max limit of 200"));
    }

    #[test]
    fn test_offset_bounds() {
        assert_eq!(validate_offset(800).unwrap(), 800);

        let err = validate_offset(801).unwrap_err();
        assert!(err.to_string().contains("must not exceed 800"));
    }

    #[test]
    fn test_defaults() {
        let pagination = Pagination::default();
        assert!(pagination.is_unset());
        assert_eq!(pagination.resolved_size(), 20);
        assert_eq!(pagination.resolved_offset(), 0);
        assert!(pagination.validate().is_ok());
    }

    #[test]
    fn test_validate_checks_both_modes() {
        assert!(Pagination::offset(Some(201), None).validate().is_err());
        assert!(Pagination::offset(None, Some(801)).validate().is_err());
        assert!(Pagination::navigate(Navigation::Next, "c1", Some(500), None)
            .validate()
            .is_err());
    }

    #[test]
    fn test_offset_body() {
        let body = Pagination::offset(Some(50), Some(100)).to_body();
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"size": 50, "offset": 100}));
    }

    #[test]
    fn test_cursor_body() {
        let body = Pagination::navigate(Navigation::Next, "abc", Some(10), None).to_body();
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"after": "abc", "size": 10}));

        let body = Pagination::navigate(Navigation::End, "abc", None, None).to_body();
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"end": "abc"}));
    }

    #[test]
    fn test_with_size_keeps_position() {
        let pagination = Pagination::offset(None, Some(40)).with_size(10);
        assert_eq!(pagination, Pagination::offset(Some(10), Some(40)));

        let pagination = Pagination::navigate(Navigation::Previous, "c", None, None).with_size(5);
        assert_eq!(pagination.cursor_position(), Some(&Cursor::Before("c".to_string())));
        assert_eq!(pagination.requested_size(), Some(5));
    }

    #[test]
    fn test_navigation_directions() {
        assert_eq!(Navigation::Previous.cursor("x"), Cursor::Before("x".to_string()));
        assert_eq!(Navigation::Start.cursor("x").token(), "x");
    }

    #[test]
    fn test_page_meta_has_next() {
        assert!(PageMeta::new("c", true).has_next());
        assert!(!PageMeta::new("c", false).has_next());
        assert!(!PageMeta::new("", true).has_next());

        let meta: PageMeta = serde_json::from_value(json!({"more": false})).unwrap();
        assert_eq!(meta, PageMeta::default());
    }

    #[test]
    fn test_batch_size() {
        assert!(validate_batch_size(0).is_err());
        assert_eq!(validate_batch_size(200).unwrap(), 200);
        assert!(validate_batch_size(201).is_err());
    }
}
