//! Validation of `/docs/list` paging parameters.

use thiserror::Error;

/// Smallest accepted page size.
pub const MIN_LIMIT: i64 = 1;
/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;
/// Smallest accepted offset.
pub const MIN_OFFSET: i64 = 0;

/// Paging parameters that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Page size outside `[MIN_LIMIT, MAX_LIMIT]`.
    #[error("limit {limit} is outside [{min}, {max}]", min = MIN_LIMIT, max = MAX_LIMIT)]
    LimitOutOfRange { limit: i64 },
    /// Offset below `MIN_OFFSET`.
    #[error("offset {offset} is below {min}", min = MIN_OFFSET)]
    NegativeOffset { offset: i64 },
    /// Offset does not fit the platform's address space.
    #[error("offset {offset} exceeds the addressable range")]
    OffsetOverflow { offset: i64 },
}

/// A validated `(limit, offset)` pair handed to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingWindow {
    limit: usize,
    offset: usize,
}

impl PagingWindow {
    /// Validates raw wire values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `limit` is outside
    /// `[MIN_LIMIT, MAX_LIMIT]` or `offset` is below `MIN_OFFSET`.
    pub fn new(limit: i64, offset: i64) -> Result<Self, ValidationError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(ValidationError::LimitOutOfRange { limit });
        }
        if offset < MIN_OFFSET {
            return Err(ValidationError::NegativeOffset { offset });
        }
        let limit = usize::try_from(limit).map_err(|_| ValidationError::LimitOutOfRange { limit })?;
        let offset =
            usize::try_from(offset).map_err(|_| ValidationError::OffsetOverflow { offset })?;
        Ok(Self { limit, offset })
    }

    /// Page size.
    pub const fn limit(self) -> usize {
        self.limit
    }

    /// Number of documents to skip.
    pub const fn offset(self) -> usize {
        self.offset
    }
}
