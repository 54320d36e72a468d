pub mod comment;
pub mod newtypes;
pub mod post;
pub mod user;

use serde::{Deserialize, Serialize};

pub static AUTH_COOKIE: &str = "auth";

#[derive(Deserialize, Serialize, Debug)]
pub struct SuccessResponse {
    success: bool,
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

/// One page of an offset paginated listing, with the total count of rows
/// that satisfy the listing filter (not just the rows on this page).
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SiteStats {
    pub users: i64,
    pub posts: i64,
    pub comments: i64,
}

/// Pages are 1-indexed; page size is capped to keep single queries bounded.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound on the page number, so the offset arithmetic
/// `(page - 1) * page_size` can never overflow i64.
pub const MAX_PAGE: i64 = 1_000_000;

pub fn validate_pagination(page: i64, page_size: i64) -> crate::error::BackendResult<()> {
    if page < 1 || page > MAX_PAGE {
        return Err(crate::error::BackendError::invalid_argument(
            "Page out of range",
        ));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(crate::error::BackendError::invalid_argument(
            "Page size out of range",
        ));
    }
    Ok(())
}

/// Matches the varchar length of the title column.
pub const MAX_TITLE_LEN: usize = 100;

pub fn validate_title(title: &str) -> crate::error::BackendResult<()> {
    validate_not_empty(title)?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(crate::error::BackendError::invalid_argument(
            "Title too long",
        ));
    }
    Ok(())
}

pub fn validate_not_empty(text: &str) -> crate::error::BackendResult<()> {
    if text.trim().is_empty() {
        return Err(crate::error::BackendError::invalid_argument(
            "Empty text submitted",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pagination() {
        assert!(validate_pagination(1, 1).is_ok());
        assert!(validate_pagination(1000, 100).is_ok());
        assert!(validate_pagination(MAX_PAGE, 100).is_ok());
        assert!(validate_pagination(0, 10).is_err());
        assert!(validate_pagination(-1, 10).is_err());
        assert!(validate_pagination(MAX_PAGE + 1, 10).is_err());
        // i64::MAX * page_size must be rejected, not overflow in the offset
        assert!(validate_pagination(i64::MAX, 100).is_err());
        assert!(validate_pagination(1, 0).is_err());
        assert!(validate_pagination(1, 101).is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("a title").is_ok());
        assert!(validate_title(&"x".repeat(100)).is_ok());
        assert!(validate_title(&"x".repeat(101)).is_err());
        assert!(validate_title(" ").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("hi").is_ok());
        assert!(validate_not_empty("  \n").is_err());
        assert!(validate_not_empty("").is_err());
    }
}
