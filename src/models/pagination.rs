//! Page/limit query parameters for list endpoints

use crate::error::{validation_error, AppError};
use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Raw query string values, parsed by [`PageQuery::parse`] so bad input
/// gets the JSON error envelope.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

fn positive(value: Option<&str>, default: u64) -> Result<u64, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => match raw.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(validation_error("Invalid pagination parameters")),
        },
    }
}

impl PageQuery {
    pub fn parse(&self) -> Result<PageRequest, AppError> {
        Ok(PageRequest {
            page: positive(self.page.as_deref(), DEFAULT_PAGE)?,
            limit: positive(self.limit.as_deref(), DEFAULT_LIMIT)?.min(MAX_LIMIT),
        })
    }
}

impl PageRequest {
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}
