//! Page to offset-range conversion.
//!
//! Pages are numbered from 1. Page `p` of size `n` covers the zero-based,
//! half-open offset range `[(p - 1) * n, p * n)` of the server's full ordered
//! record set.

use crate::RangeError;

/// Zero-based half-open offset range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    /// First offset, inclusive.
    pub start: usize,
    /// Last offset, exclusive.
    pub end: usize,
}

impl PageRange {
    /// Offset range for 1-based `page` at `page_size` records per page.
    pub fn for_page(page: usize, page_size: usize) -> Result<Self, RangeError> {
        if page == 0 {
            return Err(RangeError::ZeroPage);
        }
        if page_size == 0 {
            return Err(RangeError::ZeroPageSize);
        }

        let overflow = RangeError::Overflow { page, page_size };
        let start = (page - 1).checked_mul(page_size).ok_or(overflow)?;
        let end = start.checked_add(page_size).ok_or(overflow)?;

        Ok(Self { start, end })
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the range covers no offsets.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Query string pairs for the messages endpoint.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [("start", self.start.to_string()), ("end", self.end.to_string())]
    }
}
