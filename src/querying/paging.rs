use crate::querying::QueryError;

/// A page of results; `page_index` is zero based.
///
/// The one based row window is computed when the page is created, so a
/// page whose rows cannot be numbered is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    page_index: usize,
    page_size: usize,
    from_row: i64,
    to_row: i64,
}

impl Paging {
    pub fn new(page_index: usize, page_size: usize) -> Result<Self, QueryError> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }

        let out_of_range = || QueryError::PageOutOfRange { page_index, page_size };
        let from_row = page_index
            .checked_mul(page_size)
            .and_then(|skipped| skipped.checked_add(1))
            .and_then(|row| i64::try_from(row).ok())
            .ok_or_else(out_of_range)?;
        let to_row = i64::try_from(page_size - 1)
            .ok()
            .and_then(|rest| from_row.checked_add(rest))
            .ok_or_else(out_of_range)?;

        Ok(Self { page_index, page_size, from_row, to_row })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// First row number of the page, one based.
    pub fn from_row(&self) -> i64 {
        self.from_row
    }

    /// Last row number of the page, inclusive.
    pub fn to_row(&self) -> i64 {
        self.to_row
    }
}
