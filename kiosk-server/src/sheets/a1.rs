//! A1 notation helpers

use super::{CellRef, StoreError};

/// Parsed `Sheet!A:G` / `Sheet!B2:H` style range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    raw: String,
    sheet: String,
    /// Column index of the first column in the range
    first_column: usize,
    /// 1-based row number of the first row in the range
    first_row: usize,
}

impl SheetRange {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let raw = raw.trim();
        let (sheet, cells) = match raw.rsplit_once('!') {
            Some((sheet, cells)) => (sheet, cells),
            None => (raw, ""),
        };
        if sheet.is_empty() {
            return Err(StoreError::InvalidRange(raw.to_string()));
        }

        let start = cells.split(':').next().unwrap_or_default();
        let letters: String = start
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        let digits = &start[letters.len()..];

        let first_column = if letters.is_empty() {
            0
        } else {
            column_index(&letters).ok_or_else(|| StoreError::InvalidRange(raw.to_string()))?
        };
        let first_row = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<usize>()
                .ok()
                .filter(|r| *r > 0)
                .ok_or_else(|| StoreError::InvalidRange(raw.to_string()))?
        };

        Ok(Self {
            raw: raw.to_string(),
            sheet: sheet.to_string(),
            first_column,
            first_row,
        })
    }

    /// The range exactly as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Absolute A1 address of a cell addressed relative to this range
    pub fn cell_address(&self, cell: CellRef) -> String {
        format!(
            "{}!{}{}",
            self.sheet,
            column_letters(self.first_column + cell.column),
            self.first_row + cell.row
        )
    }
}

/// 0 → A, 25 → Z, 26 → AA
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A → 0, Z → 25, AA → 26
fn column_index(letters: &str) -> Option<usize> {
    letters.chars().try_fold(0usize, |acc, c| {
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase()
            .then(|| acc * 26 + (c as usize - 'A' as usize + 1))
    })
    .and_then(|n| n.checked_sub(1))
}
