//! The XLSX canonical-row digest (spec.md §4.5 step 5): a second MD5 pass
//! over the parsed worksheet rows rather than the raw bytes, so a resave that
//! only reshuffles non-content metadata (modified time, calc chain, shared
//! strings order) doesn't register as a content change.
//!
//! Ported from the original's `openpyxl`-based `xlsx_md5hash`; `calamine` is
//! the idiomatic Rust counterpart for reading an in-memory `.xlsx` workbook.

use calamine::{Data, Reader, Xlsx};
use md5::{Digest, Md5};
use std::io::Cursor;

/// Computes the canonical digest of an in-memory `.xlsx` buffer: every
/// worksheet, in workbook order, every row's cells rendered with Rust's
/// `Debug` formatting and fed to one running MD5 hash, matching the
/// original's `str(cols)` accumulation per row.
pub fn xlsx_canonical_digest(buffer: &[u8]) -> calamine::Result<String> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(buffer))?;
    let mut hasher = Md5::new();

    for sheet_name in workbook.sheet_names().to_owned() {
        let range = workbook.worksheet_range(&sheet_name)?;
        for row in range.rows() {
            hasher.update(row_repr(row).as_bytes());
        }
    }

    Ok(hex_encode(&hasher.finalize()))
}

fn row_repr(row: &[Data]) -> String {
    let cells: Vec<String> = row.iter().map(|cell| format!("{cell:?}")).collect();
    format!("({})", cells.join(", "))
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_repr_matches_python_tuple_style() {
        assert_eq!(
            row_repr(&[Data::String("a".to_string()), Data::Int(1)]),
            "(String(\"a\"), Int(1))"
        );
    }

    #[test]
    fn hex_encode_pads_single_digit_bytes() {
        assert_eq!(hex_encode(&[0x0a, 0xff, 0x00]), "0aff00");
    }

    #[test]
    fn garbage_buffer_is_an_error_not_a_panic() {
        let err = xlsx_canonical_digest(b"not a zip file at all");
        assert!(err.is_err());
    }
}
