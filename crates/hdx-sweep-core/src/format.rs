//! The format → mimetype / signature tables of spec.md §6, exact.

/// Mimetypes that are never used to reject a declared format (spec.md §6):
/// the server told us nothing useful, so GET+hash validation accepts it.
pub const IGNORE_MIMETYPES: &[&str] = &["application/octet-stream", "application/binary"];

/// Expected mimetypes per declared `format`, checked with substring
/// containment against the response `Content-Type` (mirrors the original's
/// `any(x in mimetype for x in expected_mimetypes)`).
pub fn expected_mimetypes(format: &str) -> Option<&'static [&'static str]> {
    Some(match format {
        "json" => &["application/json"],
        "geojson" => &["application/json", "application/geo+json"],
        "shp" => &["application/zip", "application/x-zip-compressed"],
        "csv" => &[
            "text/csv",
            "application/zip",
            "application/x-zip-compressed",
        ],
        "xls" => &["application/vnd.ms-excel"],
        "xlsx" => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        _ => return None,
    })
}

/// Expected leading-byte signatures per declared `format`.
pub fn expected_signatures(format: &str) -> Option<&'static [&'static [u8]]> {
    Some(match format {
        "json" | "geojson" => &[b"[", b" [", b"{", b" {"],
        "shp" => &[b"PK\x03\x04"],
        "xls" => &[b"\xd0\xcf\x11\xe0"],
        "xlsx" => &[b"PK\x03\x04"],
        _ => return None,
    })
}

/// The XLSX mimetype (used by the GET prober's special-case detection,
/// spec.md §4.5 step 5), as opposed to a generic accept-anything mimetype.
pub const XLSX_MIMETYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The ZIP/XLSX file signature shared by `shp` and `xlsx`.
pub const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Above this declared Content-Length (spec.md §4.5 step 3), a resource
/// without an ETag is reported too-large-to-hash without reading the body.
pub const MAX_HASHABLE_BYTES: u64 = 419_430_400; // 400 MiB

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mimetype_table_matches_spec() {
        assert_eq!(expected_mimetypes("json"), Some(&["application/json"][..]));
        assert_eq!(
            expected_mimetypes("xlsx"),
            Some(&[XLSX_MIMETYPE][..])
        );
        assert_eq!(expected_mimetypes("unknown-format"), None);
    }

    #[test]
    fn signature_table_matches_spec() {
        assert_eq!(expected_signatures("xls"), Some(&[&b"\xd0\xcf\x11\xe0"[..]][..]));
        assert_eq!(expected_signatures("shp"), Some(&[ZIP_SIGNATURE][..]));
    }
}
