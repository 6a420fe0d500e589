//! Simplified GenBank-style flat record rendering.
//!
//! Only the LOCUS, DEFINITION and ORIGIN sections are written, with keywords
//! padded to the 12-column header field of the flat file layout. The sequence
//! follows ORIGIN unnumbered and unwrapped, and `//` terminates the record.

const HEADER_WIDTH: usize = 12;

fn header_line(keyword: &str, value: &str) -> String {
    format!("{keyword:<HEADER_WIDTH$}{value}")
}

/// Render a pseudo GenBank record for one sequence.
#[must_use]
pub fn render_record(id: &str, label: &str, sequence: &str) -> String {
    [
        header_line("LOCUS", id),
        header_line("DEFINITION", &format!("{label} sequence")),
        "ORIGIN".to_string(),
        sequence.to_string(),
        "//".to_string(),
    ]
    .join("\n")
}
