//! FASTA text rendering.

/// Render a single-record FASTA block: `>{id} | {label}` followed by the sequence.
///
/// The sequence is written on one line, unwrapped.
#[must_use]
pub fn render_record(id: &str, label: &str, sequence: &str) -> String {
    format!(">{id} | {label}\n{sequence}")
}
