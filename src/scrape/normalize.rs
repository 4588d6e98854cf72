//! Whitespace normalization for extracted text

/// Trims `raw` and collapses every run of whitespace into a single space
///
/// Total over all input; an empty or all-whitespace string yields `""`.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
