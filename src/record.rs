//! Job record produced from one listing card

/// One job listing extracted from a result page
///
/// All text fields are whitespace-normalized; missing data is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobRecord {
    /// Site-assigned listing identifier (may be empty)
    pub id: String,

    /// Listing title
    pub title: String,

    /// Location/company label
    pub location: String,

    /// Free-text tag/category field
    pub hashtag: String,
}

impl JobRecord {
    /// Builds the detail-page link by appending the id to `detail_url`
    pub fn link(&self, detail_url: &str) -> String {
        format!("{}{}", detail_url, self.id)
    }
}
