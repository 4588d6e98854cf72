//! Listing-card extraction
//!
//! Cards are captured from a parsed page as HTML snapshots so each one can be
//! handed to its own task; the extractor re-parses the snapshot and reads the
//! id attribute plus three sub-texts.
//!
//! Table rows, cells and select options only parse inside their parent
//! elements, so a snapshot is re-parsed wrapped in the ancestors its tag
//! needs and the card is located again by tag name.

use crate::config::SelectorConfig;
use crate::record::JobRecord;
use crate::scrape::normalize::normalize;
use crate::{ConfigError, ScrapeError};
use scraper::{ElementRef, Html, Selector};

/// Owned copy of one listing card, detached from its page document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    /// Position of the card on its page
    pub index: usize,

    /// URL of the page the card came from
    pub page_url: String,

    /// Outer HTML of the card element
    pub html: String,
}

impl CardSnapshot {
    pub fn new(index: usize, page_url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            index,
            page_url: page_url.into(),
            html: html.into(),
        }
    }

    /// Captures `element` as a snapshot
    pub fn from_element(index: usize, page_url: &str, element: ElementRef<'_>) -> Self {
        Self::new(index, page_url, element.html())
    }

    /// Lowercased name of the captured element, read from its opening tag
    pub fn tag(&self) -> Option<String> {
        let rest = self.html.trim_start().strip_prefix('<')?;
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        (end > 0).then(|| rest[..end].to_ascii_lowercase())
    }
}

/// Markup that must surround an element of `tag` for it to survive fragment parsing
fn fragment_context(tag: &str) -> (&'static str, &'static str) {
    match tag {
        "tr" => ("<table><tbody>", "</tbody></table>"),
        "td" | "th" => ("<table><tbody><tr>", "</tr></tbody></table>"),
        "tbody" | "thead" | "tfoot" | "caption" | "colgroup" => ("<table>", "</table>"),
        "col" => ("<table><colgroup>", "</colgroup></table>"),
        "option" | "optgroup" => ("<select>", "</select>"),
        _ => ("", ""),
    }
}

/// Compiled selectors for the fields of a card
#[derive(Debug, Clone)]
pub struct CardSelectors {
    pub id_attribute: String,
    pub title: Selector,
    pub location: Selector,
    pub hashtag: Selector,
}

impl CardSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            id_attribute: config.id_attribute.clone(),
            title: compile(&config.title)?,
            location: compile(&config.location)?,
            hashtag: compile(&config.hashtag)?,
        })
    }
}

pub(crate) fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Turns one card snapshot into a record
///
/// Implementations run concurrently on worker tasks, one call per card.
pub trait CardExtractor: Send + Sync + 'static {
    fn extract(&self, card: &CardSnapshot) -> Result<JobRecord, ScrapeError>;
}

/// Extracts records using the configured CSS selectors
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    selectors: CardSelectors,
}

impl SelectorExtractor {
    pub fn new(selectors: CardSelectors) -> Self {
        Self { selectors }
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(CardSelectors::from_config(config)?))
    }
}

impl CardExtractor for SelectorExtractor {
    fn extract(&self, card: &CardSnapshot) -> Result<JobRecord, ScrapeError> {
        let tag = card.tag().ok_or_else(|| ScrapeError::Parse {
            url: card.page_url.clone(),
            message: format!("card #{} has no element content", card.index),
        })?;

        let (open, close) = fragment_context(&tag);
        let fragment = Html::parse_fragment(&format!("{}{}{}", open, card.html, close));
        let element = fragment
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == tag)
            .ok_or_else(|| ScrapeError::Parse {
                url: card.page_url.clone(),
                message: format!("card #{} <{}> was lost when re-parsed", card.index, tag),
            })?;

        Ok(extract_record(element, &self.selectors))
    }
}

/// Reads a record out of a card element
///
/// Never fails: a missing id attribute or an unmatched sub-selector becomes an
/// empty field.
pub fn extract_record(card: ElementRef<'_>, selectors: &CardSelectors) -> JobRecord {
    let id = card
        .value()
        .attr(&selectors.id_attribute)
        .unwrap_or_default()
        .to_string();

    JobRecord {
        id,
        title: select_text(card, &selectors.title),
        location: select_text(card, &selectors.location),
        hashtag: select_text(card, &selectors.hashtag),
    }
}

/// Concatenated, normalized text of every match under `card`
fn select_text(card: ElementRef<'_>, selector: &Selector) -> String {
    let raw: String = card.select(selector).flat_map(|el| el.text()).collect();
    normalize(&raw)
}
