use scraper::Selector;

use crate::ScrapeError;

/// Raw selector strings, borrowed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSet<'a> {
    pub container: &'a str,
    pub text: &'a str,
    pub author: &'a str,
    pub tag: &'a str,
    /// Attribute read from every tag element.
    pub tag_attr: &'a str,
}

impl SelectorSet<'static> {
    /// Markup used by quotes.toscrape.com.
    pub const REFERENCE: Self = Self {
        container: ".quote",
        text: ".text",
        author: ".author",
        tag: ".tags a.tag",
        tag_attr: "href",
    };
}

/// Parsed selectors, built once and shared by every scrape.
#[derive(Debug, Clone)]
pub struct QuoteSelectors {
    pub(crate) container: Selector,
    pub(crate) text: Selector,
    pub(crate) author: Selector,
    pub(crate) tag: Selector,
    pub(crate) tag_attr: String,
}

impl QuoteSelectors {
    pub fn parse(set: SelectorSet<'_>) -> Result<Self, ScrapeError> {
        Ok(Self {
            container: compile(set.container)?,
            text: compile(set.text)?,
            author: compile(set.author)?,
            tag: compile(set.tag)?,
            tag_attr: set.tag_attr.to_string(),
        })
    }

    pub fn reference() -> Result<Self, ScrapeError> {
        Self::parse(SelectorSet::REFERENCE)
    }
}

fn compile(raw: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(raw).map_err(|e| ScrapeError::Selector {
        selector: raw.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_selectors_compile() {
        let sel = QuoteSelectors::reference().unwrap();
        assert_eq!(sel.tag_attr, "href");
    }

    #[test]
    fn bad_selector_names_the_offender() {
        let err = QuoteSelectors::parse(SelectorSet {
            author: "..author",
            ..SelectorSet::REFERENCE
        })
        .unwrap_err();
        match err {
            ScrapeError::Selector { selector, .. } => assert_eq!(selector, "..author"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
