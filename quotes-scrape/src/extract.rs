use quotes_common::Quote;
use scraper::{ElementRef, Html, Selector};

use crate::QuoteSelectors;

/// Extract every quote container from `html`, in document order.
///
/// Text fields are the trimmed concatenation of all matching descendants;
/// tags are the trimmed tag attribute of each matching element, skipping
/// elements that lack it. No container yields an empty vector.
pub fn extract_quotes(html: &str, selectors: &QuoteSelectors) -> Vec<Quote> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.container)
        .map(|container| Quote {
            text: child_text(&container, &selectors.text),
            author: child_text(&container, &selectors.author),
            tags: child_attrs(&container, &selectors.tag, &selectors.tag_attr),
        })
        .collect()
}

fn child_text(el: &ElementRef<'_>, selector: &Selector) -> String {
    el.select(selector)
        .flat_map(|child| child.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn child_attrs(el: &ElementRef<'_>, selector: &Selector, attr: &str) -> Vec<String> {
    el.select(selector)
        .filter_map(|child| child.value().attr(attr))
        .map(|v| v.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectorSet;

    fn reference() -> QuoteSelectors {
        QuoteSelectors::reference().unwrap()
    }

    fn quote_block(text: &str, author: &str, tags: &[&str]) -> String {
        let links: String = tags
            .iter()
            .map(|t| format!(r#"<a class="tag" href="/tag/{t}/page/1/">{t}</a>"#))
            .collect();
        format!(
            r#"<div class="quote">
  <span class="text">{text}</span>
  <span>by <small class="author">{author}</small></span>
  <div class="tags">Tags: {links}</div>
</div>"#
        )
    }

    #[test]
    fn extracts_single_quote_with_href_tags() {
        let html = format!(
            "<html><body>{}</body></html>",
            quote_block("Test quote.", "Jane Doe", &["wisdom", "life"])
        );
        let quotes = extract_quotes(&html, &reference());
        assert_eq!(
            quotes,
            vec![Quote::new(
                "Test quote.",
                "Jane Doe",
                vec!["/tag/wisdom/page/1/".into(), "/tag/life/page/1/".into()],
            )]
        );
    }

    #[test]
    fn keeps_document_order() {
        let body: String = (0..5)
            .map(|i| quote_block(&format!("q{i}"), &format!("a{i}"), &[]))
            .collect();
        let quotes = extract_quotes(&body, &reference());
        let texts: Vec<_> = quotes.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["q0", "q1", "q2", "q3", "q4"]);
    }

    #[test]
    fn no_containers_yields_empty() {
        assert!(extract_quotes("<html><body><p>nothing</p></body></html>", &reference()).is_empty());
        assert!(extract_quotes("", &reference()).is_empty());
    }

    #[test]
    fn missing_fields_become_empty() {
        let html = r#"<div class="quote"><div class="tags"></div></div>"#;
        let quotes = extract_quotes(html, &reference());
        assert_eq!(quotes, vec![Quote::new("", "", vec![])]);
    }

    #[test]
    fn trims_whitespace_and_decodes_entities() {
        let html = r#"<div class="quote">
            <span class="text">
                “It&#39;s &amp; fine.”
            </span>
            <small class="author"> Albert Einstein </small>
        </div>"#;
        let quotes = extract_quotes(html, &reference());
        assert_eq!(quotes[0].text, "“It's & fine.”");
        assert_eq!(quotes[0].author, "Albert Einstein");
    }

    #[test]
    fn tag_links_without_href_are_skipped() {
        let html = r#"<div class="quote"><div class="tags">
            <a class="tag" href="/tag/a/">a</a>
            <a class="tag">b</a>
            <a class="other" href="/tag/c/">c</a>
            <a class="tag" href="/tag/d/">d</a>
        </div></div>"#;
        let quotes = extract_quotes(html, &reference());
        assert_eq!(quotes[0].tags, vec!["/tag/a/", "/tag/d/"]);
    }

    #[test]
    fn tag_attribute_values_are_trimmed() {
        let html = "<div class=\"quote\"><div class=\"tags\">\
            <a class=\"tag\" href=\"\n  /tag/life/page/1/  \n\">life</a>\
            <a class=\"tag\" href=\" /tag/love/ \">love</a>\
            </div></div>";
        let quotes = extract_quotes(html, &reference());
        assert_eq!(quotes[0].tags, vec!["/tag/life/page/1/", "/tag/love/"]);
    }

    #[test]
    fn tag_links_outside_tags_block_are_ignored() {
        let html = r#"<div class="quote">
            <a class="tag" href="/stray/">stray</a>
            <div class="tags"><a class="tag" href="/tag/kept/">kept</a></div>
        </div>"#;
        let quotes = extract_quotes(html, &reference());
        assert_eq!(quotes[0].tags, vec!["/tag/kept/"]);
    }

    #[test]
    fn custom_selectors_are_honoured() {
        let selectors = QuoteSelectors::parse(SelectorSet {
            container: "article",
            text: "p",
            author: "cite",
            tag: "li a",
            tag_attr: "data-tag",
        })
        .unwrap();
        let html = r#"<article><p>Hello</p><cite>Me</cite>
            <ul><li><a data-tag="x">x</a></li><li><a data-tag="y">y</a></li></ul></article>"#;
        let quotes = extract_quotes(html, &selectors);
        assert_eq!(quotes, vec![Quote::new("Hello", "Me", vec!["x".into(), "y".into()])]);
    }
}
