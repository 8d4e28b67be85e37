//! Candidate-link extraction and URL normalization.
//!
//! These are pure functions over HTML so they can be tested without a
//! browser. Anchors are collected in document order; duplicates are dropped
//! on a first-seen basis since revisiting the same page can only repeat its
//! text.

use std::collections::HashSet;

use quarry_common::DocsSite;
use scraper::{Html, Selector as CssSelector};

/// Absolutize an href against the documentation site.
///
/// Root-relative hrefs are joined to the host, bare relative hrefs to the
/// docs base path, and anything already carrying a scheme is kept as-is.
///
/// ```
/// use quarry_common::DocsSite;
/// use quarry_web::links::normalize_href;
///
/// let site = DocsSite::default();
/// assert_eq!(normalize_href(&site, "/api/foo"), "https://docs.pola.rs/api/foo");
/// assert_eq!(
///     normalize_href(&site, "bar.html"),
///     "https://docs.pola.rs/api/python/stable/bar.html"
/// );
/// assert_eq!(normalize_href(&site, "https://other.example/x"), "https://other.example/x");
/// ```
pub fn normalize_href(site: &DocsSite, href: &str) -> String {
    // FIXME(normalize): protocol-relative hrefs ("//host/path") land in the
    // root-relative branch and get joined to the docs host. None appear on
    // the docs site today, but a dedicated branch would be safer.
    if href.starts_with('/') {
        format!("{}{}", site.host, href)
    } else if !href.starts_with("http") {
        format!("{}{}", site.base_path, href)
    } else {
        href.to_string()
    }
}

/// Links inside a located results container, normalized.
pub fn container_links(inner_html: &str, site: &DocsSite) -> Vec<String> {
    let fragment = Html::parse_fragment(inner_html);
    dedup_first_seen(hrefs(&fragment).into_iter().map(|h| normalize_href(site, &h)))
}

/// Links anywhere on the page that plausibly point at documentation:
/// the href mentions the library (case-insensitive) or contains `/api/`.
/// Keeps navigation and footer chrome out of the results.
pub fn relevant_links(html: &str, site: &DocsSite) -> Vec<String> {
    let document = Html::parse_document(html);
    let library = site.library.to_lowercase();
    dedup_first_seen(
        hrefs(&document)
            .into_iter()
            .filter(|h| h.to_lowercase().contains(&library) || h.contains("/api/"))
            .map(|h| normalize_href(site, &h)),
    )
}

fn hrefs(html: &Html) -> Vec<String> {
    let anchor = CssSelector::parse("a[href]").expect("static selector");
    html.select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

fn dedup_first_seen<I: IntoIterator<Item = String>>(urls: I) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> DocsSite {
        DocsSite::default()
    }

    #[test]
    fn root_relative_hrefs_join_the_host() {
        assert_eq!(
            normalize_href(&site(), "/api/foo"),
            "https://docs.pola.rs/api/foo"
        );
    }

    #[test]
    fn bare_relative_hrefs_join_the_base_path() {
        assert_eq!(
            normalize_href(&site(), "bar.html"),
            "https://docs.pola.rs/api/python/stable/bar.html"
        );
    }

    #[test]
    fn absolute_hrefs_pass_through() {
        assert_eq!(
            normalize_href(&site(), "https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn container_links_keep_document_order() {
        let html = r#"
            <ul>
              <li><a href="/api/python/stable/reference/a.html">a</a></li>
              <li><a href="b.html">b</a></li>
              <li><a href="https://docs.pola.rs/c.html">c</a></li>
            </ul>
        "#;
        assert_eq!(
            container_links(html, &site()),
            vec![
                "https://docs.pola.rs/api/python/stable/reference/a.html",
                "https://docs.pola.rs/api/python/stable/b.html",
                "https://docs.pola.rs/c.html",
            ]
        );
    }

    #[test]
    fn container_links_drop_repeats_but_keep_first_position() {
        let html = r#"
            <a href="a.html">one</a>
            <a href="b.html">two</a>
            <a href="a.html">one again</a>
        "#;
        assert_eq!(
            container_links(html, &site()),
            vec![
                "https://docs.pola.rs/api/python/stable/a.html",
                "https://docs.pola.rs/api/python/stable/b.html",
            ]
        );
    }

    #[test]
    fn anchors_without_href_text_are_ignored() {
        let html = r#"<a href="">empty</a><a name="x">no href</a><a href="real.html">ok</a>"#;
        assert_eq!(
            container_links(html, &site()),
            vec!["https://docs.pola.rs/api/python/stable/real.html"]
        );
    }

    #[test]
    fn relevant_links_filter_out_site_chrome() {
        let html = r#"
            <html><body>
              <nav><a href="/about.html">About</a></nav>
              <a href="/api/python/stable/reference/frame.html">frame</a>
              <a href="https://example.com/Polars-guide">guide</a>
              <a href="https://example.com/unrelated">nope</a>
            </body></html>
        "#;
        assert_eq!(
            relevant_links(html, &site()),
            vec![
                "https://docs.pola.rs/api/python/stable/reference/frame.html",
                "https://example.com/Polars-guide",
            ]
        );
    }

    #[test]
    fn relevant_links_match_the_library_case_insensitively() {
        let html = r#"<a href="/user-guide/POLARS-intro.html">intro</a>"#;
        assert_eq!(
            relevant_links(html, &site()),
            vec!["https://docs.pola.rs/user-guide/POLARS-intro.html"]
        );
    }
}
