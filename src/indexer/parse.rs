// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Streaming extraction of `<page>` elements from the MediaWiki export XML
//! format, grounded in original_source's `wikiparse.cpp`, which walks the
//! same `<page><title>/<redirect>/<revision><text>` shape by hand with a
//! SAX-style state machine. `quick-xml` gives us the same push-based,
//! allocation-light parsing without hand-rolling the state machine.

use std::io::Read;

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]|#]+)(?:#[^\]|]*)?(?:\|[^\]]*)?\]\]").unwrap());

/// One parsed page: its title, an optional redirect target title, and the
/// titles of every `[[wiki link]]` found in its text (for a redirect page
/// these are ignored by the caller, since a redirect page's only outgoing
/// edge is its redirect target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub redirect_target: Option<String>,
    pub link_targets: Vec<String>,
}

/// Extract every `[[...]]` link target from raw wikitext, stripping any
/// `#section` anchor or `|display text` suffix. Interwiki/namespaced
/// targets (e.g. `File:`, `Category:`) are returned as-is; the caller
/// decides whether a target resolves to a known article.
pub fn extract_link_targets(text: &str) -> Vec<String> {
    WIKI_LINK
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse every `<page>` out of `reader`, calling `on_page` for each one as
/// it completes. Pages are handled one at a time rather than collected
/// into a `Vec<Page>` internally, so the caller controls how much of the
/// dump is held in memory at once.
pub fn for_each_page<R: Read, F: FnMut(Page)>(reader: R, mut on_page: F) -> quick_xml::Result<()> {
    let mut xml = Reader::from_reader(std::io::BufReader::new(reader));
    xml.trim_text(true);

    let mut buf = Vec::new();
    let mut tag_stack: Vec<String> = Vec::new();

    let mut in_page = false;
    let mut title: Option<String> = None;
    let mut redirect_target: Option<String> = None;
    let mut text = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "page" {
                    in_page = true;
                    title = None;
                    redirect_target = None;
                    text.clear();
                }
                if in_page && name == "redirect" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"title" {
                            redirect_target = Some(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
                tag_stack.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if in_page && name == "redirect" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"title" {
                            redirect_target = Some(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
            }
            Event::Text(e) => {
                if !in_page {
                    continue;
                }
                let current = tag_stack.last().map(|s| s.as_str()).unwrap_or("");
                let unescaped = e.unescape().unwrap_or_default();
                match current {
                    "title" => title = Some(unescaped.into_owned()),
                    "text" => text.push_str(&unescaped),
                    _ => {}
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "page" {
                    in_page = false;
                    if let Some(title) = title.take() {
                        let link_targets = if redirect_target.is_some() {
                            Vec::new()
                        } else {
                            extract_link_targets(&text)
                        };
                        on_page(Page { title, redirect_target: redirect_target.take(), link_targets });
                    }
                }
                tag_stack.pop();
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<mediawiki>
  <page>
    <title>Alpha</title>
    <ns>0</ns>
    <id>1</id>
    <revision>
      <text>See [[Beta]] and [[Gamma|the third letter]] and [[Beta#History]].</text>
    </revision>
  </page>
  <page>
    <title>Redirected</title>
    <ns>0</ns>
    <id>2</id>
    <redirect title="Alpha" />
    <revision>
      <text>#REDIRECT [[Alpha]]</text>
    </revision>
  </page>
</mediawiki>"#;

    #[test]
    fn extracts_link_targets_without_anchors_or_display_text() {
        let targets = extract_link_targets("See [[Beta]] and [[Gamma|the third letter]] and [[Beta#History]].");
        assert_eq!(targets, vec!["Beta".to_string(), "Gamma".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn parses_pages_and_redirects() {
        let mut pages = Vec::new();
        for_each_page(SAMPLE.as_bytes(), |page| pages.push(page)).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].title, "Alpha");
        assert_eq!(pages[0].redirect_target, None);
        assert_eq!(pages[0].link_targets, vec!["Beta".to_string(), "Gamma".to_string(), "Beta".to_string()]);

        assert_eq!(pages[1].title, "Redirected");
        assert_eq!(pages[1].redirect_target, Some("Alpha".to_string()));
        assert!(pages[1].link_targets.is_empty());
    }
}
