// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Offline indexer pipeline: a MediaWiki XML dump in, the four binary
//! index files out (spec.md §6, SPEC_FULL.md §4.8).
//!
//! Grounded in original_source's `preprocess.cpp`, collapsed from its
//! two-pass design (parse the dump once into an intermediate page-stream
//! file, then re-read that file twice more to assign ids and resolve
//! links) into a single in-memory pass: the intermediate format is itself
//! unspecified (spec.md §1 treats XML ingestion as an "external
//! collaborator"), so there is nothing to preserve by keeping a second
//! file around. Ids are assigned densely in encounter order, exactly as
//! `writeIdsNames`'s `currentID` counter does.
//!
//! Redirect pages get a one-element (or empty, if the target title is
//! unknown) adjacency list pointing at their raw target id, matching the
//! original's redirect branch in the links-writing loop: a redirect is a
//! real node in the link graph with a single outgoing edge, not a node
//! BFS skips over. `redirects.bin` is a *separate* structure consulted
//! only when an orchestrator resolves a query's source/destination title,
//! per spec.md §4.4; intermediate hops through a redirect page during BFS
//! traverse its one outgoing edge like any other link.

pub mod dump;
pub mod parse;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};
use crate::id_name::write_id_name_table;
use crate::ids::normalize_title;
use crate::link_db::write_links_table;
use crate::name_tree::write_name_tree;
use crate::redirects::write_redirect_table;
use dump::open_dump;
use parse::{for_each_page, Page};

/// A redirect chain that has not reached a non-redirect target within
/// this many hops is treated as unresolvable and dropped entirely, rather
/// than emitting an edge to whichever id the walk happened to be on. Wiki
/// dumps occasionally contain redirect cycles or chains a few hops deep
/// despite MediaWiki discouraging both; spec.md I5 only promises the
/// *emitted* table is acyclic and one hop, not that the source dump is
/// well-behaved.
const MAX_REDIRECT_HOPS: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    pub pages: u32,
    pub redirects: u32,
}

/// Parse the dump at `dump_path` and write `name_id.bin`, `id_name.bin`,
/// `links.bin` and `redirects.bin` into `out_dir`.
pub fn build_index(dump_path: &Path, out_dir: &Path) -> Result<IndexStats> {
    let reader = open_dump(dump_path).map_err(|e| Error::IndexUnreadable(dump_path.to_path_buf(), e))?;

    let mut pages: Vec<Page> = Vec::new();
    for_each_page(reader, |page| {
        if page.title.trim().is_empty() {
            log::warn!("skipping page with empty title");
            return;
        }
        pages.push(page);
    })
    .map_err(|_| Error::Malformed("dump is not well-formed XML"))?;

    log::info!("parsed {} pages from {}", pages.len(), dump_path.display());

    // Pass 1: assign dense ids and build the name -> id and redirect
    // lookups everything else resolves through.
    let mut titles: Vec<Option<String>> = Vec::with_capacity(pages.len());
    let mut name_to_id: HashMap<String, u32> = HashMap::with_capacity(pages.len());
    let mut redirect_title_by_id: HashMap<u32, String> = HashMap::new();

    for (i, page) in pages.iter().enumerate() {
        let id = (i + 1) as u32;
        let title = normalize_title(&page.title);
        // First writer wins on a duplicate title, matching
        // `writeNamesIds`'s `if (!trie.contains(title)) trie.insert(...)`.
        name_to_id.entry(title.clone()).or_insert(id);
        titles.push(Some(title));
        if let Some(target) = &page.redirect_target {
            redirect_title_by_id.insert(id, normalize_title(target));
        }
    }

    // Pass 2: flatten every redirect chain to its final, non-redirect
    // target (or leave it unresolved if the chain runs off the edge of
    // the corpus), so redirects.bin never needs more than one lookup.
    let mut redirect_pairs: Vec<(u32, u32)> = Vec::with_capacity(redirect_title_by_id.len());
    for (&src_id, target_title) in redirect_title_by_id.iter() {
        if let Some(final_id) = resolve_final_target(target_title, &name_to_id, &redirect_title_by_id) {
            if final_id != src_id {
                redirect_pairs.push((src_id, final_id));
            }
        }
    }

    // Pass 3: adjacency lists. A regular page's links are every
    // recognized `[[target]]`; a redirect page's single "link" is its own
    // target, whatever that resolves to (unflattened -- see module docs).
    let mut adjacency: Vec<Vec<u32>> = Vec::with_capacity(pages.len());
    for page in &pages {
        if let Some(target) = &page.redirect_target {
            let key = normalize_title(target);
            adjacency.push(name_to_id.get(&key).copied().into_iter().collect());
        } else {
            let mut links = Vec::with_capacity(page.link_targets.len());
            for target in &page.link_targets {
                let key = normalize_title(target);
                if let Some(&target_id) = name_to_id.get(&key) {
                    links.push(target_id);
                }
            }
            adjacency.push(links);
        }
    }

    std::fs::create_dir_all(out_dir)?;

    let mut name_entries: Vec<(String, u32)> = name_to_id.into_iter().collect();
    write_file(&out_dir.join("name_id.bin"), |w| write_name_tree(w, &mut name_entries))?;
    write_file(&out_dir.join("id_name.bin"), |w| write_id_name_table(w, &titles))?;
    write_file(&out_dir.join("links.bin"), |w| write_links_table(w, &adjacency))?;
    write_file(&out_dir.join("redirects.bin"), |w| write_redirect_table(w, &mut redirect_pairs))?;

    Ok(IndexStats { pages: pages.len() as u32, redirects: redirect_pairs.len() as u32 })
}

fn write_file<F>(path: &Path, emit: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    emit(&mut writer)?;
    Ok(())
}

/// Follow `start_title` through `redirect_title_by_id` until it names a
/// page that is not itself a redirect. Returns `None` if `start_title`
/// does not resolve to anything, if a hop along the way points at a title
/// `name_to_id` does not know about, if the chain is a cycle that never
/// reaches a non-redirect page, or if it runs past `MAX_REDIRECT_HOPS`
/// without terminating -- in every one of those cases there is no single
/// non-redirect target to record, so the caller leaves the redirect
/// unresolved rather than emitting an edge to a page that is itself still
/// a redirect (spec.md I5: every emitted redirect resolves in one hop).
fn resolve_final_target(
    start_title: &str,
    name_to_id: &HashMap<String, u32>,
    redirect_title_by_id: &HashMap<u32, String>,
) -> Option<u32> {
    let mut current = *name_to_id.get(start_title)?;
    let mut seen = HashSet::new();
    seen.insert(current);
    for _ in 0..MAX_REDIRECT_HOPS {
        let next_title = match redirect_title_by_id.get(&current) {
            Some(title) => title,
            None => return Some(current),
        };
        let next_id = *name_to_id.get(next_title)?;
        if !seen.insert(next_id) {
            return None;
        }
        current = next_id;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn resolves_direct_redirect() {
        let name_to_id = names(&[("usa", 2), ("us", 1)]);
        let mut redirects = HashMap::new();
        redirects.insert(2, "us".to_string());
        assert_eq!(resolve_final_target("us", &name_to_id, &redirects), Some(1));
    }

    #[test]
    fn flattens_a_chain() {
        let name_to_id = names(&[("a", 1), ("b", 2), ("c", 3)]);
        let mut redirects = HashMap::new();
        redirects.insert(2, "c".to_string()); // b -> c
        redirects.insert(1, "b".to_string()); // a -> b -> c
        assert_eq!(resolve_final_target("b", &name_to_id, &redirects), Some(3));
    }

    #[test]
    fn breaks_a_cycle_instead_of_looping() {
        let name_to_id = names(&[("a", 1), ("b", 2)]);
        let mut redirects = HashMap::new();
        redirects.insert(1, "b".to_string());
        redirects.insert(2, "a".to_string());
        // A pure redirect cycle never reaches a non-redirect page, so it
        // must terminate with None instead of resolving to either redirect.
        assert_eq!(resolve_final_target("a", &name_to_id, &redirects), None);
    }

    #[test]
    fn dangling_chain_target_is_none() {
        // a -> b, but b's own redirect target ("ghost") doesn't exist.
        let name_to_id = names(&[("a", 1), ("b", 2)]);
        let mut redirects = HashMap::new();
        redirects.insert(1, "b".to_string());
        redirects.insert(2, "ghost".to_string());
        assert_eq!(resolve_final_target("b", &name_to_id, &redirects), None);
    }

    #[test]
    fn unresolvable_target_is_none() {
        let name_to_id = names(&[("a", 1)]);
        let redirects = HashMap::new();
        assert_eq!(resolve_final_target("ghost", &name_to_id, &redirects), None);
    }

    #[test]
    fn builds_index_from_a_small_dump() {
        let xml = r#"<mediawiki>
  <page><title>Alpha</title><id>1</id>
    <revision><text>See [[Beta]].</text></revision></page>
  <page><title>Beta</title><id>2</id>
    <revision><text>See [[Gamma]].</text></revision></page>
  <page><title>Gamma</title><id>3</id>
    <revision><text>No links here.</text></revision></page>
  <page><title>US</title><id>4</id>
    <revision><text>See [[Alpha]].</text></revision></page>
  <page><title>USA</title><id>5</id><redirect title="US" />
    <revision><text>#REDIRECT [[US]]</text></revision></page>
</mediawiki>"#;

        let tmp = std::env::temp_dir().join(format!("wikilinks_indexer_test_{:?}", std::thread::current().id()));
        std::fs::create_dir_all(&tmp).unwrap();
        let dump_path = tmp.join("dump.xml");
        std::fs::write(&dump_path, xml).unwrap();

        let stats = build_index(&dump_path, &tmp).unwrap();
        assert_eq!(stats.pages, 5);
        assert_eq!(stats.redirects, 1);

        let mut name_tree = crate::name_tree::NameTree::open(&tmp.join("name_id.bin")).unwrap();
        let alpha_id = name_tree.lookup("alpha").unwrap();
        let beta_id = name_tree.lookup("beta").unwrap();
        assert!(alpha_id.is_valid());
        assert!(beta_id.is_valid());

        let link_db = crate::link_db::LinkDatabase::open(&tmp.join("links.bin")).unwrap();
        assert_eq!(*link_db.links(alpha_id).unwrap(), vec![beta_id.0]);

        let mut redirects = crate::redirects::RedirectTable::open(&tmp.join("redirects.bin")).unwrap();
        let usa_id = name_tree.lookup("usa").unwrap();
        let us_id = name_tree.lookup("us").unwrap();
        assert_eq!(redirects.resolve(usa_id).unwrap(), us_id);

        std::fs::remove_dir_all(&tmp).ok();
    }
}
