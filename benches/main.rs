#[macro_use]
extern crate criterion;

use std::io::Cursor;

use criterion::{black_box, Bencher, Criterion};

use wikilinks_path::bfs::pathfind;
use wikilinks_path::ids::ArticleId;
use wikilinks_path::link_db::{write_links_table, LinkDatabase};
use wikilinks_path::name_tree::{write_name_tree, NameTree};

/// A chain `1 -> 2 -> ... -> n`, the worst case for BFS round count: every
/// round advances the frontier by exactly one id.
fn chain_links_file(n: u32) -> std::path::PathBuf {
    let adjacency: Vec<Vec<u32>> = (1..=n).map(|i| if i < n { vec![i + 1] } else { vec![] }).collect();
    let mut cur = Cursor::new(Vec::new());
    write_links_table(&mut cur, &adjacency).unwrap();
    let path = std::env::temp_dir().join("wikilinks_bench_links.bin");
    std::fs::write(&path, cur.into_inner()).unwrap();
    path
}

fn name_tree_file(titles: &[&str]) -> std::path::PathBuf {
    let mut entries: Vec<(String, u32)> =
        titles.iter().enumerate().map(|(i, t)| (t.to_string(), i as u32 + 1)).collect();
    let mut cur = Cursor::new(Vec::new());
    write_name_tree(&mut cur, &mut entries).unwrap();
    let path = std::env::temp_dir().join("wikilinks_bench_names.bin");
    std::fs::write(&path, cur.into_inner()).unwrap();
    path
}

fn bench_name_lookup(b: &mut Bencher) {
    let titles: Vec<String> = (0..10_000).map(|i| format!("article-{i}")).collect();
    let refs: Vec<&str> = titles.iter().map(|s| s.as_str()).collect();
    let path = name_tree_file(&refs);
    let mut tree = NameTree::open(&path).unwrap();
    let mut i = 0usize;
    b.iter(|| {
        let title = &titles[i % titles.len()];
        i += 1;
        black_box(tree.lookup(title).unwrap());
    });
}

fn bench_bfs_chain(b: &mut Bencher) {
    let n = 300;
    let path = chain_links_file(n);
    let db = LinkDatabase::open(&path).unwrap();
    b.iter(|| {
        black_box(pathfind(&db, ArticleId(1), ArticleId(n), 4));
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("name_tree_lookup", bench_name_lookup);
    c.bench_function("bfs_chain_2000", bench_bfs_chain);
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        // Do not use p = 0.05, we are not doing social studies here. I want to
        // actually be sure, and not be wrong 1 in 20 times, because I will run
        // the benchmark more than 20 times for sure.
        .significance_level(0.001)
        .confidence_level(0.99);
    targets = criterion_benchmark
}

criterion_main!(benches);
