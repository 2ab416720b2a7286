// Wikilinks-path -- Shortest link-path finder over a wiki dump
// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The name→id lookup tree (`name_id.bin`, spec.md §4.2).
//!
//! On disk this is a binary search tree over lowercased titles, each node
//! stored at its own file offset with its children referenced by absolute
//! offset rather than by pointer (see DESIGN.md for why: offsets survive a
//! round trip through a file, pointers do not). Lookup performs one seek
//! per tree level and needs no heap state beyond the query string itself.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::byteio::{read_string, read_u16, read_u32, read_u8, write_u16, write_u32, write_u8};
use crate::ids::ArticleId;

pub struct NameTree {
    file: File,
}

impl NameTree {
    pub fn open(path: &Path) -> io::Result<NameTree> {
        Ok(NameTree { file: File::open(path)? })
    }

    /// Resolve a (pre-lowercased) title to an article id, or `ArticleId(0)`
    /// if the tree has no node for it.
    pub fn lookup(&mut self, query: &str) -> io::Result<ArticleId> {
        let mut addr: u32 = 0;

        loop {
            self.file.seek(SeekFrom::Start(addr as u64))?;
            let name_len = read_u16(&mut self.file)? as usize;
            let name = read_string(&mut self.file, name_len)?;
            let id = read_u32(&mut self.file)?;
            let child_info = read_u8(&mut self.file)?;

            let mut left = 0u32;
            let mut right = 0u32;
            if child_info & 1 != 0 {
                left = read_u32(&mut self.file)?;
            }
            if child_info & 2 != 0 {
                right = read_u32(&mut self.file)?;
            }

            addr = match query.cmp(name.as_str()) {
                std::cmp::Ordering::Equal => return Ok(ArticleId(id)),
                std::cmp::Ordering::Less => left,
                std::cmp::Ordering::Greater => right,
            };

            if addr == 0 {
                return Ok(ArticleId::INVALID);
            }
        }
    }
}

/// A balanced binary search tree built in memory from sorted (title, id)
/// pairs, for writing out as `name_id.bin`.
///
/// The indexer builds the tree by repeatedly picking the median of the
/// remaining sorted slice as the node, which keeps the tree within one
/// level of the information-theoretic minimum height without needing a
/// self-balancing insert (the original's red-black tree achieves the same
/// height bound through rotations; since we have the whole sorted key set
/// up front, median-split is simpler and needs no rebalancing logic).
enum TreeNode {
    Leaf,
    Node {
        title: String,
        id: u32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

fn build(entries: &[(String, u32)]) -> TreeNode {
    if entries.is_empty() {
        return TreeNode::Leaf;
    }
    let mid = entries.len() / 2;
    let (title, id) = entries[mid].clone();
    TreeNode::Node {
        title,
        id,
        left: Box::new(build(&entries[..mid])),
        right: Box::new(build(&entries[mid + 1..])),
    }
}

/// Write `entries` (not required to be pre-sorted) as a `name_id.bin` file.
///
/// Serialization is breadth-first with a placeholder/relocation pass,
/// mirroring original_source's `serializeBinaryTree`: every node is written
/// with its child offsets zeroed out, the file position of each zeroed
/// offset is remembered, and once every node has been written (and its
/// final offset is therefore known) a second pass seeks back and patches
/// each placeholder.
pub fn write_name_tree<W: Write + Seek>(w: &mut W, entries: &mut Vec<(String, u32)>) -> io::Result<()> {
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let root = build(entries);

    // Assign a breadth-first traversal order so root lands at offset 0.
    let mut queue: std::collections::VecDeque<&TreeNode> = std::collections::VecDeque::new();
    queue.push_back(&root);

    // Offsets of placeholder u32s that need patching, keyed by the node
    // they point to (identified by its position in traversal order).
    let mut node_order: Vec<&TreeNode> = Vec::new();
    while let Some(node) = queue.pop_front() {
        if let TreeNode::Node { left, right, .. } = node {
            if !matches!(**left, TreeNode::Leaf) {
                queue.push_back(left);
            }
            if !matches!(**right, TreeNode::Leaf) {
                queue.push_back(right);
            }
        }
        node_order.push(node);
    }

    let mut offsets: Vec<u32> = vec![0; node_order.len()];
    let mut rewrites: Vec<(u32, usize)> = Vec::new(); // (placeholder file offset, target index)

    // Map from node pointer identity to its index in node_order, so we can
    // find the index of a left/right child while writing its parent.
    let index_of = |needle: &TreeNode, order: &[&TreeNode]| -> Option<usize> {
        order.iter().position(|n| std::ptr::eq(*n, needle))
    };

    for (i, node) in node_order.iter().enumerate() {
        offsets[i] = w.stream_position()? as u32;
        let (title, id, left, right) = match node {
            TreeNode::Node { title, id, left, right } => (title, *id, left, right),
            TreeNode::Leaf => unreachable!("leaves are never enqueued"),
        };

        write_u16(w, title.len() as u16)?;
        w.write_all(title.as_bytes())?;
        write_u32(w, id)?;

        let has_left = !matches!(**left, TreeNode::Leaf);
        let has_right = !matches!(**right, TreeNode::Leaf);
        let mut child_info = 0u8;
        if has_left {
            child_info |= 1;
        }
        if has_right {
            child_info |= 2;
        }
        write_u8(w, child_info)?;

        if has_left {
            let placeholder_at = w.stream_position()? as u32;
            write_u32(w, 0)?;
            let target = index_of(left, &node_order).expect("left child was enqueued");
            rewrites.push((placeholder_at, target));
        }
        if has_right {
            let placeholder_at = w.stream_position()? as u32;
            write_u32(w, 0)?;
            let target = index_of(right, &node_order).expect("right child was enqueued");
            rewrites.push((placeholder_at, target));
        }
    }

    for (placeholder_at, target) in rewrites {
        w.seek(SeekFrom::Start(placeholder_at as u64))?;
        write_u32(w, offsets[target])?;
    }

    Ok(())
}
