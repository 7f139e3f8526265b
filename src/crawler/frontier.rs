//! Crawl frontier and visited set
//!
//! This module handles:
//! - The explicit stack of `(url, depth)` pairs awaiting dispatch
//! - Depth-bound pruning
//! - The visited set, with an atomic check-and-insert on dispatch
//!
//! Children are pushed in reverse document order, so popping the stack walks
//! the site in the same depth-first pre-order a recursive crawl would.

use std::collections::HashSet;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The normalized URL to fetch
    pub url: String,

    /// Link hops from the seed
    pub depth: u32,
}

/// Depth-first frontier with the run's visited set
#[derive(Debug)]
pub struct Frontier {
    /// Pending entries; the last element is dispatched next
    stack: Vec<FrontierEntry>,

    /// Normalized URLs already dispatched; only ever grows
    visited: HashSet<String>,

    /// Deepest level that may be dispatched
    max_depth: u32,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    pub fn new(seed: &str, max_depth: u32) -> Self {
        Self {
            stack: vec![FrontierEntry {
                url: seed.to_string(),
                depth: 0,
            }],
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Adds the outbound links of a page fetched at `parent_depth`
    ///
    /// Links already visited are skipped here; the authoritative check happens
    /// again on dispatch because an earlier sibling's subtree may reach them first.
    pub fn push_children(&mut self, links: &[String], parent_depth: u32) {
        let depth = parent_depth + 1;
        for url in links.iter().rev() {
            if !self.visited.contains(url) {
                self.stack.push(FrontierEntry {
                    url: url.clone(),
                    depth,
                });
            }
        }
    }

    /// Pops the next entry to dispatch and marks it visited
    ///
    /// Entries beyond `max_depth` or already visited are discarded. Returns
    /// `None` once the frontier is exhausted.
    pub fn next_dispatch(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.stack.pop() {
            if entry.depth > self.max_depth {
                tracing::trace!("Pruned {} at depth {}", entry.url, entry.depth);
                continue;
            }

            // HashSet::insert is the check-and-insert: false means already visited
            if !self.visited.insert(entry.url.clone()) {
                continue;
            }

            return Some(entry);
        }
        None
    }

    /// Returns whether the URL has been dispatched in this run
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of entries still waiting (including ones that will be pruned)
    pub fn pending(&self) -> usize {
        self.stack.len()
    }
}
