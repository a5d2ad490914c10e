// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`NodePath`]: a sequence of names from the ConfigTree root.
//!
//! The on-disk transaction log slash-joins path segments and
//! backslash-escapes any literal `/` or tab inside a segment name, so a
//! segment can itself contain a slash without being mistaken for a deeper
//! path.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// One segment of a [`NodePath`]. Interned as a small string since most
/// component/config names are short.
pub type Segment = SmolStr;

/// A path from the ConfigTree root to a node, as an ordered list of names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: impl IntoIterator<Item = impl Into<Segment>>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }

    /// Return the path one level up, and the final segment, if any.
    pub fn split_last(&self) -> Option<(NodePath, &str)> {
        let (last, rest) = self.0.split_last()?;
        Some((NodePath(rest.to_vec()), last.as_str()))
    }

    /// `self` is an ancestor of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    pub fn child(&self, name: impl Into<Segment>) -> NodePath {
        let mut segs = self.0.clone();
        segs.push(name.into());
        NodePath(segs)
    }

    /// Encode as the slash-joined, backslash-escaped wire form used by the
    /// transaction log.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|seg| escape_segment(seg))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Decode a slash-joined, backslash-escaped path back into segments.
    pub fn decode(encoded: &str) -> NodePath {
        if encoded.is_empty() {
            return NodePath::root();
        }
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = encoded.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                '/' => {
                    segments.push(SmolStr::from(std::mem::take(&mut current)));
                }
                other => current.push(other),
            }
        }
        segments.push(SmolStr::from(current));
        NodePath(segments)
    }
}

fn escape_segment(seg: &str) -> String {
    let mut out = String::with_capacity(seg.len());
    for c in seg.chars() {
        match c {
            '/' => out.push_str("\\/"),
            '\\' => out.push_str("\\\\"),
            '\t' => {
                out.push('\\');
                out.push('\t');
            }
            other => out.push(other),
        }
    }
    out
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.encode())
    }
}

impl From<&[&str]> for NodePath {
    fn from(segments: &[&str]) -> Self {
        NodePath::new(segments.iter().copied())
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
