// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Hearth Authors

//! [`PlatformResolver`]: tag-ranked selection of platform-specific config
//! subtrees.
//!
//! Spec §9 leaves same-rank tie-breaking undefined; this resolves it (per
//! the Open Question decision recorded in `DESIGN.md`) by deterministic
//! lexicographic ordering of the tag name.

use indexmap::IndexMap;

/// The current host's platform, expressed as tags with explicit ranks —
/// lower is more specific. Unlike a plain ordered list, two tags are
/// allowed to share a rank (e.g. an OS tag and an architecture tag that are
/// both "one level more specific than `all`"), which is exactly the case
/// the tie-break rule below exists for.
#[derive(Debug, Clone)]
pub struct Platform {
    tags: Vec<(String, u32)>,
}

impl Platform {
    /// Build from `(tag, rank)` pairs.
    pub fn new(tags: impl IntoIterator<Item = (impl Into<String>, u32)>) -> Self {
        Self { tags: tags.into_iter().map(|(t, r)| (t.into(), r)).collect() }
    }

    /// The running host's platform, synthesized from `std::env::consts`.
    /// Rank 0 is the most specific (`os-arch`); the bare `os` and `arch`
    /// tags tie at rank 1, since neither is more specific than the other;
    /// `all` is the universal fallback at rank 2.
    pub fn current() -> Self {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        Self::new([(format!("{os}-{arch}"), 0), (os.to_string(), 1), (arch.to_string(), 1), ("all".to_string(), 2)])
    }

    pub fn tags(&self) -> &[(String, u32)] {
        &self.tags
    }

    /// Rank of `tag` for this platform, `None` if the tag does not apply to
    /// this platform at all.
    fn rank(&self, tag: &str) -> Option<u32> {
        self.tags.iter().find(|(t, _)| t == tag).map(|(_, r)| *r)
    }
}

/// Selects the best-ranked key of a platform-keyed map for the current
/// [`Platform`].
pub struct PlatformResolver {
    platform: Platform,
}

impl PlatformResolver {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn for_current_host() -> Self {
        Self::new(Platform::current())
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Pick the best-matching key from `subtree`'s keys: the tag with the
    /// lowest (most specific) rank for this platform. Ties broken
    /// lexicographically by tag name. Returns `None` if no key in `subtree`
    /// matches any of this platform's tags.
    pub fn select<'a, V>(&self, subtree: &'a IndexMap<String, V>) -> Option<(&'a str, &'a V)> {
        subtree
            .iter()
            .filter_map(|(tag, value)| self.platform.rank(tag).map(|rank| (rank, tag, value)))
            .min_by(|(rank_a, tag_a, _), (rank_b, tag_b, _)| rank_a.cmp(rank_b).then_with(|| tag_a.cmp(tag_b)))
            .map(|(_, tag, value)| (tag.as_str(), value))
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
