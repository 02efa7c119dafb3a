//! Pattern set implementation.

use std::collections::BTreeSet;

/// Normalizes desired address starts: lowercase, strip a leading `0x`
/// marker, deduplicate.
///
/// An empty string is a valid member and means "no constraint on the
/// start of the address".
pub fn normalize_starts(raw: &[String]) -> BTreeSet<String> {
    raw.iter()
        .map(|s| {
            let lower = s.to_lowercase();
            match lower.strip_prefix("0x") {
                Some(stripped) => stripped.to_string(),
                None => lower,
            }
        })
        .collect()
}

/// Normalizes desired address ends: lowercase, deduplicate.
///
/// Ends are literal suffixes, so no prefix stripping happens here.
pub fn normalize_ends(raw: &[String]) -> BTreeSet<String> {
    raw.iter().map(|s| s.to_lowercase()).collect()
}

/// The set of acceptable start/end constraints for a search job.
///
/// A candidate address is accepted if at least one `(start, end)` pair
/// from the cross product of the two sets holds for it. Both sets are
/// stored normalized; the empty string in either set is a wildcard for
/// that side.
#[derive(Debug, Clone)]
pub struct PatternSet {
    starts: Vec<String>,
    ends: Vec<String>,
}

impl PatternSet {
    /// Builds a pattern set from raw user input.
    ///
    /// An empty input collection collapses to the single wildcard
    /// member, so a `PatternSet` always has at least one entry per side.
    pub fn new(starts: &[String], ends: &[String]) -> Self {
        let mut starts: Vec<String> = normalize_starts(starts).into_iter().collect();
        let mut ends: Vec<String> = normalize_ends(ends).into_iter().collect();

        if starts.is_empty() {
            starts.push(String::new());
        }
        if ends.is_empty() {
            ends.push(String::new());
        }

        Self { starts, ends }
    }

    /// Tests a single `(start, end)` constraint pair against an address.
    ///
    /// The caller guarantees `address` is the canonical lowercase
    /// `0x`-prefixed form and that `start`/`end` are already normalized;
    /// no allocation or normalization happens here so the predicate is
    /// safe to call once per generated key.
    #[inline]
    pub fn matches(address: &str, start: &str, end: &str) -> bool {
        let hex = address.strip_prefix("0x").unwrap_or(address);
        (start.is_empty() || hex.starts_with(start)) && (end.is_empty() || hex.ends_with(end))
    }

    /// True if any `(start, end)` pair in the cross product matches.
    ///
    /// Complexity is `O(|starts| * |ends|)` per candidate, which is fine
    /// for the handful of user-supplied patterns a job carries.
    #[inline]
    pub fn matches_any(&self, address: &str) -> bool {
        self.starts
            .iter()
            .any(|s| self.ends.iter().any(|e| Self::matches(address, s, e)))
    }

    /// The normalized start constraints.
    pub fn starts(&self) -> &[String] {
        &self.starts
    }

    /// The normalized end constraints.
    pub fn ends(&self) -> &[String] {
        &self.ends
    }

    /// Expected number of attempts before some pair matches.
    ///
    /// Each constrained hex character multiplies the search space by 16;
    /// the easiest pair in the cross product dominates.
    pub fn estimated_difficulty(&self) -> u64 {
        self.starts
            .iter()
            .flat_map(|s| self.ends.iter().map(move |e| s.len() + e.len()))
            .map(|n| 16u64.saturating_pow(n as u32))
            .min()
            .unwrap_or(1)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        match self.estimated_difficulty() {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(starts: &[&str], ends: &[&str]) -> PatternSet {
        let starts: Vec<String> = starts.iter().map(|s| s.to_string()).collect();
        let ends: Vec<String> = ends.iter().map(|s| s.to_string()).collect();
        PatternSet::new(&starts, &ends)
    }

    #[test]
    fn test_normalize_starts_collapses_case_and_prefix() {
        let raw = vec!["0xAB".to_string(), "ab".to_string(), "AB".to_string()];
        let normalized = normalize_starts(&raw);
        assert_eq!(normalized.len(), 1);
        assert!(normalized.contains("ab"));
    }

    #[test]
    fn test_normalize_ends_keeps_literal_suffix() {
        let raw = vec!["BEEF".to_string(), "beef".to_string()];
        let normalized = normalize_ends(&raw);
        assert_eq!(normalized.len(), 1);
        assert!(normalized.contains("beef"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = vec!["0xDeAd".to_string(), "beef".to_string()];
        let once: Vec<String> = normalize_starts(&raw).into_iter().collect();
        let twice = normalize_starts(&once);
        assert_eq!(once.into_iter().collect::<BTreeSet<_>>(), twice);
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let addr = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";
        assert!(PatternSet::matches(addr, "", ""));
    }

    #[test]
    fn test_matches_start_is_prefix_check() {
        let addr = "0xdeadbeef00000000000000000000000000000000";
        assert!(PatternSet::matches(addr, "dead", ""));
        assert!(!PatternSet::matches(addr, "beef", ""));
    }

    #[test]
    fn test_matches_end_is_suffix_check() {
        let addr = "0x00000000000000000000000000000000cafebabe";
        assert!(PatternSet::matches(addr, "", "babe"));
        assert!(!PatternSet::matches(addr, "", "cafe"));
    }

    #[test]
    fn test_matches_requires_both_sides() {
        let addr = "0xdead00000000000000000000000000000000beef";
        assert!(PatternSet::matches(addr, "dead", "beef"));
        assert!(!PatternSet::matches(addr, "dead", "cafe"));
    }

    #[test]
    fn test_matches_any_is_or_across_starts() {
        let patterns = set(&["ab", "cd"], &[]);
        assert!(patterns.matches_any("0xab00000000000000000000000000000000000000"));
        assert!(patterns.matches_any("0xcd00000000000000000000000000000000000000"));
        assert!(!patterns.matches_any("0xef00000000000000000000000000000000000000"));
    }

    #[test]
    fn test_cross_product_semantics() {
        let patterns = set(&["aa", "bb"], &["11", "22"]);
        assert!(patterns.matches_any("0xaa00000000000000000000000000000000000022"));
        assert!(patterns.matches_any("0xbb00000000000000000000000000000000000011"));
        assert!(!patterns.matches_any("0xcc00000000000000000000000000000000000011"));
        assert!(!patterns.matches_any("0xaa00000000000000000000000000000000000033"));
    }

    #[test]
    fn test_empty_inputs_become_wildcards() {
        let patterns = set(&[], &[]);
        assert_eq!(patterns.starts(), &[String::new()]);
        assert_eq!(patterns.ends(), &[String::new()]);
        assert!(patterns.matches_any("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn test_difficulty_uses_easiest_pair() {
        let patterns = set(&["dead", "a"], &[]);
        assert_eq!(patterns.estimated_difficulty(), 16);
        let hard = set(&["dead"], &["beef"]);
        assert_eq!(hard.estimated_difficulty(), 16u64.pow(8));
    }
}
