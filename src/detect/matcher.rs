use super::catalog::Signature;

/// Decides whether evidence text contains a signature.
///
/// Analyzers only talk to this trait, so the literal substring strategy can
/// be replaced by tokenized or regex matching in one place.
pub trait Matcher: Send + Sync {
    fn is_match(&self, haystack: &str, patterns: &[&str]) -> bool;

    /// Names of every signature whose patterns hit, in declaration order.
    fn match_category(&self, haystack: &str, signatures: &[Signature]) -> Vec<&'static str> {
        if haystack.is_empty() {
            return Vec::new();
        }
        signatures
            .iter()
            .filter(|s| self.is_match(haystack, s.patterns))
            .map(|s| s.name)
            .collect()
    }
}

/// Case-insensitive literal substring matching.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn is_match(&self, haystack: &str, patterns: &[&str]) -> bool {
        if haystack.is_empty() {
            return false;
        }
        let lower = haystack.to_lowercase();
        patterns
            .iter()
            .any(|p| !p.is_empty() && lower.contains(&p.to_lowercase()))
    }

    fn match_category(&self, haystack: &str, signatures: &[Signature]) -> Vec<&'static str> {
        if haystack.is_empty() {
            return Vec::new();
        }
        // Fold once for the whole table instead of once per signature.
        let lower = haystack.to_lowercase();
        signatures
            .iter()
            .filter(|s| {
                s.patterns
                    .iter()
                    .any(|p| !p.is_empty() && lower.contains(&p.to_lowercase()))
            })
            .map(|s| s.name)
            .collect()
    }
}

/// Append `items` to `out`, skipping anything already present.
pub fn extend_unique(out: &mut Vec<String>, items: impl IntoIterator<Item = &'static str>) {
    for item in items {
        if !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::catalog::{ALL_TABLES, ANALYTICS, JS_FRAMEWORKS};

    #[test]
    fn match_is_case_insensitive() {
        let m = SubstringMatcher;
        assert!(m.is_match("REACT", &["react"]));
        assert!(m.is_match("react", &["react"]));
        assert!(m.is_match("/static/React-DOM.js", &["REACT-dom"]));
        for (_, table) in ALL_TABLES {
            for s in table.iter() {
                let upper = s.patterns[0].to_uppercase();
                assert!(m.match_category(&upper, table).contains(&s.name));
            }
        }
    }

    #[test]
    fn empty_haystack_matches_nothing() {
        let m = SubstringMatcher;
        assert!(!m.is_match("", &["react"]));
        assert!(m.match_category("", JS_FRAMEWORKS).is_empty());
    }

    #[test]
    fn labels_follow_declaration_order() {
        let m = SubstringMatcher;
        let found = m.match_category("/js/jquery.min.js /js/react.production.js", JS_FRAMEWORKS);
        assert_eq!(found, vec!["React", "jQuery"]);
    }

    #[test]
    fn literal_patterns_cross_match() {
        // "ga" inside "page" still counts; this is the documented trade-off.
        let m = SubstringMatcher;
        let found = m.match_category("<p>page</p>", ANALYTICS);
        assert_eq!(found, vec!["Google Analytics"]);
    }

    #[test]
    fn empty_pattern_never_matches() {
        const WITH_EMPTY: &[Signature] = &[Signature { name: "Blank", patterns: &[""] }];
        let m = SubstringMatcher;
        assert!(!m.is_match("anything", &[""]));
        assert!(m.match_category("anything", WITH_EMPTY).is_empty());
    }

    #[test]
    fn extend_unique_deduplicates() {
        let mut out = vec!["React".to_string()];
        extend_unique(&mut out, ["React", "jQuery", "jQuery"]);
        assert_eq!(out, vec!["React", "jQuery"]);
    }
}
