use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::domain::FilterQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub score: i64,
    /// Char indices into the matched text, sorted and unique.
    pub positions: Vec<usize>,
}

pub trait CandidateMatcher {
    fn match_text(&self, query: &FilterQuery, text: &str) -> Option<MatchResult>;

    /// Indices of matching `texts`, best score first, ties in input order.
    fn rank(&self, query: &FilterQuery, texts: &[String]) -> Vec<(usize, MatchResult)> {
        let mut ranked: Vec<(usize, MatchResult)> = texts
            .iter()
            .enumerate()
            .filter_map(|(index, text)| self.match_text(query, text).map(|result| (index, result)))
            .collect();
        ranked.sort_by(|(_, left), (_, right)| right.score.cmp(&left.score));
        ranked
    }
}

/// Whitespace separated tokens must all match. Fuzzy tokens go through the
/// skim algorithm, substring tokens are matched case-insensitively.
pub struct SkimCandidateMatcher {
    fuzzy: SkimMatcherV2,
}

impl SkimCandidateMatcher {
    pub fn new() -> Self {
        Self {
            fuzzy: SkimMatcherV2::default().smart_case(),
        }
    }

    fn match_token(&self, token: &str, text: &str, fuzzy: bool) -> Option<(i64, Vec<usize>)> {
        if fuzzy {
            self.fuzzy.fuzzy_indices(text, token)
        } else {
            substring_indices(text, token)
        }
    }
}

impl Default for SkimCandidateMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateMatcher for SkimCandidateMatcher {
    fn match_text(&self, query: &FilterQuery, text: &str) -> Option<MatchResult> {
        let mut score = 0;
        let mut positions = Vec::new();

        for token in query.text.split_whitespace() {
            let (token_score, token_positions) = self.match_token(token, text, query.fuzzy)?;
            score += token_score;
            positions.extend(token_positions);
        }

        positions.sort_unstable();
        positions.dedup();

        Some(MatchResult { score, positions })
    }
}

fn substring_indices(text: &str, token: &str) -> Option<(i64, Vec<usize>)> {
    let haystack: Vec<char> = text.chars().map(fold_case).collect();
    let needle: Vec<char> = token.chars().map(fold_case).collect();

    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let start = haystack
        .windows(needle.len())
        .position(|window| window == needle.as_slice())?;

    let score = -(start as i64);
    Some((score, (start..start + needle.len()).collect()))
}

fn fold_case(character: char) -> char {
    character.to_lowercase().next().unwrap_or(character)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_query_matches_everything_in_order() {
        let matcher = SkimCandidateMatcher::new();
        let candidates = texts(&["b", "a", "c"]);

        let ranked = matcher.rank(&FilterQuery::default(), &candidates);

        let order: Vec<usize> = ranked.iter().map(|(index, _)| *index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert!(ranked.iter().all(|(_, result)| result.positions.is_empty()));
    }

    #[test]
    fn fuzzy_query_matches_subsequence() {
        let matcher = SkimCandidateMatcher::new();

        let result = matcher
            .match_text(&FilterQuery::fuzzy("ffx"), "Mozilla Firefox")
            .unwrap();

        assert_eq!(result.positions.len(), 3);
        assert!(matcher
            .match_text(&FilterQuery::fuzzy("xyz"), "Mozilla Firefox")
            .is_none());
    }

    #[test]
    fn all_tokens_must_match() {
        let matcher = SkimCandidateMatcher::new();

        assert!(matcher
            .match_text(&FilterQuery::fuzzy("fire moz"), "Mozilla Firefox")
            .is_some());
        assert!(matcher
            .match_text(&FilterQuery::fuzzy("fire term"), "Mozilla Firefox")
            .is_none());
    }

    #[test]
    fn substring_query_is_case_insensitive_and_contiguous() {
        let matcher = SkimCandidateMatcher::new();

        let result = matcher
            .match_text(&FilterQuery::substring("FIRE"), "Mozilla Firefox")
            .unwrap();

        assert_eq!(result.positions, vec![8, 9, 10, 11]);
        assert!(matcher
            .match_text(&FilterQuery::substring("ffx"), "Mozilla Firefox")
            .is_none());
    }

    #[test]
    fn positions_are_char_indices() {
        let matcher = SkimCandidateMatcher::new();

        let result = matcher
            .match_text(&FilterQuery::substring("語"), "日本語")
            .unwrap();

        assert_eq!(result.positions, vec![2]);
    }

    #[test]
    fn rank_puts_better_matches_first() {
        let matcher = SkimCandidateMatcher::new();
        let candidates = texts(&["a terminal", "terminal"]);

        let ranked = matcher.rank(&FilterQuery::substring("term"), &candidates);

        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].0, 0);
    }
}
