//! Typo tolerant name matching shared by the pokedex and the item catalog.

use strsim::normalized_damerau_levenshtein;

/// Minimum similarity (0.0 to 1.0) for a candidate to count as a close match.
pub const MATCH_CUTOFF: f64 = 0.6;

/// Return the candidates similar to `query`, best match first.
///
/// Comparison ignores case. Candidates scoring below [`MATCH_CUTOFF`] are
/// dropped; at most `limit` are returned. Equal scores keep input order.
pub fn close_matches<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim().to_lowercase();
    let mut scored: Vec<(f64, &'a str)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = normalized_damerau_levenshtein(&query, &candidate.to_lowercase());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= MATCH_CUTOFF)
        .collect();

    // Stable sort keeps input order among equal scores.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}
