//! Name similarity scoring.
//!
//! A single deterministic scoring strategy behind a small trait so tests
//! can inject a stub scorer.

/// Capability to rank candidate names against a query.
pub trait Scorer: Send + Sync {
    /// Similarity in `[0.0, 1.0]`, higher is more similar. Must be
    /// deterministic for fixed inputs.
    fn score(&self, candidate: &str, query: &str) -> f64;
}

/// Default scorer combining exact match, initialism match, containment,
/// token overlap, and edit-distance similarity.
///
/// The initialism rule is what makes "vm" land on "Virtual Machines"
/// without an alias table: a query matching the initials of the
/// candidate's words scores just below exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSimilarity;

impl Scorer for NameSimilarity {
    fn score(&self, candidate: &str, query: &str) -> f64 {
        let candidate = candidate.trim().to_lowercase();
        let query = query.trim().to_lowercase();

        if candidate.is_empty() || query.is_empty() {
            return 0.0;
        }
        if candidate == query {
            return 1.0;
        }

        let mut score: f64 = 0.0;

        if initials(&candidate) == query || initials_without_azure(&candidate) == query {
            score = score.max(0.95);
        }

        // Containment only counts for fragments long enough to be
        // meaningful; two-letter hints are handled by the initialism rule.
        let shorter = query.len().min(candidate.len());
        if shorter >= 3 && (candidate.contains(&query) || query.contains(&candidate)) {
            let ratio = shorter as f64 / query.len().max(candidate.len()) as f64;
            score = score.max(0.7 + 0.25 * ratio);
        }

        let overlap = token_overlap(&candidate, &query);
        let edit = edit_similarity(&candidate, &query);
        score.max(0.6 * overlap + 0.4 * edit)
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

// Service names often carry an "Azure" prefix the user omits
// ("aks" for "Azure Kubernetes Service", "kv" for "Azure Key Vault").
fn initials_without_azure(name: &str) -> String {
    name.split_whitespace()
        .filter(|word| *word != "azure")
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Jaccard overlap of whitespace tokens.
fn token_overlap(a: &str, b: &str) -> f64 {
    let tokens_a: std::collections::HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: std::collections::HashSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

/// Levenshtein distance normalized to a similarity in `[0, 1]`.
fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Rank `candidates` by descending score, ties broken alphabetically.
///
/// Deterministic for a fixed candidate set and scorer.
pub fn rank_candidates<'a>(
    scorer: &dyn Scorer,
    candidates: impl IntoIterator<Item = &'a str>,
    query: &str,
) -> Vec<(String, f64)> {
    let mut scored: Vec<(String, f64)> = candidates
        .into_iter()
        .map(|c| (c.to_string(), scorer.score(c, query)))
        .collect();
    scored.sort_by(|(name_a, score_a), (name_b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| name_a.cmp(name_b))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(NameSimilarity.score("Virtual Machines", "virtual machines"), 1.0);
    }

    #[test]
    fn test_initialism() {
        let score = NameSimilarity.score("Virtual Machines", "vm");
        assert!(score >= 0.95, "vm should match Virtual Machines, got {score}");

        let score = NameSimilarity.score("Azure Kubernetes Service", "aks");
        assert!(score >= 0.95, "aks should match, got {score}");

        let score = NameSimilarity.score("Azure Kubernetes Service", "ks");
        assert!(score >= 0.95, "azure-stripped initials should match, got {score}");
    }

    #[test]
    fn test_containment_and_overlap() {
        let score = NameSimilarity.score("Azure App Service", "app service");
        assert!(score > 0.6, "app service should clear threshold, got {score}");
    }

    #[test]
    fn test_unrelated_names_score_low() {
        let score = NameSimilarity.score("Virtual Machines", "totally-unknown-xyz");
        assert!(score < 0.5, "unrelated hint scored {score}");
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn test_rank_is_deterministic_with_alphabetical_ties() {
        struct Constant;
        impl Scorer for Constant {
            fn score(&self, _: &str, _: &str) -> f64 {
                0.5
            }
        }

        let ranked = rank_candidates(&Constant, ["Zeta", "Alpha", "Mid"], "x");
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Alpha", "Mid", "Zeta"]);
    }
}
