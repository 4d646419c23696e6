use std::collections::HashMap;

/// Count token occurrences and return the top `limit` as (token, count),
/// most frequent first. Ties are broken by first occurrence in the input,
/// so equal counts always rank in a stable order.
pub fn rank<I>(tokens: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new(); // token -> (count, first_seen)
    for (i, token) in tokens.into_iter().enumerate() {
        let entry = counts.entry(token).or_insert((0, i));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(token, (count, _))| (token, count))
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_and_orders_by_frequency() {
        let ranked = rank(toks(&["go", "go", "rust", "go", "rust"]), 2);
        assert_eq!(ranked, vec![("go".to_string(), 3), ("rust".to_string(), 2)]);
    }

    #[test]
    fn ties_broken_by_first_occurrence() {
        let ranked = rank(toks(&["b", "a", "b", "a", "c"]), 10);
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn limit_caps_output() {
        let ranked = rank(toks(&["a", "b", "c", "d"]), 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
