pub(super) fn score_match(q: &str, candidate: &str) -> i32 {
    let q = q.to_lowercase();
    let c = candidate.to_lowercase();
    if c == q {
        return 100;
    }
    if c.starts_with(&q) {
        return 50 - (c.len() as i32 - q.len() as i32).min(40);
    }
    if c.contains(&q) {
        return 10;
    }
    if is_subsequence(&q, &c) {
        return 1;
    }
    0
}

fn is_subsequence(q: &str, c: &str) -> bool {
    let mut it = c.chars();
    q.chars().all(|qc| it.any(|cc| cc == qc))
}

/// Indices of candidates matching `query`, best match first. Ties keep input order.
/// An empty query matches everything in order.
pub(super) fn filter_indices<'a>(
    query: &str,
    candidates: impl Iterator<Item = (&'a str, Option<&'a str>)>,
) -> Vec<usize> {
    let query = query.trim();
    let mut scored: Vec<(i32, usize)> = candidates
        .enumerate()
        .filter_map(|(i, (title, subtitle))| {
            if query.is_empty() {
                return Some((0, i));
            }
            let score = score_match(query, title)
                .max(subtitle.map(|s| score_match(query, s) / 2).unwrap_or(0));
            (score > 0).then_some((score, i))
        })
        .collect();
    scored.sort_by(|(sa, ia), (sb, ib)| sb.cmp(sa).then_with(|| ia.cmp(ib)));
    scored.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
#[path = "../tests/tui_shell/suggest_tests.rs"]
mod tests;
