//! Text rendering utilities for container diagnostics.
//!
//! Helpers to format resolution chains, shorten Rust type paths into
//! aliases, and produce "did you mean?" hints for unknown aliases.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use phi_support::rendering::render_chain;
///
/// let chain = ["Mailer", "Transport", "Mailer"];
/// assert_eq!(render_chain(&chain), "Mailer → Transport → Mailer");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    let mut out = String::new();
    for (i, step) in chain.iter().enumerate() {
        if i > 0 {
            out.push_str(" → ");
        }
        out.push_str(step.as_ref());
    }
    out
}

/// Strips module paths from a Rust type name, keeping generics.
///
/// ```
/// use phi_support::rendering::short_type_name;
///
/// assert_eq!(short_type_name("my_app::mail::Mailer"), "Mailer");
/// assert_eq!(
///     short_type_name("alloc::sync::Arc<dyn my_app::mail::Transport>"),
///     "Arc<dyn Transport>"
/// );
/// ```
pub fn short_type_name(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut chars = full_name.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '&' | '(' | ')' | '[' | ']' | ';' => {
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }

    out.push_str(&segment);
    out
}

/// Edit distance between two strings, by characters.
///
/// Optimal string alignment: insertions, deletions, substitutions and
/// swaps of two adjacent characters each cost 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut before: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 0..a.len() {
        curr[0] = i + 1;
        for j in 0..b.len() {
            let cost = usize::from(a[i] != b[j]);
            let mut best = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
            if i > 0 && j > 0 && a[i] == b[j - 1] && a[i - 1] == b[j] {
                best = best.min(before[j - 1] + 1);
            }
            curr[j + 1] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggests known aliases that look like `requested`.
///
/// Case-insensitive. Substring matches rank first, then candidates within
/// an edit distance of a third of the requested length (at least 1).
/// Ties keep the order of `available`.
pub fn suggest_similar<S: AsRef<str>>(
    requested: &str,
    available: &[S],
    max_suggestions: usize,
) -> Vec<String> {
    let wanted = requested.to_lowercase();
    let budget = (wanted.chars().count() / 3).max(1);

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let candidate = name.to_lowercase();
            if candidate.contains(&wanted) || wanted.contains(&candidate) {
                return Some((0, name));
            }
            let distance = edit_distance(&wanted, &candidate);
            (distance <= budget).then_some((distance, name))
        })
        .collect();

    scored.sort_by_key(|(score, _)| *score);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_cycle() {
        assert_eq!(render_chain(&["A", "B", "A"]), "A → B → A");
    }

    #[test]
    fn render_single_and_empty() {
        assert_eq!(render_chain(&["A"]), "A");
        let empty: [&str; 0] = [];
        assert_eq!(render_chain(&empty), "");
    }

    #[test]
    fn short_name_of_path() {
        assert_eq!(short_type_name("crate::db::Helper"), "Helper");
        assert_eq!(short_type_name("Helper"), "Helper");
    }

    #[test]
    fn short_name_keeps_generics() {
        assert_eq!(
            short_type_name("core::option::Option<alloc::string::String>"),
            "Option<String>"
        );
        assert_eq!(short_type_name("(i32, alloc::string::String)"), "(i32, String)");
    }

    #[test]
    fn distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn adjacent_swap_is_one_edit() {
        assert_eq!(edit_distance("piar", "pair"), 1);
        assert_eq!(edit_distance("ab", "ba"), 1);
        assert_eq!(edit_distance("ca", "abc"), 3);
    }

    #[test]
    fn suggests_swapped_letters_in_short_names() {
        let known = ["Pair", "Impl", "Contract"];
        assert_eq!(suggest_similar("Piar", &known, 3), vec!["Pair".to_string()]);
    }

    #[test]
    fn suggests_typos_and_substrings() {
        let known = ["db.helper", "Mailer", "Transport", "Logger"];

        let s = suggest_similar("Mailr", &known, 3);
        assert_eq!(s, vec!["Mailer".to_string()]);

        let s = suggest_similar("helper", &known, 3);
        assert_eq!(s, vec!["db.helper".to_string()]);
    }

    #[test]
    fn no_suggestion_for_unrelated_name() {
        let known = ["Database"];
        assert!(suggest_similar("Xyzzy", &known, 3).is_empty());
    }

    #[test]
    fn exact_name_is_not_suggested() {
        let known = ["Mailer"];
        assert!(suggest_similar("Mailer", &known, 3).is_empty());
    }
}
