//! Jaro-Winkler string similarity.
//!
//! Scores are in `0.0..=1.0` and computed over Unicode scalar values.

const PREFIX_SCALE: f64 = 0.1;
const MAX_PREFIX: usize = 4;

/// Jaro-Winkler similarity of two strings.
///
/// Identical strings (including two empty ones) score 1.0; exactly one empty
/// string scores 0.0.
#[must_use]
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let jaro = jaro(&a, &b);
    let prefix = a
        .iter()
        .zip(&b)
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    #[allow(clippy::cast_precision_loss)]
    let boost = prefix as f64 * PREFIX_SCALE * (1.0 - jaro);
    (jaro + boost).min(1.0)
}

#[allow(clippy::cast_precision_loss)]
fn jaro(a: &[char], b: &[char]) -> f64 {
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ch) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        for j in start..end {
            if !b_matched[j] && b[j] == *ch {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched characters of `b`, in order, paired positionally with those of `a`.
    let b_in_order = b
        .iter()
        .zip(&b_matched)
        .filter_map(|(ch, &matched)| matched.then_some(ch));
    let transpositions = a
        .iter()
        .zip(&a_matched)
        .filter_map(|(ch, &matched)| matched.then_some(ch))
        .zip(b_in_order)
        .filter(|(x, y)| x != y)
        .count();

    let m = matches as f64;
    let t = transpositions as f64 / 2.0;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-3
    }

    #[test]
    fn identical_strings_score_one() {
        assert!((jaro_winkler("user", "user") - 1.0).abs() < f64::EPSILON);
        assert!((jaro_winkler("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_empty_string_scores_zero() {
        assert!(jaro_winkler("", "user").abs() < f64::EPSILON);
        assert!(jaro_winkler("user", "").abs() < f64::EPSILON);
    }

    #[test]
    fn nothing_in_common_scores_zero() {
        assert!(jaro_winkler("abc", "xyz").abs() < f64::EPSILON);
    }

    #[test]
    fn classic_reference_values() {
        assert!(close(jaro_winkler("MARTHA", "MARHTA"), 0.961));
        assert!(close(jaro_winkler("DWAYNE", "DUANE"), 0.840));
        assert!(close(jaro_winkler("DIXON", "DICKSONX"), 0.813));
    }

    #[test]
    fn is_symmetric() {
        let pairs = [
            ("customer", "costumer"),
            ("account", "acount"),
            ("DWAYNE", "DUANE"),
            ("order", "ordering"),
        ];
        for (a, b) in pairs {
            assert!(
                close(jaro_winkler(a, b), jaro_winkler(b, a)),
                "asymmetric for {a}/{b}"
            );
        }
    }

    #[test]
    fn shared_prefix_never_lowers_the_score() {
        // Same edit distance; only the first pair shares a prefix.
        let with_prefix = jaro_winkler("abcdx", "abcdy");
        let without_prefix = jaro_winkler("xabcd", "yabcd");
        assert!(with_prefix >= without_prefix);
    }

    #[test]
    fn score_never_exceeds_one() {
        let score = jaro_winkler("aaaaaaaa", "aaaaaaab");
        assert!(score <= 1.0);
        assert!(score > 0.9);
    }

    #[test]
    fn counts_unicode_scalars() {
        assert!(close(jaro_winkler("café", "cafe"), jaro_winkler("cafx", "cafe")));
    }
}
