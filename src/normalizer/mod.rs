//! Count normalization.
//!
//! Turns any UI-displayed engagement count ("1.5K", "2M", "1,234",
//! "12 replies") into an integer. Every metric strategy goes through
//! [`normalize_count`] so readings from different sources are comparable.

use std::sync::LazyLock;

use regex::Regex;

/// First numeric run, an optional magnitude suffix, and the character after it.
///
/// The trailing letter is captured so that "12 Bookmarks" or "3Bn" style text
/// is not mistaken for a `B` suffix.
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)*)([KkMmBb])?([A-Za-z])?").expect("count pattern is valid")
});

/// Normalize freeform count text to an integer.
///
/// Returns 0 when no number is found or the value does not fit.
pub fn normalize_count(text: &str) -> u64 {
    let Some(caps) = COUNT_RE.captures(text) else {
        return 0;
    };

    let run = &caps[1];
    let suffix = match (caps.get(2), caps.get(3)) {
        (Some(s), None) => s.as_str().chars().next(),
        _ => None,
    };

    let factor: u128 = match suffix.map(|c| c.to_ascii_uppercase()) {
        Some('K') => 1_000,
        Some('M') => 1_000_000,
        Some('B') => 1_000_000_000,
        _ => 1,
    };

    scale(run, factor, suffix.is_some()).unwrap_or(0)
}

/// Parse `run` as a decimal and multiply by `factor`, truncating.
///
/// Separators are grouping marks when there is no suffix and every group
/// after the first has exactly three digits ("1,234", "1.234.567"). Otherwise
/// the last separator is the decimal point ("1.5K", "1,5K", "1,234.5").
fn scale(run: &str, factor: u128, has_suffix: bool) -> Option<u64> {
    let groups: Vec<&str> = run.split(['.', ',']).collect();

    let (int_digits, frac_digits) = match groups.split_last() {
        Some((_, [])) => (run.to_string(), String::new()),
        Some((last, head)) => {
            let grouping = !has_suffix && groups[1..].iter().all(|g| g.len() == 3);
            if grouping {
                (groups.concat(), String::new())
            } else {
                (head.concat(), (*last).to_string())
            }
        }
        None => return None,
    };

    let int_part: u128 = int_digits.parse().ok()?;
    let mut value = int_part.checked_mul(factor)?;

    if !frac_digits.is_empty() {
        // Digits beyond the factor's precision cannot change the truncated result.
        let frac = &frac_digits[..frac_digits.len().min(18)];
        let numerator: u128 = frac.parse().ok()?;
        let denominator = 10u128.checked_pow(frac.len() as u32)?;
        value = value.checked_add(numerator.checked_mul(factor)? / denominator)?;
    }

    u64::try_from(value).ok()
}

/// Whether `text` looks like a standalone count ("12", "1.5K", "3,400").
pub fn is_count_like(text: &str) -> bool {
    static STANDALONE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\d+(?:[.,]\d+)*[KkMmBb]?$").expect("standalone count pattern is valid")
    });
    STANDALONE_RE.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(normalize_count("0"), 0);
        assert_eq!(normalize_count("42"), 42);
        assert_eq!(normalize_count("  917 "), 917);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(normalize_count(""), 0);
        assert_eq!(normalize_count("Like"), 0);
        assert_eq!(normalize_count("K"), 0);
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(normalize_count("1.5K"), 1500);
        assert_eq!(normalize_count("2M"), 2_000_000);
        assert_eq!(normalize_count("3B"), 3_000_000_000);
        assert_eq!(normalize_count("2.3k"), 2300);
        assert_eq!(normalize_count("1.1K"), 1100);
        assert_eq!(normalize_count("12.345K"), 12345);
        assert_eq!(normalize_count("4.56789M"), 4_567_890);
    }

    #[test]
    fn test_decimal_comma_with_suffix() {
        assert_eq!(normalize_count("1,5K"), 1500);
    }

    #[test]
    fn test_grouping_separators() {
        assert_eq!(normalize_count("1,234"), 1234);
        assert_eq!(normalize_count("1.234"), 1234);
        assert_eq!(normalize_count("12,345,678"), 12_345_678);
        assert_eq!(normalize_count("1,234.5"), 1234);
    }

    #[test]
    fn test_counts_inside_labels() {
        assert_eq!(normalize_count("1,234 Likes. Like"), 1234);
        assert_eq!(normalize_count("12 replies"), 12);
        assert_eq!(normalize_count("5.2K views"), 5200);
    }

    #[test]
    fn test_letter_after_suffix_is_not_a_magnitude() {
        assert_eq!(normalize_count("12Bookmarks"), 12);
    }

    #[test]
    fn test_idempotent_on_normalized_output() {
        for input in ["0", "7", "1500", "2000000", "1,234", "9.9K"] {
            let once = normalize_count(input);
            assert_eq!(normalize_count(&once.to_string()), once);
        }
    }

    #[test]
    fn test_overflow_yields_zero() {
        assert_eq!(normalize_count("99999999999999999999999B"), 0);
    }

    #[test]
    fn test_is_count_like() {
        assert!(is_count_like("12"));
        assert!(is_count_like("1.5K"));
        assert!(is_count_like(" 3,400 "));
        assert!(!is_count_like("Reply"));
        assert!(!is_count_like("12 replies"));
        assert!(!is_count_like(""));
    }
}
