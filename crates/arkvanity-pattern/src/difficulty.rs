//! Difficulty estimation for match rules

use crate::JobSpec;

/// Expected attempts for a single pattern anchored at one end of the address
fn pattern_difficulty(pattern: &str, alphabet_size: usize, case_insensitive: bool) -> f64 {
    let base_difficulty = (alphabet_size as f64).powi(pattern.len() as i32);

    if case_insensitive {
        // Each letter now matches two symbols
        let num_letters = pattern.chars().filter(|c| c.is_ascii_alphabetic()).count();
        base_difficulty / (2.0_f64).powi(num_letters as i32)
    } else {
        base_difficulty
    }
}

/// Calculate the difficulty (expected number of candidates) for a job
pub fn calculate_difficulty(job: &JobSpec, alphabet_size: usize) -> f64 {
    if job.is_skipped() {
        return f64::INFINITY;
    }

    let ci = job.is_case_insensitive();
    let prefix = (!job.prefix_value().is_empty())
        .then(|| pattern_difficulty(job.prefix_value(), alphabet_size, ci));
    let suffix = (!job.suffix_value().is_empty())
        .then(|| pattern_difficulty(job.suffix_value(), alphabet_size, ci));

    match (prefix, suffix) {
        (Some(p), Some(s)) if job.requires_both() => p * s,
        // Either end may hit: probabilities add
        (Some(p), Some(s)) => 1.0 / (1.0 / p + 1.0 / s),
        (Some(d), None) | (None, Some(d)) => d,
        (None, None) => f64::INFINITY,
    }
}

/// Format difficulty as human-readable string
pub fn format_difficulty(difficulty: f64) -> String {
    if !difficulty.is_finite() {
        "∞".to_string()
    } else if difficulty >= 1e15 {
        format!("{:.2}P", difficulty / 1e15)
    } else if difficulty >= 1e12 {
        format!("{:.2}T", difficulty / 1e12)
    } else if difficulty >= 1e9 {
        format!("{:.2}G", difficulty / 1e9)
    } else if difficulty >= 1e6 {
        format!("{:.2}M", difficulty / 1e6)
    } else if difficulty >= 1e3 {
        format!("{:.2}K", difficulty / 1e3)
    } else {
        format!("{:.0}", difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_calculation() {
        // Hex alphabet (16 chars), 4 char prefix
        let diff = calculate_difficulty(&JobSpec::prefix("dead"), 16);
        assert_eq!(diff, 65536.0);
    }

    #[test]
    fn test_case_insensitive_reduces_difficulty() {
        let case_sensitive = calculate_difficulty(&JobSpec::prefix("dead"), 58);
        let case_insensitive = calculate_difficulty(&JobSpec::prefix("dead").case_insensitive(), 58);
        assert!(case_insensitive < case_sensitive);
    }

    #[test]
    fn test_and_is_harder_than_or() {
        let and = calculate_difficulty(&JobSpec::new("AB", "EF", true, false), 58);
        let or = calculate_difficulty(&JobSpec::new("AB", "EF", false, false), 58);
        let single = calculate_difficulty(&JobSpec::prefix("AB"), 58);

        assert_eq!(and, 58f64.powi(4));
        assert!((or - single / 2.0).abs() < 1e-6);
        assert!(or < single && single < and);
    }

    #[test]
    fn test_skipped_job_is_impossible() {
        let diff = calculate_difficulty(&JobSpec::new("", "", false, false), 58);
        assert!(diff.is_infinite());
        assert_eq!(format_difficulty(diff), "∞");
    }

    #[test]
    fn test_format_difficulty() {
        assert_eq!(format_difficulty(1000.0), "1.00K");
        assert_eq!(format_difficulty(1500000.0), "1.50M");
        assert_eq!(format_difficulty(1e12), "1.00T");
    }
}
