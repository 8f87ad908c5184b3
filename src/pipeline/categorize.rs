//! Candidate categorization by fixed score thresholds.

pub const HIGH_FIT: &str = "High Fit (Selected for Interview)";
pub const MEDIUM_FIT: &str = "Medium Fit (Needs HR Review)";
pub const UNDERFIT: &str = "Underfit (Not Suitable)";

/// Map a textual score onto a category label.
///
/// The score arrives in textual form and is compared as a real number:
/// >= 80 is high fit, [60, 80) medium fit, everything below (the failure
/// sentinel 0 included) underfit. Input that does not parse as a number
/// becomes an `Invalid Score Format` label carrying the original token -
/// ordinary data that continues through the pipeline, not an error.
pub fn categorize(score: &str) -> String {
    match score.trim().parse::<f64>() {
        Ok(value) => {
            if value >= 80.0 {
                HIGH_FIT.to_string()
            } else if value >= 60.0 {
                MEDIUM_FIT.to_string()
            } else {
                UNDERFIT.to_string()
            }
        }
        Err(_) => format!("Invalid Score Format: {}", score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(categorize("80"), HIGH_FIT);
        assert_eq!(categorize("79.999"), MEDIUM_FIT);
        assert_eq!(categorize("60"), MEDIUM_FIT);
        assert_eq!(categorize("59.999"), UNDERFIT);
    }

    #[test]
    fn sentinel_zero_is_underfit() {
        assert_eq!(categorize("0"), UNDERFIT);
    }

    #[test]
    fn top_of_range() {
        assert_eq!(categorize("100"), HIGH_FIT);
    }

    #[test]
    fn non_numeric_input_echoes_verbatim() {
        assert_eq!(categorize("abc"), "Invalid Score Format: abc");
    }

    #[test]
    fn deterministic() {
        assert_eq!(categorize("85"), categorize("85"));
    }
}
