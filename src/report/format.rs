//! Terminal text output for the non-interactive subcommands.

use crate::domain::{CountryScore, FACTOR_COLUMNS};
use crate::report::{HistBin, ScoreStats};

/// Short label for a factor column, used where space is tight.
pub fn factor_label(name: &str) -> &'static str {
    match name {
        n if n == FACTOR_COLUMNS[0] => "GDP",
        n if n == FACTOR_COLUMNS[1] => "Family",
        n if n == FACTOR_COLUMNS[2] => "Health",
        n if n == FACTOR_COLUMNS[3] => "Freedom",
        n if n == FACTOR_COLUMNS[4] => "Trust",
        n if n == FACTOR_COLUMNS[5] => "Generosity",
        _ => "?",
    }
}

/// Format the year-level KPI block.
pub fn format_year_summary(year: &str, stats: &ScoreStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== whi — World Happiness {year} ===\n"));
    out.push_str(&format!("Countries: {}\n", stats.n));
    out.push_str(&format!("Mean score: {:.2}\n", stats.mean));
    out.push_str(&format!(
        "Happiest: {} ({:.2})\n",
        stats.happiest.country, stats.happiest.score
    ));
    out.push_str(&format!(
        "Least happy: {} ({:.2})\n",
        stats.saddest.country, stats.saddest.score
    ));
    out
}

/// Format a top-N ranking with proportional bars.
pub fn format_rankings(ranked: &[CountryScore], top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Top {} by happiness score:\n", top_n.min(ranked.len())));

    let max_score = ranked.first().map(|cs| cs.score).unwrap_or(0.0);
    for (i, cs) in ranked.iter().take(top_n).enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<24} {:<30} {:.3}\n",
            i + 1,
            truncate(&cs.country, 24),
            score_bar(cs.score, max_score, 30),
            cs.score
        ));
    }
    out
}

/// Format a single country's factor breakdown.
pub fn format_country_detail(
    country: &str,
    score: Option<f64>,
    factors: &[(&'static str, f64)],
) -> String {
    let mut out = String::new();
    match score {
        Some(score) => out.push_str(&format!("{country}: score {score:.2}\n")),
        None => out.push_str(&format!("{country}: score unavailable\n")),
    }

    let max = factors.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    for (name, value) in factors {
        out.push_str(&format!(
            "  {:<12} {:<24} {:.3}\n",
            factor_label(name),
            score_bar(*value, max, 24),
            value
        ));
    }
    out
}

/// Format the factor-vs-score correlations.
///
/// Bars scale with the correlation's magnitude; the sign is carried by the
/// printed coefficient.
pub fn format_correlations(correlations: &[(&'static str, f64)]) -> String {
    let mut out = String::new();
    out.push_str("Factor correlation with happiness score:\n");
    for (name, r) in correlations {
        out.push_str(&format!(
            "  {:<12} {:+.2} {:<24}\n",
            factor_label(name),
            r,
            score_bar(r.abs(), 1.0, 24),
        ));
    }
    out
}

/// Format the score distribution.
pub fn format_histogram(bins: &[HistBin]) -> String {
    let mut out = String::new();
    out.push_str("Score distribution:\n");
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in bins {
        out.push_str(&format!(
            "  [{:>4.2}, {:>4.2}) {:<30} {}\n",
            bin.lo,
            bin.hi,
            score_bar(bin.count as f64, max as f64, 30),
            bin.count
        ));
    }
    out
}

/// A left-aligned bar scaled against `max`, `width` cells wide.
pub fn score_bar(value: f64, max: f64, width: usize) -> String {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width))
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rankings_are_numbered_and_scaled() {
        let ranked = vec![
            CountryScore { country: "Finland".to_string(), score: 7.8 },
            CountryScore { country: "Chile".to_string(), score: 3.9 },
        ];
        let text = format_rankings(&ranked, 10);
        assert!(text.contains("  1. Finland"));
        assert!(text.contains("  2. Chile"));
        // Half the score means roughly half the bar.
        let full = score_bar(7.8, 7.8, 30).chars().count();
        let half = score_bar(3.9, 7.8, 30).chars().count();
        assert_eq!(full, 30);
        assert_eq!(half, 15);
    }

    #[test]
    fn bar_is_empty_for_non_positive_values() {
        assert_eq!(score_bar(0.0, 10.0, 30), "");
        assert_eq!(score_bar(-1.0, 10.0, 30), "");
        assert_eq!(score_bar(5.0, 0.0, 30), "");
    }

    #[test]
    fn summary_names_extremes() {
        let stats = ScoreStats {
            n: 3,
            mean: 6.5,
            happiest: CountryScore { country: "Finland".to_string(), score: 7.8 },
            saddest: CountryScore { country: "Greece".to_string(), score: 5.3 },
        };
        let text = format_year_summary("2019", &stats);
        assert!(text.contains("World Happiness 2019"));
        assert!(text.contains("Happiest: Finland (7.80)"));
        assert!(text.contains("Least happy: Greece (5.30)"));
    }

    #[test]
    fn correlations_print_signed_with_magnitude_bars() {
        let correlations = vec![(FACTOR_COLUMNS[0], 0.79_f64), (FACTOR_COLUMNS[4], -0.5_f64)];
        let text = format_correlations(&correlations);
        assert!(text.contains("GDP"));
        assert!(text.contains("+0.79"));
        assert!(text.contains("-0.50"));
        // The negative coefficient still gets a bar, scaled by magnitude.
        assert_eq!(score_bar(0.5, 1.0, 24).chars().count(), 12);
    }

    #[test]
    fn long_country_names_are_truncated() {
        assert_eq!(truncate("United Kingdom", 24), "United Kingdom");
        let cut = truncate("Somewhere With A Very Long Name Indeed", 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
