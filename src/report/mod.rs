//! Metrics over a canonical table: KPIs, rankings, factor breakdowns and the
//! score distribution.
//!
//! We keep formatting code in `format` so:
//! - the metric code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! Rows whose country or score cell is missing or non-numeric are skipped;
//! column presence is the only validation the core performs.

use crate::domain::{COL_COUNTRY, COL_SCORE, CountryScore, FACTOR_COLUMNS, Table};

pub mod format;

/// Year-level KPIs.
#[derive(Debug, Clone)]
pub struct ScoreStats {
    /// Countries with a usable (country, score) pair.
    pub n: usize,
    pub mean: f64,
    pub happiest: CountryScore,
    pub saddest: CountryScore,
}

/// One bucket of the score histogram.
#[derive(Debug, Clone)]
pub struct HistBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Extract the usable `(country, score)` pairs in row order.
pub fn country_scores(table: &Table) -> Vec<CountryScore> {
    let mut out = Vec::with_capacity(table.n_rows());
    for row in 0..table.n_rows() {
        let Some(country) = table.text(row, COL_COUNTRY) else {
            continue;
        };
        let Some(score) = table.number(row, COL_SCORE) else {
            continue;
        };
        out.push(CountryScore {
            country: country.to_string(),
            score,
        });
    }
    out
}

/// Compute mean / happiest / least-happy KPIs.
///
/// Returns `None` when no row carries a usable pair (e.g. an empty file).
pub fn compute_score_stats(table: &Table) -> Option<ScoreStats> {
    let scores = country_scores(table);
    if scores.is_empty() {
        return None;
    }

    let mut sum = 0.0;
    let mut happiest = scores[0].clone();
    let mut saddest = scores[0].clone();
    for cs in &scores {
        sum += cs.score;
        if cs.score > happiest.score {
            happiest = cs.clone();
        }
        if cs.score < saddest.score {
            saddest = cs.clone();
        }
    }

    Some(ScoreStats {
        n: scores.len(),
        mean: sum / scores.len() as f64,
        happiest,
        saddest,
    })
}

/// All countries ranked by score, descending.
pub fn rank_countries(table: &Table) -> Vec<CountryScore> {
    let mut ranked = country_scores(table);
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Sorted unique country names (selection list for the UI).
pub fn country_names(table: &Table) -> Vec<String> {
    let mut names: Vec<String> = country_scores(table).into_iter().map(|cs| cs.country).collect();
    names.sort();
    names.dedup();
    names
}

/// The six factor values for one country (case-insensitive, trimmed match).
///
/// Returns `None` when the country is absent; factors whose cell is missing
/// or non-numeric are omitted from the breakdown.
pub fn factor_breakdown(table: &Table, country: &str) -> Option<Vec<(&'static str, f64)>> {
    let row = (0..table.n_rows()).find(|&row| {
        table
            .text(row, COL_COUNTRY)
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(country.trim()))
    })?;

    let mut factors = Vec::with_capacity(FACTOR_COLUMNS.len());
    for name in FACTOR_COLUMNS {
        if let Some(v) = table.number(row, name) {
            factors.push((name, v));
        }
    }
    Some(factors)
}

/// Pearson correlation of each factor column against the happiness score.
///
/// Pairs factor and score row-wise over rows where both cells are numeric.
/// Factors with fewer than two usable pairs, or with zero variance on either
/// side, are omitted.
pub fn factor_correlations(table: &Table) -> Vec<(&'static str, f64)> {
    let mut out = Vec::with_capacity(FACTOR_COLUMNS.len());
    for name in FACTOR_COLUMNS {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for row in 0..table.n_rows() {
            let (Some(x), Some(y)) = (table.number(row, name), table.number(row, COL_SCORE))
            else {
                continue;
            };
            xs.push(x);
            ys.push(y);
        }
        if let Some(r) = pearson(&xs, &ys) {
            out.push((name, r));
        }
    }
    out
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 {
        return None;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Score of one country (case-insensitive, trimmed match).
pub fn country_score(table: &Table, country: &str) -> Option<f64> {
    let row = (0..table.n_rows()).find(|&row| {
        table
            .text(row, COL_COUNTRY)
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(country.trim()))
    })?;
    table.number(row, COL_SCORE)
}

/// Fixed-width histogram of happiness scores.
pub fn score_histogram(table: &Table, nbins: usize) -> Vec<HistBin> {
    let scores: Vec<f64> = country_scores(table).into_iter().map(|cs| cs.score).collect();
    if scores.is_empty() || nbins == 0 {
        return Vec::new();
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &s in &scores {
        lo = lo.min(s);
        hi = hi.max(s);
    }

    // Degenerate case: all scores equal; one bucket holds everything.
    if (hi - lo).abs() < 1e-12 {
        return vec![HistBin {
            lo,
            hi,
            count: scores.len(),
        }];
    }

    let width = (hi - lo) / nbins as f64;
    let mut bins: Vec<HistBin> = (0..nbins)
        .map(|i| HistBin {
            lo: lo + i as f64 * width,
            hi: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &s in &scores {
        let idx = (((s - lo) / width) as usize).min(nbins - 1);
        bins[idx].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{COL_ECONOMY, COL_FAMILY, COL_FREEDOM, COL_GENEROSITY, COL_HEALTH, COL_TRUST, Cell};

    fn demo_table() -> Table {
        let columns = vec![
            COL_COUNTRY.to_string(),
            COL_SCORE.to_string(),
            COL_ECONOMY.to_string(),
            COL_FAMILY.to_string(),
            COL_HEALTH.to_string(),
            COL_FREEDOM.to_string(),
            COL_TRUST.to_string(),
            COL_GENEROSITY.to_string(),
        ];
        let row = |country: &str, score: Cell| {
            vec![
                Cell::Text(country.to_string()),
                score,
                Cell::Number(1.3),
                Cell::Number(1.5),
                Cell::Number(0.9),
                Cell::Number(0.6),
                Cell::Missing,
                Cell::Number(0.2),
            ]
        };
        Table::new(
            columns,
            vec![
                row("Finland", Cell::Number(7.8)),
                row("Greece", Cell::Number(5.3)),
                row("Chile", Cell::Number(6.4)),
                row("Nowhere", Cell::Missing),
            ],
        )
    }

    #[test]
    fn stats_skip_rows_without_usable_scores() {
        let stats = compute_score_stats(&demo_table()).unwrap();
        assert_eq!(stats.n, 3);
        assert!((stats.mean - (7.8 + 5.3 + 6.4) / 3.0).abs() < 1e-12);
        assert_eq!(stats.happiest.country, "Finland");
        assert_eq!(stats.saddest.country, "Greece");
    }

    #[test]
    fn stats_of_empty_table_are_none() {
        let table = Table::new(vec![COL_COUNTRY.to_string(), COL_SCORE.to_string()], vec![]);
        assert!(compute_score_stats(&table).is_none());
    }

    #[test]
    fn ranking_is_score_descending() {
        let ranked = rank_countries(&demo_table());
        let names: Vec<&str> = ranked.iter().map(|cs| cs.country.as_str()).collect();
        assert_eq!(names, vec!["Finland", "Chile", "Greece"]);
    }

    #[test]
    fn factor_breakdown_matches_case_insensitively_and_skips_missing() {
        let factors = factor_breakdown(&demo_table(), "  finland ").unwrap();
        // Trust cell is Missing, so five of six factors remain.
        assert_eq!(factors.len(), 5);
        assert!(factors.iter().all(|(name, _)| *name != COL_TRUST));
        assert!(factor_breakdown(&demo_table(), "Atlantis").is_none());
    }

    #[test]
    fn correlations_recover_linear_relationships() {
        let columns = vec![
            COL_COUNTRY.to_string(),
            COL_SCORE.to_string(),
            COL_ECONOMY.to_string(),
            COL_TRUST.to_string(),
            COL_FREEDOM.to_string(),
        ];
        // Economy is an exact linear function of score, Trust the exact
        // inverse, Freedom is constant.
        let row = |country: &str, score: f64| {
            vec![
                Cell::Text(country.to_string()),
                Cell::Number(score),
                Cell::Number(0.2 * score + 0.1),
                Cell::Number(-0.3 * score + 5.0),
                Cell::Number(0.5),
            ]
        };
        let table = Table::new(
            columns,
            vec![row("A", 7.8), row("B", 5.3), row("C", 6.4), row("D", 4.1)],
        );

        let correlations = factor_correlations(&table);
        let r = |name: &str| {
            correlations
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, r)| *r)
        };
        assert!((r(COL_ECONOMY).unwrap() - 1.0).abs() < 1e-9);
        assert!((r(COL_TRUST).unwrap() + 1.0).abs() < 1e-9);
        // Zero-variance factor is omitted, as are absent columns.
        assert_eq!(r(COL_FREEDOM), None);
        assert_eq!(r(COL_FAMILY), None);
    }

    #[test]
    fn correlations_skip_rows_without_both_values() {
        let columns = vec![
            COL_COUNTRY.to_string(),
            COL_SCORE.to_string(),
            COL_ECONOMY.to_string(),
        ];
        let table = Table::new(
            columns,
            vec![
                vec![Cell::Text("A".to_string()), Cell::Number(7.0), Cell::Number(1.4)],
                vec![Cell::Text("B".to_string()), Cell::Number(5.0), Cell::Missing],
                vec![Cell::Text("C".to_string()), Cell::Missing, Cell::Number(0.9)],
            ],
        );
        // Only one complete pair remains; below the two-pair minimum.
        assert!(factor_correlations(&table).is_empty());
    }

    #[test]
    fn histogram_counts_cover_all_scores() {
        let bins = score_histogram(&demo_table(), 5);
        assert_eq!(bins.len(), 5);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
        // Max score lands in the last bucket despite the half-open ranges.
        assert!(bins.last().unwrap().count >= 1);
    }

    #[test]
    fn histogram_of_identical_scores_is_one_bucket() {
        let columns = vec![COL_COUNTRY.to_string(), COL_SCORE.to_string()];
        let rows = vec![
            vec![Cell::Text("A".to_string()), Cell::Number(5.0)],
            vec![Cell::Text("B".to_string()), Cell::Number(5.0)],
        ];
        let bins = score_histogram(&Table::new(columns, rows), 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }
}
