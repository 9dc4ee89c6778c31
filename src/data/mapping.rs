//! Static raw→canonical column rename tables.
//!
//! Each yearly export of the happiness dataset ships a slightly different
//! header vocabulary (`Score` vs `Happiness.Score` vs `Happiness Score`,
//! `Social support` vs `Family`, ...). The `ColumnMap` records, per year, the
//! renames needed to reach the canonical schema in `domain`.
//!
//! The map is plain immutable configuration passed into the `Normalizer` at
//! construction time, so tests can substitute alternate tables. A year with
//! no entry gets the identity mapping: newly added yearly files are assumed
//! pre-normalized unless explicitly mapped.

use crate::domain::{
    COL_COUNTRY, COL_ECONOMY, COL_FAMILY, COL_FREEDOM, COL_GENEROSITY, COL_HEALTH, COL_SCORE,
    COL_TRUST,
};

/// Rename table for a single year.
///
/// Renames are an *ordered* list, not a hash map: should two entries ever
/// target the same canonical name, application order decides which wins.
#[derive(Debug, Clone)]
pub struct YearMap {
    pub year: String,
    pub renames: Vec<(String, String)>,
}

/// Year → rename-table configuration.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    years: Vec<YearMap>,
}

impl ColumnMap {
    /// An empty map: every year is treated as already canonical.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style registration of one year's rename table.
    pub fn with_year<S: Into<String>>(mut self, year: &str, renames: Vec<(S, S)>) -> Self {
        self.years.push(YearMap {
            year: year.to_string(),
            renames: renames
                .into_iter()
                .map(|(raw, canonical)| (raw.into(), canonical.into()))
                .collect(),
        });
        self
    }

    pub fn get(&self, year: &str) -> Option<&YearMap> {
        self.years.iter().find(|m| m.year == year)
    }

    /// The rename tables for the dataset years this tool ships support for.
    ///
    /// 2017 uses dotted headers; 2018/2019 renamed several concepts
    /// (`Social support`, `Perceptions of corruption`, ...). Identity entries
    /// (e.g. `Generosity`) are kept so each table reads as the full schema of
    /// its year.
    pub fn builtin() -> Self {
        Self::empty()
            .with_year(
                "2017",
                vec![
                    ("Happiness.Score", COL_SCORE),
                    ("Economy..GDP.per.Capita.", COL_ECONOMY),
                    ("Health..Life.Expectancy.", COL_HEALTH),
                    ("Trust..Government.Corruption.", COL_TRUST),
                    ("Family", COL_FAMILY),
                    ("Freedom", COL_FREEDOM),
                    ("Generosity", COL_GENEROSITY),
                    ("Country", COL_COUNTRY),
                ],
            )
            .with_year(
                "2018",
                vec![
                    ("Score", COL_SCORE),
                    ("GDP per capita", COL_ECONOMY),
                    ("Healthy life expectancy", COL_HEALTH),
                    ("Perceptions of corruption", COL_TRUST),
                    ("Social support", COL_FAMILY),
                    ("Freedom to make life choices", COL_FREEDOM),
                    ("Generosity", COL_GENEROSITY),
                    ("Country or region", COL_COUNTRY),
                ],
            )
            .with_year(
                "2019",
                vec![
                    ("Score", COL_SCORE),
                    ("GDP per capita", COL_ECONOMY),
                    ("Healthy life expectancy", COL_HEALTH),
                    ("Perceptions of corruption", COL_TRUST),
                    ("Social support", COL_FAMILY),
                    ("Freedom to make life choices", COL_FREEDOM),
                    ("Generosity", COL_GENEROSITY),
                    ("Country or region", COL_COUNTRY),
                ],
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::REQUIRED_COLUMNS;

    #[test]
    fn builtin_covers_expected_years() {
        let map = ColumnMap::builtin();
        for year in ["2017", "2018", "2019"] {
            assert!(map.get(year).is_some(), "missing builtin map for {year}");
        }
        assert!(map.get("2020").is_none());
    }

    #[test]
    fn builtin_targets_cover_required_set_without_duplicates() {
        let map = ColumnMap::builtin();
        for year in ["2017", "2018", "2019"] {
            let targets: Vec<&str> = map
                .get(year)
                .unwrap()
                .renames
                .iter()
                .map(|(_, canonical)| canonical.as_str())
                .collect();
            for spec in REQUIRED_COLUMNS {
                assert!(
                    targets.contains(&spec.name),
                    "{year} map does not produce '{}'",
                    spec.name
                );
            }
            let mut deduped = targets.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(deduped.len(), targets.len(), "{year} map has duplicate targets");
        }
    }
}
