//! In-memory record collection and its aggregate views.

use crate::clean::Cleaner;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::parser::parse_file;
use crate::record::Record;
use crate::stats::mean;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Order applied by [`AggregationStore::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// `(make, model, year, mpg)` ascending.
    #[default]
    Default,
    Year,
    Mpg,
}

/// Holds every parsed record plus the last computed averages.
///
/// The average maps are snapshots: they reflect `records` as of the last
/// `compute_*` call and are not refreshed by sorting or anything else.
#[derive(Debug, Default)]
pub struct AggregationStore {
    records: Vec<Record>,
    yearly_averages: BTreeMap<i32, f64>,
    averages_by_make: BTreeMap<String, f64>,
}

impl AggregationStore {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Cleans the raw cache (fetching it if missing) and parses the result.
    #[tracing::instrument(skip_all)]
    pub async fn load<F: Fetcher + ?Sized>(cleaner: &Cleaner, fetcher: &F) -> Result<Self> {
        let canonical = cleaner.clean(fetcher).await?;
        let records = parse_file(&canonical)?;
        info!(records = records.len(), "Dataset loaded");
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn yearly_averages(&self) -> &BTreeMap<i32, f64> {
        &self.yearly_averages
    }

    pub fn averages_by_make(&self) -> &BTreeMap<String, f64> {
        &self.averages_by_make
    }

    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::Default => self.sort_default(),
            SortOrder::Year => self.sort_by_year(),
            SortOrder::Mpg => self.sort_by_mpg(),
        }
    }

    pub fn sort_default(&mut self) {
        self.records.sort();
        debug!("Sorted records by make, model, year, mpg");
    }

    pub fn sort_by_year(&mut self) {
        self.records.sort_by_key(Record::year);
        debug!("Sorted records by year");
    }

    pub fn sort_by_mpg(&mut self) {
        self.records.sort_by(|a, b| a.mpg().total_cmp(&b.mpg()));
        debug!("Sorted records by mpg");
    }

    /// Replaces the year -> mean mpg map from the current records.
    pub fn compute_yearly_averages(&mut self) -> &BTreeMap<i32, f64> {
        let mut series: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for record in &self.records {
            series.entry(record.year()).or_default().push(record.mpg());
        }

        self.yearly_averages = series
            .into_iter()
            .map(|(year, values)| (year, mean(&values)))
            .collect();
        debug!(groups = self.yearly_averages.len(), "Computed yearly averages");
        &self.yearly_averages
    }

    /// Replaces the make -> mean mpg map from the current records.
    pub fn compute_averages_by_make(&mut self) -> &BTreeMap<String, f64> {
        let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in &self.records {
            series.entry(record.make()).or_default().push(record.mpg());
        }

        self.averages_by_make = series
            .into_iter()
            .map(|(make, values)| (make.to_string(), mean(&values)))
            .collect();
        debug!(groups = self.averages_by_make.len(), "Computed averages by make");
        &self.averages_by_make
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("plymouth", "satellite", 1971, 18.0),
            Record::new("amc", "hornet", 1970, 18.0),
            Record::new("ford", "pinto", 1971, 25.0),
            Record::new("amc", "gremlin", 1970, 22.0),
            Record::new("ford", "torino", 1970, 17.0),
            Record::new("amc", "ambassador", 1972, 18.0),
        ]
    }

    fn models(store: &AggregationStore) -> Vec<&str> {
        store.records().iter().map(Record::model).collect()
    }

    #[test]
    fn test_sort_default_uses_record_order() {
        let mut store = AggregationStore::from_records(sample());
        store.sort_default();
        assert_eq!(
            models(&store),
            vec!["ambassador", "gremlin", "hornet", "pinto", "torino", "satellite"]
        );
    }

    #[test]
    fn test_sort_by_year_is_stable() {
        let mut store = AggregationStore::from_records(sample());
        store.sort_by_year();
        assert_eq!(
            models(&store),
            vec!["hornet", "gremlin", "torino", "satellite", "pinto", "ambassador"]
        );
    }

    #[test]
    fn test_sort_by_mpg_is_stable() {
        let mut store = AggregationStore::from_records(sample());
        store.sort_by_mpg();
        assert_eq!(
            models(&store),
            vec!["torino", "satellite", "hornet", "ambassador", "gremlin", "pinto"]
        );
    }

    #[test]
    fn test_sort_dispatch() {
        let mut by_enum = AggregationStore::from_records(sample());
        let mut direct = AggregationStore::from_records(sample());
        by_enum.sort(SortOrder::Mpg);
        direct.sort_by_mpg();
        assert_eq!(by_enum.records(), direct.records());
    }

    #[test]
    fn test_yearly_average_scenario() {
        let mut store = AggregationStore::from_records(vec![
            Record::new("chevrolet", "malibu", 1970, 18.0),
            Record::new("buick", "skylark 320", 1970, 22.0),
        ]);
        let averages = store.compute_yearly_averages();
        assert_eq!(averages[&1970], 20.0);
        assert_eq!(averages.len(), 1);
    }

    #[test]
    fn test_yearly_averages_omit_empty_years() {
        let mut store = AggregationStore::from_records(sample());
        store.compute_yearly_averages();
        let years: Vec<_> = store.yearly_averages().keys().copied().collect();
        assert_eq!(years, vec![1970, 1971, 1972]);
        assert_eq!(store.yearly_averages()[&1971], 21.5);
    }

    #[test]
    fn test_averages_by_make() {
        let mut store = AggregationStore::from_records(sample());
        let averages = store.compute_averages_by_make().clone();
        assert_eq!(averages.len(), 3);
        assert!((averages["amc"] - 58.0 / 3.0).abs() < 1e-9);
        assert_eq!(averages["ford"], 21.0);
        assert_eq!(averages["plymouth"], 18.0);
    }

    #[test]
    fn test_weighted_averages_sum_to_total() {
        let records = sample();
        let total: f64 = records.iter().map(Record::mpg).sum();
        let mut store = AggregationStore::from_records(records);

        store.compute_yearly_averages();
        store.compute_averages_by_make();

        let count = |pred: &dyn Fn(&Record) -> bool| store.records().iter().filter(|r| pred(r)).count() as f64;

        let by_year: f64 = store
            .yearly_averages()
            .iter()
            .map(|(year, avg)| count(&|r: &Record| r.year() == *year) * avg)
            .sum();
        let by_make: f64 = store
            .averages_by_make()
            .iter()
            .map(|(make, avg)| count(&|r: &Record| r.make() == make.as_str()) * avg)
            .sum();

        assert!((by_year - total).abs() < 1e-9);
        assert!((by_make - total).abs() < 1e-9);
    }

    #[test]
    fn test_averages_are_snapshots() {
        let mut store = AggregationStore::from_records(sample());
        store.compute_yearly_averages();
        let before = store.yearly_averages().clone();

        store.sort_by_mpg();
        assert_eq!(store.yearly_averages(), &before);

        store.records = vec![Record::new("amc", "hornet", 1990, 30.0)];
        assert_eq!(store.yearly_averages(), &before);
        store.compute_yearly_averages();
        assert_eq!(store.yearly_averages().len(), 1);
        assert_eq!(store.yearly_averages()[&1990], 30.0);
    }
}
