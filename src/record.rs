//! The vehicle observation value type.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One parsed vehicle observation.
///
/// Equality, ordering and hashing all derive from [`Record::key`], compared
/// lexicographically as `(make, model, year, mpg)`. `mpg` is compared with
/// [`f64::total_cmp`] and hashed by its bit pattern, so the three stay
/// consistent with each other and the order is total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    make: String,
    model: String,
    year: i32,
    mpg: f64,
}

impl Record {
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32, mpg: f64) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            mpg,
        }
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn mpg(&self) -> f64 {
        self.mpg
    }

    fn key(&self) -> (&str, &str, i32, u64) {
        (&self.make, &self.model, self.year, self.mpg.to_bits())
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.make
            .cmp(&other.make)
            .then_with(|| self.model.cmp(&other.model))
            .then_with(|| self.year.cmp(&other.year))
            .then_with(|| self.mpg.total_cmp(&other.mpg))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "make:{}, model:{}, year:{}, mpg:{:?}",
            self.make, self.model, self.year, self.mpg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equal_by_value() {
        let a = Record::new("ford", "torino", 1970, 17.0);
        let b = Record::new("ford", "torino", 1970, 17.0);
        assert_eq!(a, b);
        assert_ne!(a, Record::new("ford", "torino", 1970, 17.5));
        assert_ne!(a, Record::new("ford", "torino", 1971, 17.0));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut records = vec![
            Record::new("plymouth", "satellite", 1970, 18.0),
            Record::new("amc", "rebel sst", 1970, 16.0),
            Record::new("amc", "hornet", 1971, 18.0),
            Record::new("amc", "hornet", 1970, 18.0),
            Record::new("amc", "hornet", 1970, 15.0),
        ];
        records.sort();

        let keys: Vec<_> = records
            .iter()
            .map(|r| (r.make(), r.model(), r.year(), r.mpg()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("amc", "hornet", 1970, 15.0),
                ("amc", "hornet", 1970, 18.0),
                ("amc", "hornet", 1971, 18.0),
                ("amc", "rebel sst", 1970, 16.0),
                ("plymouth", "satellite", 1970, 18.0),
            ]
        );
    }

    #[test]
    fn test_hash_set_collapses_duplicates() {
        let set: HashSet<Record> = [
            Record::new("vw", "rabbit", 1976, 29.0),
            Record::new("vw", "rabbit", 1976, 29.0),
            Record::new("vw", "rabbit", 1977, 29.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_matches_human_form() {
        let r = Record::new("chevrolet", "malibu", 1970, 18.0);
        assert_eq!(r.to_string(), "make:chevrolet, model:malibu, year:1970, mpg:18.0");
    }
}
