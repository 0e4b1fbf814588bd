use crate::errors::{StoreError, ValidationError};
use crate::models::{format_long_date, parse_date, parse_positive, Sample, WeightForm};
use crate::storage::{load_collection, persist_collection, KeyValueStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const WEIGHT_KEY: &str = "weightEntries";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Statistics {
    Empty,
    Summary {
        count: usize,
        average: f64,
        total_change: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Date,
    Weight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Up
        } else if delta < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// One table row. `index` is the row's position in the newest-first ordering
/// and is what [`WeightStore::remove`] expects, whatever column is sorted.
#[derive(Debug, Clone, Serialize)]
pub struct WeightRow {
    pub index: usize,
    pub date: NaiveDate,
    pub display_date: String,
    pub weight: f64,
    pub trend: f64,
    pub direction: TrendDirection,
}

/// Weight samples keyed by date, written through to a [`KeyValueStore`].
#[derive(Debug)]
pub struct WeightStore<S> {
    backend: S,
    samples: Vec<Sample>,
}

impl<S: KeyValueStore> WeightStore<S> {
    pub fn open(mut backend: S) -> Self {
        let loaded: Vec<Sample> = load_collection(&mut backend, WEIGHT_KEY);
        let mut samples: Vec<Sample> = Vec::with_capacity(loaded.len());
        for sample in loaded {
            if !valid_weight(sample.weight) || samples.iter().any(|kept| kept.date == sample.date) {
                warn!("skipping stored weight entry for {}", sample.date);
                continue;
            }
            samples.push(sample);
        }

        Self { backend, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Parses raw form fields, then behaves like [`WeightStore::add`].
    pub fn submit(&mut self, form: &WeightForm) -> Result<Sample, StoreError> {
        let (date, weight) = match (form.date.as_deref(), form.weight.as_ref()) {
            (Some(date), Some(weight)) => (
                parse_date(Some(date))?,
                parse_positive(Some(weight), "weight")?,
            ),
            _ => return Err(ValidationError::MissingFields.into()),
        };
        self.add(date, weight)
    }

    pub fn add(&mut self, date: NaiveDate, weight: f64) -> Result<Sample, StoreError> {
        if !valid_weight(weight) {
            return Err(ValidationError::InvalidNumber { field: "weight" }.into());
        }
        if self.samples.iter().any(|sample| sample.date == date) {
            return Err(ValidationError::DuplicateDate(date).into());
        }

        let sample = Sample { date, weight };
        self.samples.push(sample);
        if let Err(err) = self.persist() {
            self.samples.pop();
            return Err(err);
        }
        Ok(sample)
    }

    /// Removes the sample at `index` in the newest-first ordering.
    pub fn remove(&mut self, index: usize) -> Result<Sample, StoreError> {
        let len = self.samples.len();
        let target = self
            .descending()
            .get(index)
            .map(|sample| sample.date)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;

        let position = self
            .samples
            .iter()
            .position(|sample| sample.date == target)
            .ok_or(ValidationError::IndexOutOfRange { index, len })?;
        let removed = self.samples.remove(position);
        if let Err(err) = self.persist() {
            self.samples.insert(position, removed);
            return Err(err);
        }
        Ok(removed)
    }

    pub fn ascending(&self) -> Vec<Sample> {
        let mut sorted = self.samples.clone();
        sorted.sort_by_key(|sample| sample.date);
        sorted
    }

    pub fn descending(&self) -> Vec<Sample> {
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn latest(&self) -> Option<Sample> {
        self.samples.iter().max_by_key(|sample| sample.date).copied()
    }

    pub fn statistics(&self) -> Statistics {
        let (Some(earliest), Some(latest)) = (
            self.samples.iter().min_by_key(|sample| sample.date),
            self.samples.iter().max_by_key(|sample| sample.date),
        ) else {
            return Statistics::Empty;
        };

        let count = self.samples.len();
        let average = self
            .samples
            .iter()
            .enumerate()
            .fold(0.0, |mean, (seen, sample)| mean + (sample.weight - mean) / (seen + 1) as f64);
        let min = self.samples.iter().map(|sample| sample.weight).fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().map(|sample| sample.weight).fold(f64::NEG_INFINITY, f64::max);

        Statistics::Summary {
            count,
            average,
            total_change: latest.weight - earliest.weight,
            min,
            max,
        }
    }

    /// Change against the next-older sample; zero when there is none.
    pub fn trend(&self, sample: &Sample) -> f64 {
        self.samples
            .iter()
            .filter(|older| older.date < sample.date)
            .max_by_key(|older| older.date)
            .map_or(0.0, |older| sample.weight - older.weight)
    }

    pub fn listing(&self, column: SortColumn) -> Vec<WeightRow> {
        let mut rows: Vec<WeightRow> = self
            .descending()
            .into_iter()
            .enumerate()
            .map(|(index, sample)| {
                let trend = self.trend(&sample);
                WeightRow {
                    index,
                    date: sample.date,
                    display_date: format_long_date(sample.date),
                    weight: sample.weight,
                    trend,
                    direction: TrendDirection::of(trend),
                }
            })
            .collect();

        if column == SortColumn::Weight {
            rows.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        }
        rows
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        persist_collection(&mut self.backend, WEIGHT_KEY, &self.samples)
    }
}

fn valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use crate::storage::{unique_temp_dir, FileStore, MemoryStore, ReadOnlyStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn store_with(samples: &[(u32, f64)]) -> WeightStore<MemoryStore> {
        let mut store = WeightStore::open(MemoryStore::new());
        for &(d, weight) in samples {
            store.add(day(d), weight).unwrap();
        }
        store
    }

    #[test]
    fn add_grows_collection_and_updates_statistics() {
        let mut store = store_with(&[(1, 80.0)]);
        store.add(day(2), 78.0).unwrap();

        assert_eq!(store.len(), 2);
        match store.statistics() {
            Statistics::Summary { count, average, min, max, .. } => {
                assert_eq!(count, 2);
                assert_eq!(average, 79.0);
                assert_eq!(min, 78.0);
                assert_eq!(max, 80.0);
            }
            Statistics::Empty => panic!("expected summary"),
        }
    }

    #[test]
    fn duplicate_date_is_rejected_without_mutation() {
        let mut store = store_with(&[(5, 70.0)]);
        let err = store.add(day(5), 71.0).unwrap_err();

        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DuplicateDate(date)) if date == day(5)
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.ascending()[0].weight, 70.0);
    }

    #[test]
    fn submit_rejects_missing_or_non_numeric_fields() {
        let mut store = store_with(&[]);
        let missing = WeightForm {
            date: Some("2026-10-01".into()),
            weight: None,
        };
        let garbage = WeightForm {
            date: Some("2026-10-01".into()),
            weight: Some(FieldValue::Text("abc".into())),
        };

        assert!(matches!(
            store.submit(&missing),
            Err(StoreError::Validation(ValidationError::MissingFields))
        ));
        assert!(matches!(
            store.submit(&garbage),
            Err(StoreError::Validation(ValidationError::InvalidNumber { .. }))
        ));
        assert!(store.is_empty());

        let ok = WeightForm {
            date: Some("2026-10-01".into()),
            weight: Some(FieldValue::Text("72.4".into())),
        };
        assert_eq!(store.submit(&ok).unwrap(), Sample { date: day(1), weight: 72.4 });
    }

    #[test]
    fn average_of_three_samples() {
        let store = store_with(&[(1, 70.0), (2, 72.0), (3, 74.0)]);
        let Statistics::Summary { average, .. } = store.statistics() else {
            panic!("expected summary");
        };
        assert_eq!(average, 72.0);
    }

    #[test]
    fn total_change_uses_dates_not_insertion_order() {
        let store = store_with(&[(10, 75.0), (1, 80.0), (5, 78.0)]);
        let Statistics::Summary { total_change, .. } = store.statistics() else {
            panic!("expected summary");
        };
        assert_eq!(total_change, -5.0);
    }

    #[test]
    fn earliest_sample_has_zero_trend() {
        let store = store_with(&[(3, 74.0), (1, 70.0), (2, 72.5)]);
        let rows = store.listing(SortColumn::Date);

        assert_eq!(store.trend(&Sample { date: day(1), weight: 70.0 }), 0.0);
        assert_eq!(rows.last().unwrap().trend, 0.0);
        assert_eq!(rows.last().unwrap().direction, TrendDirection::Flat);
        assert_eq!(rows[0].trend, 1.5);
        assert_eq!(rows[0].direction, TrendDirection::Up);
        assert_eq!(rows[1].direction, TrendDirection::Up);
    }

    #[test]
    fn remove_uses_newest_first_positions() {
        let mut store = store_with(&[(1, 70.0), (3, 74.0), (2, 72.0)]);
        let removed = store.remove(0).unwrap();
        assert_eq!(removed.date, day(3));

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.date, day(1));
        assert_eq!(store.ascending(), vec![Sample { date: day(2), weight: 72.0 }]);
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let mut store = store_with(&[(1, 70.0)]);
        assert!(matches!(
            store.remove(4),
            Err(StoreError::Validation(ValidationError::IndexOutOfRange { index: 4, len: 1 }))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removing_last_sample_yields_empty_statistics() {
        let mut store = store_with(&[(1, 70.0)]);
        store.remove(0).unwrap();
        assert_eq!(store.statistics(), Statistics::Empty);
        assert!(store.latest().is_none());
    }

    #[test]
    fn weight_column_sort_keeps_delete_positions() {
        let store = store_with(&[(1, 80.0), (2, 70.0), (3, 75.0)]);
        let rows = store.listing(SortColumn::Weight);
        let weights: Vec<f64> = rows.iter().map(|row| row.weight).collect();
        let indexes: Vec<usize> = rows.iter().map(|row| row.index).collect();

        assert_eq!(weights, vec![80.0, 75.0, 70.0]);
        assert_eq!(indexes, vec![2, 0, 1]);
        assert_eq!(rows[0].display_date, "Oct 1, 2026");
    }

    #[test]
    fn collection_round_trips_through_memory_store() {
        let store = store_with(&[(2, 71.3), (1, 70.0), (9, 69.8)]);
        let reopened = WeightStore::open(store.backend().clone());
        assert_eq!(reopened.ascending(), store.ascending());
    }

    #[test]
    fn collection_round_trips_through_file_store() {
        let dir = unique_temp_dir("weights");
        let mut store = WeightStore::open(FileStore::new(&dir));
        store.add(day(4), 82.1).unwrap();
        store.add(day(6), 81.7).unwrap();

        let reopened = WeightStore::open(FileStore::new(&dir));
        assert_eq!(reopened.ascending(), store.ascending());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn stored_duplicates_are_dropped_on_open() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                WEIGHT_KEY,
                r#"[{"date":"2026-10-01","weight":70.0},{"date":"2026-10-01","weight":71.0},{"date":"2026-10-02","weight":-3.0}]"#
                    .to_string(),
            )
            .unwrap();

        let store = WeightStore::open(backend);
        assert_eq!(store.ascending(), vec![Sample { date: day(1), weight: 70.0 }]);
    }

    #[test]
    fn one_unreadable_row_keeps_the_rest_of_the_history() {
        let dir = unique_temp_dir("bad_row");
        let mut backend = FileStore::new(&dir);
        backend
            .set(
                WEIGHT_KEY,
                r#"[{"date":"2026-10-01","weight":70.0},{"date":"2026-10-02","weight":71.0},{"date":"2026-10-03","weight":"72"}]"#
                    .to_string(),
            )
            .unwrap();

        let mut store = WeightStore::open(backend);
        assert_eq!(store.len(), 2);
        store.add(day(4), 73.0).unwrap();

        let reopened = WeightStore::open(FileStore::new(&dir));
        let dates: Vec<NaiveDate> = reopened.ascending().iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(4)]);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failed_save_rolls_back_add_and_remove() {
        let backend = ReadOnlyStore::with(WEIGHT_KEY, r#"[{"date":"2026-10-01","weight":70.0}]"#);
        let mut store = WeightStore::open(backend);

        assert!(matches!(store.add(day(2), 71.0), Err(StoreError::Io(_))));
        assert!(matches!(store.remove(0), Err(StoreError::Io(_))));
        assert_eq!(store.ascending(), vec![Sample { date: day(1), weight: 70.0 }]);
    }

    #[test]
    fn average_of_huge_weights_stays_finite() {
        let store = store_with(&[(1, f64::MAX), (2, f64::MAX)]);
        let Statistics::Summary { average, .. } = store.statistics() else {
            panic!("expected summary");
        };
        assert_eq!(average, f64::MAX);
    }
}
