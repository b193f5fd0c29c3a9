//! Fuel-efficiency filtering.

use crate::types::CarRecord;

/// Records must beat this many miles per gallon to be shown.
pub const MPG_THRESHOLD: f64 = 25.0;

/// Whether a record's `mpg` is strictly above [`MPG_THRESHOLD`].
///
/// A record without `mpg` never passes.
pub fn is_efficient(record: &CarRecord) -> bool {
    record.mpg_value().is_some_and(|mpg| mpg > MPG_THRESHOLD)
}

/// Lazily yield the efficient records, in input order.
pub fn efficient<'a, I>(records: I) -> impl Iterator<Item = &'a CarRecord>
where
    I: IntoIterator<Item = &'a CarRecord>,
{
    records.into_iter().filter(|r| is_efficient(r))
}

/// Collect the efficient records, in input order.
pub fn filter_efficient(records: &[CarRecord]) -> Vec<&CarRecord> {
    efficient(records).collect()
}
