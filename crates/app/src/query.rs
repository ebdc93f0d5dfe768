//! Query engine — ordering, filtering and pagination over decoded records.
//!
//! Everything here is pure: the service loads a collection through the
//! storage port and hands the decoded records to these functions.

use sensorhub_domain::page::{NO_NEXT_PAGE, Page};
use sensorhub_domain::range::Range;
use sensorhub_domain::reading::{ClassifiedReading, Reading};
use sensorhub_domain::search::{Keyed, Paging, RecordFilter, SensorDataSearch};
use sensorhub_domain::status::classify;

/// Select one page of `records`, ordered by ascending key.
///
/// Without filters the page is a dense slice `[index, index + count)` and
/// `next_index` is `index + count`; callers detect the end through a short
/// page. With filters, records from `index` onwards are kept when they match
/// ANY filter field, up to `count` of them, and the page is not resumable.
pub fn select<T, F>(mut records: Vec<T>, paging: Paging, filter: &F) -> Page<T>
where
    T: Keyed,
    F: RecordFilter<T>,
{
    records.sort_by(|left, right| left.key().cmp(right.key()));

    if filter.is_empty() {
        let data = records
            .into_iter()
            .skip(paging.index)
            .take(paging.count)
            .collect();
        return Page {
            data,
            next_index: paging.next_index(paging.count),
        };
    }

    let data = records
        .into_iter()
        .skip(paging.index)
        .filter(|record| filter.matches_any(record))
        .take(paging.count)
        .collect();
    Page {
        data,
        next_index: NO_NEXT_PAGE,
    }
}

/// Page holding a single record found by id.
pub fn single<T>(record: T, paging: Paging) -> Page<T> {
    Page {
        data: vec![record],
        next_index: paging.next_index(1),
    }
}

/// Latest readings at or before `search.timestamp` whose status is wanted.
///
/// Readings are scanned newest first and classified against the sensor
/// type's `limits` and the sensor's `expected` range; the scan stops once
/// `search.count` readings were kept.
pub fn latest_readings(
    mut readings: Vec<Reading>,
    search: &SensorDataSearch,
    limits: &Range,
    expected: &Range,
) -> Vec<ClassifiedReading> {
    readings.retain(|reading| reading.timestamp <= search.timestamp);
    readings.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

    readings
        .into_iter()
        .map(|reading| ClassifiedReading {
            timestamp: reading.timestamp,
            value: reading.value,
            status: classify(reading.value, limits, expected),
        })
        .filter(|reading| search.statuses.contains(reading.status))
        .take(search.count)
        .collect()
}
