//! Filter → refine → sort → paginate → project over borrowed records.
//!
//! Stages only narrow or reorder; source records are never mutated.

use crate::query::{SortOrder, ValidatedQuery};
use crate::value::{compare_values, values_equal};
use crate::Record;

/// Keep records equal to every supplied filter among `filterable`.
pub fn equality_filter<'a>(
    records: Vec<&'a Record>,
    query: &ValidatedQuery,
    filterable: &[String],
) -> Vec<&'a Record> {
    let active: Vec<_> = filterable
        .iter()
        .filter_map(|field| query.filter(field).map(|wanted| (field.as_str(), wanted)))
        .collect();
    if active.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| {
            active.iter().all(|(field, wanted)| {
                record
                    .get(*field)
                    .is_some_and(|actual| values_equal(actual, wanted))
            })
        })
        .collect()
}

/// Stable sort on `sort`; `desc` reverses the ascending result as a whole.
pub fn sort_records(records: &mut [&Record], sort: Option<&str>, order: SortOrder) {
    if let Some(field) = sort {
        records.sort_by(|a, b| compare_values(a.get(field), b.get(field)));
    }
    if order == SortOrder::Desc {
        records.reverse();
    }
}

/// Slice out page `page` (1-based) of size `limit`.
pub fn paginate<T>(items: Vec<T>, limit: Option<usize>, page: usize) -> Vec<T> {
    let Some(limit) = limit else {
        return items;
    };
    items
        .into_iter()
        .skip(limit.saturating_mul(page.saturating_sub(1)))
        .take(limit)
        .collect()
}

/// Copy of `record` restricted to `fields`, in the record's own key order.
pub fn project(record: &Record, fields: &[String]) -> Record {
    record
        .iter()
        .filter(|(key, _)| fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Run the full pipeline. `refine` sees the equality-filtered set before
/// sorting and may narrow it further or fail.
pub fn run<'a, E, F>(
    records: Vec<&'a Record>,
    query: &ValidatedQuery,
    filterable: &[String],
    refine: F,
) -> Result<Vec<Record>, E>
where
    F: FnOnce(Vec<&'a Record>) -> Result<Vec<&'a Record>, E>,
{
    let filtered = equality_filter(records, query, filterable);
    let mut refined = refine(filtered)?;
    sort_records(&mut refined, query.sort.as_deref(), query.order);
    let page = paginate(refined, query.limit, query.page);
    tracing::trace!(returned = page.len(), "query pipeline finished");
    Ok(page
        .into_iter()
        .map(|record| project(record, &query.fields))
        .collect())
}
