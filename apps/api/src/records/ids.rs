use super::RecordError;

/// Allocates an id strictly greater than every id in `existing`.
///
/// Ids track wall-clock milliseconds when the clock is ahead of the collection, and
/// fall back to `max + 1` otherwise, so two creations in the same millisecond (or a
/// clock that steps backwards) still get distinct ids.
pub fn next_id(
    existing: impl IntoIterator<Item = u64>,
    now_millis: i64,
) -> Result<u64, RecordError> {
    let floor = u64::try_from(now_millis).unwrap_or(0);
    let after_max = match existing.into_iter().max() {
        Some(max) => max.checked_add(1).ok_or(RecordError::IdsExhausted)?,
        None => 1,
    };
    Ok(floor.max(after_max))
}
