/// `Some` only for a non-empty string, the way a JSON falsy check reads.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Last `:`-delimited segment of a URN, e.g. `urn:li:hashtag:hiring` -> `hiring`.
pub(crate) fn last_segment(urn: &str) -> Option<&str> {
    urn.rsplit(':').next().filter(|segment| !segment.is_empty())
}
