use url::form_urlencoded;

/// Query parameter carrying the live-search value.
pub const DEFAULT_SEARCH_PARAM: &str = "q";

/// Parameters dropped when the primary search value changes. A stale
/// pagination cursor would otherwise point into results that no longer exist.
pub const DEFAULT_CLEAR_PARAMS: &[&str] = &["p"];

/// Reads the first value of `param` from an encoded query string.
pub fn param_value(query: &str, param: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
}

/// Encodes key/value pairs back into a query string.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decides whether a new search value requires a refresh.
///
/// Returns the rewritten query string, or `None` when the trimmed new value
/// equals the trimmed value already present in the query (no fetch needed).
/// Every parameter named in `clear_params` is dropped from the result, and
/// an all-whitespace value deletes `param` instead of setting it.
pub fn reconcile_search(
    current_query: &str,
    param: &str,
    value: &str,
    clear_params: &[String],
) -> Option<String> {
    let current = param_value(current_query, param).unwrap_or_default();
    if current.trim() == value.trim() {
        return None;
    }

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(current_query.as_bytes())
        .into_owned()
        .filter(|(key, _)| key != param && !clear_params.iter().any(|cleared| cleared == key))
        .collect();
    if !value.trim().is_empty() {
        pairs.push((param.to_string(), value.to_string()));
    }

    Some(encode_pairs(&pairs))
}
