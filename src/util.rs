/// Appends `key=value` pairs to `url` verbatim.
///
/// Values are not percent-encoded: a value containing `&`, `#` or spaces
/// produces an ambiguous URL and it is up to the caller not to pass one.
pub(crate) fn append_query(url: &str, params: &[(&str, &str)]) -> String {
    let mut out = url.to_string();
    let mut sep = if url.contains('?') { '&' } else { '?' };
    for (k, v) in params {
        out.push(sep);
        sep = '&';
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}
