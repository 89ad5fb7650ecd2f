//! URL and query-string composition.

use crate::error::HttpError;
use url::Url;

/// Append `params` to the query of `endpoint`.
///
/// Parameters already present in `endpoint` are kept. The resulting query is
/// form-encoded with keys in sorted order; values sharing a key keep their
/// relative order.
pub fn gen_query_uri<I, K, V>(endpoint: &str, params: I) -> Result<String, HttpError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(endpoint)?;

    let mut added: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
        .collect();

    if !added.is_empty() {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.append(&mut added);
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    Ok(url.into())
}

/// Replace the query of `endpoint` with the raw `query`, if non-empty.
pub fn gen_url(endpoint: &str, query: &str) -> Result<String, HttpError> {
    let mut url = Url::parse(endpoint)?;

    if !query.is_empty() {
        url.set_query(Some(query));
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_gen_query_uri_parses_back() {
        let params = HashMap::from([("x".to_string(), "1".to_string())]);
        let uri = gen_query_uri("https://example.com/a", &params).unwrap();

        let parsed = Url::parse(&uri).unwrap();
        assert_eq!(parsed.host_str(), Some("example.com"));
        assert_eq!(parsed.path(), "/a");
        let query: Vec<_> = parsed.query_pairs().into_owned().collect();
        assert_eq!(query, vec![("x".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_gen_query_uri_sorts_and_encodes() {
        let uri = gen_query_uri(
            "https://example.com/search",
            [("q", "a b&c"), ("lang", "en")],
        )
        .unwrap();
        assert_eq!(uri, "https://example.com/search?lang=en&q=a+b%26c");
    }

    #[test]
    fn test_gen_query_uri_keeps_existing_query() {
        let uri = gen_query_uri("https://example.com/a?z=9&b=2", [("a", "1")]).unwrap();
        assert_eq!(uri, "https://example.com/a?a=1&b=2&z=9");
    }

    #[test]
    fn test_gen_query_uri_repeated_keys_keep_order() {
        let uri = gen_query_uri("https://example.com/", [("k", "2"), ("k", "1")]).unwrap();
        assert_eq!(uri, "https://example.com/?k=2&k=1");
    }

    #[test]
    fn test_gen_query_uri_without_params() {
        let none: [(&str, &str); 0] = [];
        let uri = gen_query_uri("https://example.com/a?keep=me", none).unwrap();
        assert_eq!(uri, "https://example.com/a?keep=me");
    }

    #[test]
    fn test_gen_query_uri_rejects_bad_endpoint() {
        let err = gen_query_uri("not a url", [("x", "1")]).unwrap_err();
        assert!(matches!(err, HttpError::UrlParse(_)));
    }

    #[test]
    fn test_gen_url_replaces_query() {
        let uri = gen_url("https://example.com/a?old=1", "new=2&flag").unwrap();
        assert_eq!(uri, "https://example.com/a?new=2&flag");
    }

    #[test]
    fn test_gen_url_empty_query_keeps_url() {
        let uri = gen_url("https://example.com/a?old=1", "").unwrap();
        assert_eq!(uri, "https://example.com/a?old=1");
    }

    #[test]
    fn test_gen_url_rejects_bad_endpoint() {
        assert!(matches!(gen_url("://", "a=b"), Err(HttpError::UrlParse(_))));
    }
}
