//! URL composition helpers

use crate::models::Params;
use url::form_urlencoded;

/// Append `query` to the query string of `url`
///
/// The existing query (if any) comes first, joined with `&`. Scheme, host,
/// path and fragment are left untouched.
pub fn build_api_url(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }

    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };

    let mut result = match without_fragment.split_once('?') {
        Some((base, existing)) if !existing.is_empty() => format!("{}?{}&{}", base, existing, query),
        Some((base, _)) => format!("{}?{}", base, query),
        None => format!("{}?{}", without_fragment, query),
    };

    if let Some(frag) = fragment {
        result.push('#');
        result.push_str(frag);
    }
    result
}

/// Encode parameters as an `application/x-www-form-urlencoded` query string
pub fn encode_params(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        serializer.append_pair(key, &value.to_string());
    }
    serializer.finish()
}
