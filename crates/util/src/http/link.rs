//! `Link` header parsing for cursor-style pagination.
//!
//! The provider advertises further pages with RFC 8288 link values:
//!
//! ```text
//! <https://api.github.com/repositories/1/actions/workflows?page=2>; rel="next",
//! <https://api.github.com/repositories/1/actions/workflows?page=5>; rel="last"
//! ```

use reqwest::header::{HeaderMap, LINK};

/// Find the target URL of the link with the given relation type.
///
/// Relation matching is case-insensitive and honours space-separated
/// multi-valued `rel` parameters (`rel="next last"`).
pub fn find_link_relation(header_value: &str, relation: &str) -> Option<String> {
    header_value.split(',').find_map(|link_value| {
        let (target, params) = link_value.trim().split_once(';')?;
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;

        let has_relation = params.split(';').any(|param| {
            let Some((name, value)) = param.trim().split_once('=') else {
                return false;
            };
            name.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case(relation))
        });

        has_relation.then(|| target.to_string())
    })
}

/// URL of the next page advertised by a response, if any.
pub fn next_page_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| find_link_relation(value, "next"))
}
