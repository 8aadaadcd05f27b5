//! Pagination links (`first`, `prev`, `next`, `last`).

use serde::{Deserialize, Serialize};

/// Navigation links for a paged listing. Absent links are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Build links for the page at `skip`/`limit` out of `total` records.
///
/// `params` are the original query pairs without `skip`; each link repeats them
/// and appends its own `skip`.
pub fn page_links(
    base_url: &str,
    params: &[(String, String)],
    skip: u64,
    limit: u64,
    total: u64,
) -> PageLinks {
    let limit = limit.min(total);
    let mut links = PageLinks::default();
    if limit == 0 {
        return links;
    }

    let url = |skip: u64| {
        let skip = skip.to_string();
        let mut pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.push(("skip", skip.as_str()));
        let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
        format!("{base_url}?{query}")
    };

    if skip > 0 {
        links.prev = Some(url(skip.saturating_sub(limit)));
        links.first = Some(url(0));
    }
    let next_skip = skip.saturating_add(limit);
    if next_skip < total {
        let last_skip = (total.div_ceil(limit) - 1) * limit;
        links.next = Some(url(next_skip.min(last_skip)));
        links.last = Some(url(last_skip));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:3005/blogPosts";

    fn limit_param(limit: &str) -> Vec<(String, String)> {
        vec![("limit".to_string(), limit.to_string())]
    }

    #[test]
    fn test_first_page_has_next_and_last_only() {
        let links = page_links(BASE, &limit_param("2"), 0, 2, 5);
        assert_eq!(links.first, None);
        assert_eq!(links.prev, None);
        assert_eq!(links.next.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=2"));
        assert_eq!(links.last.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=4"));
    }

    #[test]
    fn test_middle_page_has_all_links() {
        let links = page_links(BASE, &limit_param("2"), 2, 2, 5);
        assert_eq!(links.prev.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=0"));
        assert_eq!(links.first.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=0"));
        assert_eq!(links.next.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=4"));
        assert_eq!(links.last.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=4"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let links = page_links(BASE, &limit_param("2"), 4, 2, 5);
        assert!(links.next.is_none());
        assert!(links.last.is_none());
        assert_eq!(links.prev.as_deref(), Some("http://localhost:3005/blogPosts?limit=2&skip=2"));
    }

    #[test]
    fn test_empty_collection_has_no_links() {
        assert_eq!(page_links(BASE, &[], 0, 10, 0), PageLinks::default());
    }

    #[test]
    fn test_skip_at_u64_max_has_no_next() {
        let links = page_links(BASE, &[], u64::MAX, 2, 5);
        assert!(links.next.is_none());
        assert!(links.last.is_none());
        assert!(links.first.is_some());
    }

    #[test]
    fn test_filter_params_are_repeated_and_encoded() {
        let params = vec![("title".to_string(), "a b".to_string())];
        let links = page_links(BASE, &params, 0, 1, 2);
        assert_eq!(
            links.next.as_deref(),
            Some("http://localhost:3005/blogPosts?title=a+b&skip=1")
        );
    }
}
