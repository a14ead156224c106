/// Filter and sort parameters for `GET /posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl PostQuery {
    /// Build from raw control values; empty strings mean "not set".
    pub fn from_controls(category: &str, sort: &str, direction: &str) -> Self {
        fn non_empty(v: &str) -> Option<String> {
            (!v.is_empty()).then(|| v.to_string())
        }
        PostQuery {
            category: non_empty(category),
            sort: non_empty(sort),
            direction: non_empty(direction),
        }
    }

    fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("category", self.category.as_deref()),
            ("sort", self.sort.as_deref()),
            ("direction", self.direction.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }

    /// Encoded query string without the leading `?`, possibly empty.
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.pairs())
    }
}

/// Encode key/value pairs as `k=v&k2=v2`, percent-encoding the values.
pub fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `path?query`, or just `path` when the query is empty.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
