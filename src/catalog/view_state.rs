use serde::{Deserialize, Serialize};

fn default_all() -> String {
    "all".to_string()
}

fn default_sort() -> String {
    "next_due_asc".to_string()
}

/// The shareable view state, mirrored verbatim into the URL query string
/// (`?q=...&category=...&subfield=...&status=...&sort=...`). Missing
/// parameters decode to the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(rename = "q", default)]
    pub query: String,
    #[serde(default = "default_all")]
    pub category: String,
    #[serde(default = "default_all")]
    pub subfield: String,
    #[serde(default = "default_all")]
    pub status: String,
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            query: String::new(),
            category: default_all(),
            subfield: default_all(),
            status: default_all(),
            sort: default_sort(),
        }
    }
}

impl ViewState {
    /// Decode a URL query string. Unknown parameters are ignored; a string
    /// that does not parse at all yields the default state.
    pub fn decode(query_string: &str) -> ViewState {
        serde_urlencoded::from_str(query_string).unwrap_or_default()
    }

    /// Encode into a URL query string (the permalink tail).
    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}
