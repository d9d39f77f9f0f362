use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap_or_else(|e| panic!("invalid placeholder pattern: {e}"))
});

/// Replace every `{{name}}` in `template` with the matching path parameter.
///
/// Placeholders without a matching parameter are left as they are and will
/// never match a granted permission.
pub fn substitute(template: &str, params: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of all placeholders used in `template`
pub fn placeholders(template: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Names of the path parameters declared by an axum route path (`/v1/communities/:communityUid`)
pub fn path_params(path: &str) -> BTreeSet<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':').or_else(|| segment.strip_prefix('*')))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
