//! Hypermedia links attached to query results.
//!
//! Links are relative to the server root.

use std::fmt;

use axum::http::Uri;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Serialize, Serializer};
use serde_json::Value;

use sensorhub_domain::page::Page;

/// A result item with its own `self` link.
///
/// The link replaces any `self` field the item carries.
pub struct Linked<T> {
    pub item: T,
    pub self_link: String,
}

impl<T: Serialize> Serialize for Linked<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = match serde_json::to_value(&self.item) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(serde::ser::Error::custom("linked item is not an object")),
            Err(err) => return Err(serde::ser::Error::custom(err)),
        };
        fields.insert("self".to_string(), Value::String(self.self_link.clone()));
        fields.serialize(serializer)
    }
}

/// A page of linked items, with links to itself and to the next page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody<T> {
    pub data: Vec<Linked<T>>,
    pub next_index: i64,
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl<T> PageBody<T> {
    /// Decorate `page`, answered for a request to `uri`.
    pub fn new(page: Page<T>, uri: &Uri, item_link: impl Fn(&T) -> String) -> Self {
        let next = page.has_next().then(|| with_index(uri, page.next_index));
        Self {
            data: page
                .data
                .into_iter()
                .map(|item| Linked {
                    self_link: item_link(&item),
                    item,
                })
                .collect(),
            next_index: page.next_index,
            self_link: request_link(uri),
            next,
        }
    }
}

/// Characters left as is in a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `value` encoded as one path segment.
pub fn segment(value: &str) -> impl fmt::Display + '_ {
    utf8_percent_encode(value, SEGMENT)
}

/// Path and query of the request.
pub fn request_link(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}

/// The request link with its `index` parameter set to `index`.
///
/// Other parameters keep their order and encoding.
pub fn with_index(uri: &Uri, index: i64) -> String {
    let index_param = format!("index={index}");
    let mut replaced = false;
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|param| !param.is_empty())
        .map(|param| {
            if param == "index" || param.starts_with("index=") {
                replaced = true;
                index_param.clone()
            } else {
                param.to_string()
            }
        })
        .collect();
    if !replaced {
        params.push(index_param);
    }
    format!("{}?{}", uri.path(), params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(value: &str) -> Uri {
        value.parse().unwrap()
    }

    #[test]
    fn should_append_index_when_query_is_empty() {
        assert_eq!(with_index(&uri("/sensors"), 5), "/sensors?index=5");
    }

    #[test]
    fn should_replace_index_in_place_when_present() {
        assert_eq!(
            with_index(&uri("/sensor-types?count=2&index=2&unit=C"), 4),
            "/sensor-types?count=2&index=4&unit=C"
        );
    }

    #[test]
    fn should_not_confuse_parameters_sharing_a_prefix() {
        assert_eq!(
            with_index(&uri("/sensors?indexed=yes"), 1),
            "/sensors?indexed=yes&index=1"
        );
    }

    #[test]
    fn should_percent_encode_reserved_characters_in_segments() {
        assert_eq!(segment("t-1.a_b~c").to_string(), "t-1.a_b~c");
        assert_eq!(segment("a/b?c#d e").to_string(), "a%2Fb%3Fc%23d%20e");
    }

    #[test]
    fn should_emit_one_self_key_when_item_already_has_one() {
        let linked = Linked {
            item: serde_json::json!({"id": "t-1", "self": "elsewhere"}),
            self_link: "/sensor-types/t-1".to_string(),
        };
        let text = serde_json::to_string(&linked).unwrap();
        assert_eq!(text.matches("\"self\"").count(), 1);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["self"], "/sensor-types/t-1");
    }

    #[test]
    fn should_link_next_page_only_when_resumable() {
        let request = uri("/sensor-types?count=1");
        let page = Page {
            data: vec!["a"],
            next_index: 1,
        };
        let body = PageBody::new(page, &request, |id| format!("/sensor-types/{id}"));
        assert_eq!(body.self_link, "/sensor-types?count=1");
        assert_eq!(body.next.as_deref(), Some("/sensor-types?count=1&index=1"));
        assert_eq!(body.data[0].self_link, "/sensor-types/a");

        let page = Page {
            data: Vec::<&str>::new(),
            next_index: -1,
        };
        let body = PageBody::new(page, &request, |id| format!("/sensor-types/{id}"));
        assert!(body.next.is_none());
    }
}
