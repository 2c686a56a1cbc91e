use crate::domain::listing::ListingSummary;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Business-broker search page, application/ld+json
//  └── mainEntity
//       └── itemListElement[]
//            └── item
//                 ├── url
//                 ├── name
//                 ├── image        (string | [string] | ImageObject)
//                 ├── address      (string | PostalAddress)
//                 ├── priceRange
//                 └── telephone
//
// Elements are read one at a time: an element of the wrong shape is
// skipped, a field of the wrong type is left unset.

#[derive(Debug, Deserialize)]
pub struct LdSearchPage {
    #[serde(rename = "mainEntity", default, deserialize_with = "lenient")]
    pub main_entity: Option<LdItemList>,
}

#[derive(Debug, Deserialize)]
pub struct LdItemList {
    #[serde(rename = "itemListElement", default, deserialize_with = "lenient_list")]
    pub item_list_element: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LdListElement {
    #[serde(default, deserialize_with = "lenient")]
    pub item: Option<LdBusiness>,
}

#[derive(Debug, Deserialize)]
pub struct LdBusiness {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    pub image: Option<Value>,
    pub address: Option<Value>,
    #[serde(rename = "priceRange", default, deserialize_with = "lenient_string")]
    pub price_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telephone: Option<String>,
}

impl LdSearchPage {
    /// `None` when the block carries no item list at all.
    pub fn into_summaries(self) -> Option<Vec<ListingSummary>> {
        let list = self.main_entity?;
        Some(
            list.item_list_element
                .into_iter()
                .filter_map(|el| serde_json::from_value::<LdListElement>(el).ok())
                .filter_map(|el| el.item)
                .filter_map(LdBusiness::into_summary)
                .collect(),
        )
    }
}

impl LdBusiness {
    /// Items without a url are skipped.
    pub fn into_summary(self) -> Option<ListingSummary> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(ListingSummary {
            url,
            name: self.name,
            image: self.image.as_ref().and_then(flatten_image),
            address: self.address.as_ref().and_then(flatten_address),
            price: self.price_range,
            telephone: self.telephone,
        })
    }
}

/// Any value that does not fit `T` reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Anything but an array reads as an empty list.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// A string, or the first string of an array. Other types read as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(first_string(&Value::deserialize(deserializer)?))
}

fn first_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_string),
        _ => None,
    }
}

fn flatten_image(v: &Value) -> Option<String> {
    match v {
        Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => items.iter().find_map(flatten_image),
        other => first_string(other),
    }
}

fn flatten_address(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let parts: Vec<&str> = [
                "streetAddress",
                "addressLocality",
                "addressRegion",
                "postalCode",
            ]
            .iter()
            .filter_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

// Flippa search API (format=js)
//  └── results[]
//       ├── listing_url
//       └── title

#[derive(Debug, Deserialize)]
pub struct FlippaSearchPage {
    #[serde(default, deserialize_with = "lenient")]
    pub results: Option<Vec<Value>>,
}

impl FlippaSearchPage {
    /// Results that are not objects are dropped; odd fields read as absent.
    pub fn into_listings(self) -> Vec<FlippaListing> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| serde_json::from_value(r).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlippaListing {
    #[serde(default, deserialize_with = "lenient_string")]
    pub listing_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ld_page_maps_items_to_summaries() {
        let page: LdSearchPage = serde_json::from_value(json!({
            "mainEntity": {
                "itemListElement": [
                    {"item": {
                        "url": "https://businessbroker.example/listing/1",
                        "name": "Pizza Place",
                        "image": ["https://img/1.jpg"],
                        "address": {"addressLocality": "Austin", "addressRegion": "TX"},
                        "priceRange": "$250,000",
                        "telephone": "555-0100"
                    }},
                    {"item": {"name": "No URL"}},
                    {"position": 3}
                ]
            }
        }))
        .unwrap();

        let summaries = page.into_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.url, "https://businessbroker.example/listing/1");
        assert_eq!(s.name.as_deref(), Some("Pizza Place"));
        assert_eq!(s.image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(s.address.as_deref(), Some("Austin, TX"));
        assert_eq!(s.price.as_deref(), Some("$250,000"));
        assert_eq!(s.telephone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn ld_page_without_main_entity_is_none() {
        let page: LdSearchPage = serde_json::from_value(json!({"@type": "WebPage"})).unwrap();
        assert!(page.into_summaries().is_none());
    }

    #[test]
    fn flippa_results_default_to_none() {
        let page: FlippaSearchPage = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_none());

        let page: FlippaSearchPage = serde_json::from_str(
            r#"{"results": [{"listing_url": "https://flippa.com/1", "id": 1}, {"listing_url": null}]}"#,
        )
        .unwrap();
        let results = page.into_listings();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].listing_url, None);
    }

    #[test]
    fn ld_page_skips_misshapen_items_and_keeps_the_rest() {
        let page: LdSearchPage = serde_json::from_value(json!({
            "mainEntity": {
                "itemListElement": [
                    {"item": "https://businessbroker.example/listing/0"},
                    "not an element",
                    {"item": {
                        "url": "https://businessbroker.example/listing/1",
                        "telephone": ["555-0101", "555-0102"],
                        "priceRange": 250000
                    }},
                    {"item": {"url": "https://businessbroker.example/listing/2", "name": 7}}
                ]
            }
        }))
        .unwrap();

        let summaries = page.into_summaries().unwrap();
        let urls: Vec<&str> = summaries.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://businessbroker.example/listing/1",
                "https://businessbroker.example/listing/2",
            ]
        );
        assert_eq!(summaries[0].telephone.as_deref(), Some("555-0101"));
        assert_eq!(summaries[0].price, None);
        assert_eq!(summaries[1].name, None);
    }

    #[test]
    fn ld_page_with_odd_main_entity_has_no_list() {
        let page: LdSearchPage =
            serde_json::from_value(json!({"mainEntity": "https://businessbroker.example/"})).unwrap();
        assert!(page.into_summaries().is_none());

        let page: LdSearchPage =
            serde_json::from_value(json!({"mainEntity": {"itemListElement": {"item": {}}}})).unwrap();
        assert!(page.into_summaries().unwrap().is_empty());
    }

    #[test]
    fn flippa_odd_results_are_dropped_or_blanked() {
        let page: FlippaSearchPage = serde_json::from_str(
            r#"{"results": [
                {"listing_url": 12345, "title": "Numeric"},
                "garbage",
                {"listing_url": "https://flippa.com/2", "title": ["SaaS"]}
            ]}"#,
        )
        .unwrap();

        let listings = page.into_listings();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].listing_url, None);
        assert_eq!(listings[0].title.as_deref(), Some("Numeric"));
        assert_eq!(listings[1].listing_url.as_deref(), Some("https://flippa.com/2"));
        assert_eq!(listings[1].title.as_deref(), Some("SaaS"));

        let page: FlippaSearchPage = serde_json::from_str(r#"{"results": {"a": 1}}"#).unwrap();
        assert!(page.into_listings().is_empty());
    }
}
