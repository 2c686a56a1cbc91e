// src/domain/listing.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One listing as it appears on a search-results page.
/// `url` is the only identity a summary has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-text price range, e.g. "$250,000".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

/// Named single-valued fields of a `ListingDetail`, keyed the way labels
/// normalize. `industry` is multi-valued and lives outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Title,
    Location,
    Description,
    AskingPrice,
    AnnualRevenue,
    BusinessAge,
    Ebitda,
    Sde,
}

impl DetailField {
    pub const ALL: [DetailField; 8] = [
        DetailField::Title,
        DetailField::Location,
        DetailField::Description,
        DetailField::AskingPrice,
        DetailField::AnnualRevenue,
        DetailField::BusinessAge,
        DetailField::Ebitda,
        DetailField::Sde,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DetailField::Title => "title",
            DetailField::Location => "location",
            DetailField::Description => "description",
            DetailField::AskingPrice => "asking_price",
            DetailField::AnnualRevenue => "annual_revenue",
            DetailField::BusinessAge => "business_age",
            DetailField::Ebitda => "ebitda",
            DetailField::Sde => "sde",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Everything pulled off a single listing page.
///
/// Unset fields are skipped when serialized, so a missing selector never
/// shows up as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub industry: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asking_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebitda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sde: Option<String>,
    /// Catch-all for labels not promoted to a named field, in page order.
    #[serde(default)]
    pub additional_info: IndexMap<String, String>,
}

impl ListingDetail {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    fn slot(&self, field: DetailField) -> &Option<String> {
        match field {
            DetailField::Title => &self.title,
            DetailField::Location => &self.location,
            DetailField::Description => &self.description,
            DetailField::AskingPrice => &self.asking_price,
            DetailField::AnnualRevenue => &self.annual_revenue,
            DetailField::BusinessAge => &self.business_age,
            DetailField::Ebitda => &self.ebitda,
            DetailField::Sde => &self.sde,
        }
    }

    fn slot_mut(&mut self, field: DetailField) -> &mut Option<String> {
        match field {
            DetailField::Title => &mut self.title,
            DetailField::Location => &mut self.location,
            DetailField::Description => &mut self.description,
            DetailField::AskingPrice => &mut self.asking_price,
            DetailField::AnnualRevenue => &mut self.annual_revenue,
            DetailField::BusinessAge => &mut self.business_age,
            DetailField::Ebitda => &mut self.ebitda,
            DetailField::Sde => &mut self.sde,
        }
    }

    pub fn get(&self, field: DetailField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: DetailField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn is_set(&self, field: DetailField) -> bool {
        self.slot(field).is_some()
    }

    /// True if `key` is already captured, either as a set named field or as
    /// an `additional_info` entry.
    pub fn has_key(&self, key: &str) -> bool {
        if self.additional_info.contains_key(key) {
            return true;
        }
        if key == "industry" {
            return !self.industry.is_empty();
        }
        DetailField::from_key(key).is_some_and(|f| self.is_set(f))
    }

    /// Top-level keys present in the serialized form.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = vec!["source_url"];
        if !self.industry.is_empty() {
            keys.push("industry");
        }
        keys.extend(
            DetailField::ALL
                .into_iter()
                .filter(|f| self.is_set(*f))
                .map(DetailField::key),
        );
        keys.push("additional_info");
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_round_trip() {
        for field in DetailField::ALL {
            assert_eq!(DetailField::from_key(field.key()), Some(field));
        }
        assert_eq!(DetailField::from_key("cash_flow"), None);
    }

    #[test]
    fn unset_fields_are_absent_when_serialized() {
        let mut detail = ListingDetail::new("https://example.com/listing/1");
        detail.set(DetailField::Title, "Bakery");

        let json = serde_json::to_value(&detail).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["title"], "Bakery");
        assert!(!obj.contains_key("asking_price"));
        assert!(!obj.contains_key("industry"));
        assert!(obj.values().all(|v| !v.is_null()));
    }

    #[test]
    fn has_key_sees_named_fields_and_catch_all() {
        let mut detail = ListingDetail::new("u");
        assert!(!detail.has_key("asking_price"));

        detail.set(DetailField::AskingPrice, "$10");
        detail
            .additional_info
            .insert("employees".into(), "4".into());
        detail.industry.push("Retail".into());

        assert!(detail.has_key("asking_price"));
        assert!(detail.has_key("employees"));
        assert!(detail.has_key("industry"));
        assert!(!detail.has_key("sde"));
    }

    #[test]
    fn summary_deserializes_with_only_url() {
        let s: ListingSummary = serde_json::from_str(r#"{"url": "https://x/1"}"#).unwrap();
        assert_eq!(s.url, "https://x/1");
        assert!(s.name.is_none());
    }
}
