//! Item data model and payload validation
//!
//! Defines the persisted `Item` record, the accepted size values, and the
//! partial create/update payload with its field rules.

use serde::{Deserialize, Deserializer, Serialize};

/// Accepted item sizes, stored in short form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    S,
    M,
    L,
}

impl Size {
    /// Parse user input, accepting long forms and any letter case
    ///
    /// Long forms (`small`/`medium`/`large`) are canonicalized to the short
    /// form before storage.
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "s" | "small" => Some(Self::S),
            "m" | "medium" => Some(Self::M),
            "l" | "large" => Some(Self::L),
            _ => None,
        }
    }
}

/// The persisted item record
///
/// The id is assigned by the server on creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub size: Size,
}

/// A single field of an incoming payload
///
/// Distinguishes a key that is absent from one that is explicitly null, so
/// partial updates only touch the fields the client actually sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Value))
    }
}

/// Incoming create/update payload with every field optional
///
/// Size is kept as the raw string here so validation can report the accepted
/// forms; normalization happens when the field is applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub price: Field<f64>,
    #[serde(default)]
    pub size: Field<String>,
}

impl ItemPayload {
    /// Check the payload against the field rules
    ///
    /// With `partial` set, absent fields are skipped; a present-null field
    /// fails its rule either way. Returns one message per failing field.
    pub fn validate(&self, partial: bool) -> Vec<String> {
        let mut errors = Vec::new();

        match &self.name {
            Field::Value(name) if !name.trim().is_empty() => {}
            Field::Value(_) | Field::Null => {
                errors.push("name must be a non-empty string".to_string());
            }
            Field::Absent if !partial => errors.push("name is required".to_string()),
            Field::Absent => {}
        }

        match &self.price {
            Field::Value(price) if price.is_finite() && *price >= 0.0 => {}
            Field::Value(_) | Field::Null => {
                errors.push("price must be a non-negative number".to_string());
            }
            Field::Absent if !partial => errors.push("price is required".to_string()),
            Field::Absent => {}
        }

        match &self.size {
            Field::Value(size) if Size::parse(size).is_some() => {}
            Field::Value(_) | Field::Null => {
                errors.push("size must be one of s, m, l, small, medium or large".to_string());
            }
            Field::Absent if !partial => errors.push("size is required".to_string()),
            Field::Absent => {}
        }

        errors
    }

    /// Build a new item from a full payload
    pub fn into_item(self, id: String) -> Result<Item, Vec<String>> {
        let errors = self.validate(false);
        if !errors.is_empty() {
            return Err(errors);
        }

        // Full validation guarantees every field carries a usable value.
        let (Field::Value(name), Field::Value(price), Field::Value(size)) =
            (self.name, self.price, self.size)
        else {
            return Err(vec!["payload is incomplete".to_string()]);
        };
        let Some(size) = Size::parse(&size) else {
            return Err(vec![
                "size must be one of s, m, l, small, medium or large".to_string(),
            ]);
        };

        Ok(Item {
            id,
            name,
            price,
            size,
        })
    }

    /// Apply a partial payload to an existing item
    ///
    /// Only supplied fields change; the id is never touched.
    pub fn apply_to(&self, item: &mut Item) -> Result<(), Vec<String>> {
        let errors = self.validate(true);
        if !errors.is_empty() {
            return Err(errors);
        }

        if let Field::Value(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Field::Value(price) = &self.price {
            item.price = *price;
        }
        if let Field::Value(size) = &self.size {
            if let Some(size) = Size::parse(size) {
                item.size = size;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ItemPayload {
        serde_json::from_str(json).expect("payload should parse")
    }

    #[test]
    fn test_size_parse_accepts_all_forms() {
        assert_eq!(Size::parse("s"), Some(Size::S));
        assert_eq!(Size::parse("Small"), Some(Size::S));
        assert_eq!(Size::parse("SMALL"), Some(Size::S));
        assert_eq!(Size::parse("medium"), Some(Size::M));
        assert_eq!(Size::parse("L"), Some(Size::L));
        assert_eq!(Size::parse("xl"), None);
        assert_eq!(Size::parse(""), None);
    }

    #[test]
    fn test_size_serializes_short_form() {
        assert_eq!(serde_json::to_string(&Size::S).unwrap(), "\"s\"");
        assert_eq!(serde_json::to_string(&Size::L).unwrap(), "\"l\"");
    }

    #[test]
    fn test_field_distinguishes_absent_and_null() {
        let p = payload(r#"{"name": null, "price": 3}"#);
        assert_eq!(p.name, Field::Null);
        assert_eq!(p.price, Field::Value(3.0));
        assert_eq!(p.size, Field::Absent);
    }

    #[test]
    fn test_full_validation_requires_all_fields() {
        let errors = payload("{}").validate(false);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("name")));
        assert!(errors.iter().any(|e| e.contains("price")));
        assert!(errors.iter().any(|e| e.contains("size")));
    }

    #[test]
    fn test_full_validation_rejects_bad_values() {
        let p = payload(r#"{"name": "  ", "price": -1, "size": "xl"}"#);
        let errors = p.validate(false);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("non-empty")));
        assert!(errors.iter().any(|e| e.contains("non-negative")));
    }

    #[test]
    fn test_partial_validation_skips_absent_fields() {
        assert!(payload(r#"{"price": 5}"#).validate(true).is_empty());
        assert!(payload("{}").validate(true).is_empty());
    }

    #[test]
    fn test_partial_validation_rejects_null_fields() {
        let errors = payload(r#"{"name": null}"#).validate(true);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("name"));
    }

    #[test]
    fn test_into_item_normalizes_size() {
        let p = payload(r#"{"name": "shirt", "price": 9.5, "size": "Large"}"#);
        let item = p.into_item("id-1".to_string()).unwrap();
        assert_eq!(item.name, "shirt");
        assert_eq!(item.price, 9.5);
        assert_eq!(item.size, Size::L);
    }

    #[test]
    fn test_into_item_rejects_invalid_payload() {
        let p = payload(r#"{"name": "shirt"}"#);
        let errors = p.into_item("id-1".to_string()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_apply_to_changes_only_supplied_fields() {
        let mut item = Item {
            id: "id-1".to_string(),
            name: "shirt".to_string(),
            price: 10.0,
            size: Size::M,
        };
        payload(r#"{"price": 5}"#).apply_to(&mut item).unwrap();
        assert_eq!(item.price, 5.0);
        assert_eq!(item.name, "shirt");
        assert_eq!(item.size, Size::M);
        assert_eq!(item.id, "id-1");
    }

    #[test]
    fn test_apply_to_rejects_invalid_fields() {
        let mut item = Item {
            id: "id-1".to_string(),
            name: "shirt".to_string(),
            price: 10.0,
            size: Size::M,
        };
        let errors = payload(r#"{"price": -2}"#).apply_to(&mut item).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("price"));
        assert_eq!(item.price, 10.0);
    }
}
