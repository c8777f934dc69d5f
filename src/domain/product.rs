use serde::{Deserialize, Deserializer, Serialize};

/// A seller's listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Stored snapshots written by older clients carry the price as a JSON
    /// string; deserialization tolerates both forms.
    #[serde(deserialize_with = "price_from_string_or_number")]
    pub price: f64,
}

/// Payload for publishing a new product. `price` is the raw form input and
/// is parsed once at the store boundary.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
}

/// Parses a raw price string into a non-negative amount.
pub fn parse_price(raw: &str) -> Result<f64, String> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("price is not a number: {raw:?}"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("price must be a non-negative amount: {raw:?}"));
    }
    Ok(amount)
}

fn price_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(amount) => Ok(amount),
        RawPrice::Text(raw) => parse_price(&raw).map_err(serde::de::Error::custom),
    }
}
