//! Schema-checked decoding of the model's JSON output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, ScanError};
use crate::models::receipt::ReceiptFields;

/// Decode the model output into receipt fields.
///
/// Every required field must be present with the right JSON type: strings
/// for `date`, `company`, `category`, `description`; numbers for `total`,
/// `totalTax`, `gst`, `pst`. Missing values are never defaulted. Extra keys
/// are ignored.
pub fn decode_fields(value: &Value) -> Result<ReceiptFields> {
    let object = value.as_object().ok_or_else(|| malformed("<root>", "not a JSON object"))?;

    let date_text = string_field(object, "date")?;
    let company = string_field(object, "company")?;
    let category = string_field(object, "category")?;
    let description = string_field(object, "description")?;
    let total = number_field(object, "total")?;
    let total_tax = number_field(object, "totalTax")?;
    let gst = number_field(object, "gst")?;
    let pst = number_field(object, "pst")?;

    let date = NaiveDate::parse_from_str(date_text.trim(), "%Y-%m-%d")
        .map_err(|_| malformed("date", "not a YYYY-MM-DD date"))?;

    Ok(ReceiptFields {
        date,
        company: company.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        total,
        total_tax,
        gst,
        pst,
    })
}

fn string_field<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(malformed(field, "expected a string")),
        None => Err(malformed(field, "missing")),
    }
}

fn number_field(object: &Map<String, Value>, field: &'static str) -> Result<Decimal> {
    match object.get(field) {
        Some(Value::Number(n)) => number_to_decimal(n).ok_or_else(|| malformed(field, "out of range")),
        Some(_) => Err(malformed(field, "expected a number")),
        None => Err(malformed(field, "missing")),
    }
}

fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    n.as_f64().and_then(Decimal::from_f64)
}

fn malformed(field: &'static str, reason: &str) -> ScanError {
    warn!(field, reason, "extraction response rejected");
    ScanError::MalformedExtraction { field }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "date": "2024-02-10",
            "company": "Beta",
            "category": "Dining",
            "description": "lunch",
            "total": 21.5,
            "totalTax": 1.5,
            "gst": 1,
            "pst": 0.5
        })
    }

    fn field_of(err: ScanError) -> &'static str {
        match err {
            ScanError::MalformedExtraction { field } => field,
            other => panic!("expected MalformedExtraction, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_valid() {
        let fields = decode_fields(&valid()).unwrap();

        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(fields.company, "Beta");
        assert_eq!(fields.total, Decimal::new(2150, 2));
        assert_eq!(fields.total_tax, Decimal::new(150, 2));
        assert_eq!(fields.gst, Decimal::ONE);
        assert_eq!(fields.pst, Decimal::new(5, 1));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut value = valid();
        value["currency"] = json!("CAD");
        assert!(decode_fields(&value).is_ok());
    }

    #[test]
    fn test_missing_gst_is_not_defaulted() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("gst");

        let err = decode_fields(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to extract receipt information: AI response did not match the expected format."
        );
        assert_eq!(field_of(err), "gst");
    }

    #[test]
    fn test_each_missing_field_rejected() {
        for field in crate::extraction::prompt::REQUIRED_FIELDS {
            let mut value = valid();
            value.as_object_mut().unwrap().remove(field);
            assert_eq!(field_of(decode_fields(&value).unwrap_err()), field);
        }
    }

    #[test]
    fn test_wrong_types_rejected() {
        let mut value = valid();
        value["total"] = json!("21.50");
        assert_eq!(field_of(decode_fields(&value).unwrap_err()), "total");

        let mut value = valid();
        value["company"] = json!(42);
        assert_eq!(field_of(decode_fields(&value).unwrap_err()), "company");

        let mut value = valid();
        value["pst"] = Value::Null;
        assert_eq!(field_of(decode_fields(&value).unwrap_err()), "pst");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            decode_fields(&json!([1, 2, 3])),
            Err(ScanError::MalformedExtraction { .. })
        ));
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let mut value = valid();
        value["date"] = json!("Feb 10, 2024");
        assert_eq!(field_of(decode_fields(&value).unwrap_err()), "date");
    }
}
