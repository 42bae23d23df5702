//! Instruction and response schema sent with every receipt image.

use serde_json::{Value, json};

/// The eight fields the model must return, in schema order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "date",
    "company",
    "category",
    "description",
    "total",
    "totalTax",
    "gst",
    "pst",
];

/// Instruction text accompanying the image.
pub const INSTRUCTION: &str = "Analyze this receipt image and extract the company name, date, \
a brief summary of items, spending category, and total amount. Also extract the tax details. \
Provide the total tax, and if available, a breakdown of GST (Goods and Services Tax) and PST \
(Provincial Sales Tax). If a tax breakdown isn't available, set gst and pst to 0. \
Provide the output in the requested JSON format.";

/// Response schema (OpenAPI subset) with every field required.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "date": {
                "type": "STRING",
                "description": "The date of the transaction in YYYY-MM-DD format. Infer from the receipt."
            },
            "company": {
                "type": "STRING",
                "description": "The name of the company or vendor from which the purchase was made."
            },
            "category": {
                "type": "STRING",
                "description": "A relevant spending category for the purchase (e.g., \"Groceries\", \"Dining\", \"Gas\", \"Office Supplies\", \"Travel\", \"Entertainment\")."
            },
            "description": {
                "type": "STRING",
                "description": "A brief, one-sentence summary of the key items purchased."
            },
            "total": {
                "type": "NUMBER",
                "description": "The final total amount of the transaction, including tax."
            },
            "totalTax": {
                "type": "NUMBER",
                "description": "The total tax amount on the receipt. If not present, this should be 0. It should be the sum of GST and PST if they are present."
            },
            "gst": {
                "type": "NUMBER",
                "description": "The Goods and Services Tax (GST) amount. If not present or not applicable, this should be 0."
            },
            "pst": {
                "type": "NUMBER",
                "description": "The Provincial Sales Tax (PST) amount. If not present or not applicable, this should be 0."
            }
        },
        "required": REQUIRED_FIELDS,
    })
}
