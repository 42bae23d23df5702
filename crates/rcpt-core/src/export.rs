//! CSV export of receipt views.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::receipt::Receipt;

/// Name of the exported file.
pub const EXPORT_FILE_NAME: &str = "receipts.csv";

/// Header row of the export.
pub const CSV_HEADER: &str = "Date,Company,Category,Description,GST,PST,Total Tax,Total";

/// Serialize receipts to CSV, one row per receipt in the given order.
///
/// Text columns are always quoted with embedded quotes doubled; amounts have
/// exactly two decimals. Rows are separated by `\n` with no trailing newline.
/// An empty input gives the header alone.
pub fn to_csv<'a>(records: impl IntoIterator<Item = &'a Receipt>) -> String {
    let mut output = String::from(CSV_HEADER);

    for receipt in records {
        output.push('\n');
        output.push_str(&csv_row(receipt));
    }

    output
}

fn csv_row(receipt: &Receipt) -> String {
    [
        quote(&receipt.date.format("%Y-%m-%d").to_string()),
        quote(&receipt.company),
        quote(&receipt.category),
        quote(&receipt.description),
        format_amount(receipt.gst),
        format_amount(receipt.pst),
        format_amount(receipt.total_tax),
        format_amount(receipt.total),
    ]
    .join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Format an amount with exactly two decimals.
///
/// Rounds the decimal value half away from zero, so `1.005` becomes `1.01`
/// rather than the `1.00` a binary float would give.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::receipt;
    use crate::filter::{ReceiptQuery, filter_receipts};
    use crate::models::receipt::ReceiptFields;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn scenario() -> Vec<Receipt> {
        vec![
            Receipt::new(
                ReceiptFields {
                    date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                    company: "Acme".to_string(),
                    category: "Gas".to_string(),
                    description: "fuel".to_string(),
                    total: Decimal::new(4000, 2),
                    total_tax: Decimal::new(200, 2),
                    gst: Decimal::new(200, 2),
                    pst: Decimal::ZERO,
                },
                "",
            ),
            Receipt::new(
                ReceiptFields {
                    date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
                    company: "Beta".to_string(),
                    category: "Dining".to_string(),
                    description: "lunch".to_string(),
                    total: Decimal::new(215, 1),
                    total_tax: Decimal::new(15, 1),
                    gst: Decimal::ONE,
                    pst: Decimal::new(5, 1),
                },
                "",
            ),
        ]
    }

    #[test]
    fn test_empty_is_header_only() {
        assert_eq!(to_csv(&[] as &[Receipt]), CSV_HEADER);
    }

    #[test]
    fn test_filtered_scenario() {
        let records = scenario();
        let view = filter_receipts(&records, &ReceiptQuery::new().with_start_date("2024-02-01"));

        assert_eq!(
            to_csv(view),
            "Date,Company,Category,Description,GST,PST,Total Tax,Total\n\
             \"2024-02-10\",\"Beta\",\"Dining\",\"lunch\",1.00,0.50,1.50,21.50"
        );
    }

    #[test]
    fn test_rows_follow_input_order() {
        let records = scenario();
        let csv = to_csv(records.iter().rev());
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"2024-02-10\",\"Beta\""));
        assert_eq!(lines[2], "\"2024-01-05\",\"Acme\",\"Gas\",\"fuel\",2.00,0.00,2.00,40.00");
    }

    #[test]
    fn test_quotes_are_doubled() {
        let records = vec![receipt("2024-01-01", "O\"Brien", "Pub \"food\"", "a \"pint\"")];
        let csv = to_csv(&records);

        assert!(csv.contains("\"O\"\"Brien\""));
        assert!(csv.contains("\"Pub \"\"food\"\"\""));
        assert!(csv.contains("\"a \"\"pint\"\"\""));
    }

    #[test]
    fn test_amount_rounding() {
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::new(1234567, 0)), "1234567.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_amount_midpoint_rounds_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_amount(Decimal::new(1004, 3)), "1.00");
        assert_eq!(format_amount(Decimal::new(-1005, 3)), "-1.01");
    }

    #[test]
    fn test_output_parses_as_csv() {
        let records = vec![
            receipt("2024-01-01", "O\"Brien, Ltd", "Dining", "fish, chips"),
            receipt("2024-01-02", "Plain", "Gas", "fuel"),
        ];
        let text = to_csv(&records);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 8);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "O\"Brien, Ltd");
        assert_eq!(&rows[0][3], "fish, chips");
        assert_eq!(&rows[1][7], "10.00");
    }
}
