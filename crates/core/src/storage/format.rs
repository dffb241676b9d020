//! Line-oriented persistence format.
//!
//! One six-line block per holding, fixed key order, blocks separated by a
//! blank line:
//!
//! ```text
//! type = "stock"
//! symbol = "IBM"
//! name = "International Business Machines"
//! quantity = "10"
//! price = "100.00"
//! bookvalue = "1009.99"
//! ```
//!
//! Values are always double-quoted; numeric fields are textual. Decoding
//! reconstructs holdings through [`Holding::restore`], so persisted book
//! values are taken as-is and fees are never recomputed on load.

use std::fmt::Write as _;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingKind};

/// Field keys of one record, in the fixed order they appear on disk.
pub const FIELD_KEYS: [&str; 6] = ["type", "symbol", "name", "quantity", "price", "bookvalue"];

/// Serialize holdings to the flat key-value text, in store order.
/// Quantity is written as an integer; price and book value with two
/// decimals.
#[must_use]
pub fn encode(holdings: &[Holding]) -> String {
    let mut out = String::new();
    for (i, holding) in holdings.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing to a String never fails.
        let _ = writeln!(out, "type = \"{}\"", holding.kind().tag());
        let _ = writeln!(out, "symbol = \"{}\"", holding.symbol());
        let _ = writeln!(out, "name = \"{}\"", holding.name());
        let _ = writeln!(out, "quantity = \"{}\"", holding.quantity());
        let _ = writeln!(out, "price = \"{:.2}\"", holding.price());
        let _ = writeln!(out, "bookvalue = \"{:.2}\"", holding.book_value());
    }
    out
}

/// Parse the flat text back into holdings, in file order.
///
/// Any malformed line fails the whole decode with the offending line
/// number; the caller decides how to recover (the tracker facade falls
/// back to an empty store with a warning).
pub fn decode(text: &str) -> Result<Vec<Holding>, CoreError> {
    let mut holdings = Vec::new();
    let mut lines = text.lines().enumerate().peekable();
    let line_count = text.lines().count();

    loop {
        // Skip blank separator lines between records.
        while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}
        if lines.peek().is_none() {
            break;
        }

        let mut record: Vec<(usize, String)> = Vec::with_capacity(FIELD_KEYS.len());
        for key in FIELD_KEYS {
            let (number, line) = lines.next().ok_or_else(|| CoreError::MalformedRecord {
                line: line_count,
                message: format!("record truncated, missing '{key}' line"),
            })?;
            let value = parse_field(number + 1, line, key)?;
            record.push((number + 1, value));
        }

        holdings.push(restore_record(&record)?);
    }

    Ok(holdings)
}

/// Parse one `key = "value"` line, checking the key against the fixed
/// record order and stripping the quotes.
fn parse_field(line_number: usize, line: &str, expected_key: &str) -> Result<String, CoreError> {
    let malformed = |message: String| CoreError::MalformedRecord {
        line: line_number,
        message,
    };

    let (key, value) = line
        .split_once('=')
        .ok_or_else(|| malformed(format!("expected `{expected_key} = \"...\"`")))?;

    let key = key.trim();
    if key != expected_key {
        return Err(malformed(format!(
            "expected key '{expected_key}', found '{key}'"
        )));
    }

    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| malformed("value must be wrapped in double quotes".into()))?;

    Ok(value.to_string())
}

/// Turn a complete six-field record (field value plus its line number)
/// into a holding. Numeric fields that fail to parse, unknown type tags,
/// and values the holding constructor rejects all surface as
/// `MalformedRecord` pointing at the offending line.
fn restore_record(record: &[(usize, String)]) -> Result<Holding, CoreError> {
    let malformed = |line: usize, message: String| CoreError::MalformedRecord { line, message };

    let (type_line, type_tag) = &record[0];
    let kind = HoldingKind::from_tag(type_tag)
        .ok_or_else(|| malformed(*type_line, format!("unknown holding type '{type_tag}'")))?;

    let (quantity_line, quantity_text) = &record[3];
    let quantity: u32 = quantity_text
        .parse()
        .map_err(|_| malformed(*quantity_line, format!("invalid quantity '{quantity_text}'")))?;

    let (price_line, price_text) = &record[4];
    let price: f64 = price_text
        .parse()
        .map_err(|_| malformed(*price_line, format!("invalid price '{price_text}'")))?;

    let (book_line, book_text) = &record[5];
    let book_value: f64 = book_text
        .parse()
        .map_err(|_| malformed(*book_line, format!("invalid bookvalue '{book_text}'")))?;

    Holding::restore(
        kind,
        record[1].1.as_str(),
        record[2].1.as_str(),
        quantity,
        price,
        book_value,
    )
    .map_err(|e| malformed(*type_line, e.to_string()))
}
