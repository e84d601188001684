//! Result materialization: driver-native values to portable cell values and
//! output shapes.
//!
//! All null-marker collapsing happens here, once. Whatever shape the caller
//! requested, every individual value goes through [`collapse`] and is subject
//! to the same conversion policy.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{Result, SqlTaskError};
use crate::types::{CancellationToken, CellValue, NativeBlob, NativeResultSet, NativeValue, Row};

/// Chunk size for streaming large binary objects.
pub const BLOB_CHUNK_SIZE: usize = 81920;

/// Significant digits retained for exact numerics.
pub const DECIMAL_PRECISION: usize = 28;

/// Convert one driver-native value into its portable representation.
///
/// Per-type null markers collapse to [`CellValue::Null`], with one
/// exception: a null-marked exact numeric materializes as an empty string.
/// That asymmetry is a driver-compatibility quirk downstream consumers
/// depend on; do not unify it with the general null path.
pub fn collapse(value: NativeValue) -> Result<CellValue> {
    Ok(match value {
        NativeValue::Null => CellValue::Null,
        NativeValue::Varchar(None) => CellValue::Null,
        NativeValue::Varchar(Some(s)) => CellValue::Text(s),
        NativeValue::Number(None) => CellValue::Text(String::new()),
        NativeValue::Number(Some(s)) => CellValue::Decimal(quantize(&s)),
        NativeValue::Date(None) | NativeValue::Timestamp(None) | NativeValue::TimestampTz(None) => {
            CellValue::Null
        }
        NativeValue::Date(Some(s))
        | NativeValue::Timestamp(Some(s))
        | NativeValue::TimestampTz(Some(s)) => CellValue::DateTime(s),
        NativeValue::Clob(None) => CellValue::Null,
        NativeValue::Clob(Some(s)) => CellValue::Text(s),
        NativeValue::Blob(None) => CellValue::Null,
        NativeValue::Blob(Some(blob)) => match blob_to_base64(&blob)? {
            Some(encoded) => CellValue::Base64(encoded),
            None => CellValue::Null,
        },
        NativeValue::Int64(v) => CellValue::Integer(v),
        NativeValue::Float64(v) => CellValue::Float(v),
        NativeValue::Bool(v) => CellValue::Bool(v),
    })
}

/// Shape a reader result into row-documents, column order preserved.
pub fn rows(result: NativeResultSet, token: &CancellationToken) -> Result<Vec<Row>> {
    let mut out = Vec::with_capacity(result.rows.len());
    for row in result.rows {
        token.check()?;
        let values = row.into_iter().map(collapse).collect::<Result<Vec<_>>>()?;
        out.push(Row::new(&result.columns, values));
    }
    Ok(out)
}

/// Shape a scalar fetch. No rows at all yields an explicit empty value,
/// never an error; a present-but-null scalar follows the per-cell policy.
pub fn scalar(value: Option<NativeValue>) -> Result<CellValue> {
    match value {
        None => Ok(CellValue::Text(String::new())),
        Some(v) => collapse(v),
    }
}

/// Shape populated output parameters into a name-to-value mapping,
/// declaration order preserved. Input-only parameters never appear here;
/// the driver hands over output-direction parameters only.
pub fn parameter_map(out_parameters: Vec<(String, NativeValue)>) -> Result<Vec<(String, CellValue)>> {
    out_parameters
        .into_iter()
        .map(|(name, value)| Ok((name, collapse(value)?)))
        .collect()
}

/// Stream a BLOB in fixed-size chunks into a buffer sized to its declared
/// length, then base64-encode the whole buffer. Zero-length objects yield
/// `None`. A stream that ends before the declared length is a fatal
/// materialization error, never a silent truncation.
fn blob_to_base64(blob: &NativeBlob) -> Result<Option<String>> {
    if blob.is_empty() {
        return Ok(None);
    }

    let declared = blob.len() as usize;
    let mut data = Vec::with_capacity(declared);
    let mut buf = vec![0u8; BLOB_CHUNK_SIZE];
    let mut offset = 0u64;
    let mut remaining = declared;

    while remaining > 0 {
        let want = remaining.min(BLOB_CHUNK_SIZE);
        let read = blob.read(offset, &mut buf[..want]);
        if read == 0 {
            return Err(SqlTaskError::MaterializationFailed(
                "unexpected end of BLOB stream".to_string(),
            ));
        }
        data.extend_from_slice(&buf[..read]);
        offset += read as u64;
        remaining -= read;
    }

    Ok(Some(BASE64.encode(&data)))
}

/// Re-quantize an exact numeric rendering to [`DECIMAL_PRECISION`]
/// significant digits, rounding half-up, to iron out driver-specific
/// rounding artifacts. Values already within the precision pass through
/// unchanged, as do renderings this routine does not understand
/// (scientific notation, vendor-specific forms).
pub fn quantize(raw: &str) -> String {
    let trimmed = raw.trim();
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return trimmed.to_string();
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return trimmed.to_string();
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes())
        .map(|b| b - b'0')
        .collect();
    let mut point = int_part.len();

    let first_significant = match digits.iter().position(|&d| d != 0) {
        Some(i) => i,
        None => return format!("{sign}{unsigned}"),
    };
    let keep = first_significant + DECIMAL_PRECISION;
    if digits.len() <= keep {
        return format!("{sign}{unsigned}");
    }

    let round_up = digits[keep] >= 5;
    digits.truncate(keep);
    if round_up {
        let mut carry = true;
        let mut i = digits.len();
        while carry && i > 0 {
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                carry = false;
            }
        }
        if carry {
            digits.insert(0, 1);
            point += 1;
        }
    }

    // dropped integer-side digits come back as zeros to keep the magnitude
    while digits.len() < point {
        digits.push(0);
    }

    let int_digits: String = digits[..point].iter().map(|d| (d + b'0') as char).collect();
    let int_str = int_digits.trim_start_matches('0');
    let int_str = if int_str.is_empty() { "0" } else { int_str };
    let frac_digits: String = digits[point..].iter().map(|d| (d + b'0') as char).collect();

    if frac_digits.is_empty() {
        format!("{sign}{int_str}")
    } else {
        format!("{sign}{int_str}.{frac_digits}")
    }
}
