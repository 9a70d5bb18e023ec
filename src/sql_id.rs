/*!
 * SQL_ID and HASH_VALUE computation.
 *
 * Reproduces the identifiers the Oracle database assigns to a statement
 * (`DBMS_SQL_TRANSLATOR.SQL_ID` and `DBMS_SQL_TRANSLATOR.SQL_HASH`):
 *
 * 1. MD5 over the UTF-8 bytes of the statement followed by one NUL byte.
 * 2. The lower 8 digest bytes are read as two little-endian 32-bit words
 *    (Q3 and Q4) and joined high-to-low into a 64-bit value.
 * 3. The 64-bit value is cut into 13 fields (4 bits, then twelve windows of
 *    5 bits) and each field picks a symbol from a 32-character alphabet.
 *
 * HASH_VALUE is Q4 on its own.
 *
 * The text is hashed byte for byte: whitespace, case and literals all matter.
 */

use std::fmt;

use crate::errors::SqlIdError;

/// Number of characters in a sql_id
pub const SQL_ID_LEN: usize = 13;

/// Symbols used by sql_id, indexed by 5-bit field value
pub const SQL_ID_ALPHABET: &[u8; 32] = b"0123456789abcdfghjkmnpqrstuvwxyz";

/// Statement terminator appended before hashing
const NUL_TERMINATOR: [u8; 1] = [0x00];

/// Width in bits of the value encoded by a sql_id
const SQL_ID_BITS: usize = 64;

/// MD5 digest of a NUL-terminated statement, from which both identifiers derive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementDigest([u8; 16]);

impl StatementDigest {
    /// Digest a statement
    pub fn of(sql_text: &str) -> Self {
        Self::of_bytes(sql_text.as_bytes())
    }

    /// Digest raw statement bytes, which must already be UTF-8
    fn of_bytes(bytes: &[u8]) -> Self {
        let mut context = md5::Context::new();
        context.consume(bytes);
        context.consume(NUL_TERMINATOR);
        Self(context.compute().0)
    }

    /// Digest statement bytes after checking they are valid UTF-8
    pub fn from_utf8(bytes: &[u8]) -> Result<Self, SqlIdError> {
        std::str::from_utf8(bytes).map_err(|e| SqlIdError::Encoding {
            reason: e.to_string(),
        })?;
        Ok(Self::of_bytes(bytes))
    }

    /// Q3 with its byte pairs reversed
    fn q3(&self) -> u32 {
        u32::from_le_bytes([self.0[8], self.0[9], self.0[10], self.0[11]])
    }

    /// Q4 with its byte pairs reversed
    fn q4(&self) -> u32 {
        u32::from_le_bytes([self.0[12], self.0[13], self.0[14], self.0[15]])
    }

    /// The 64-bit value encoded by the sql_id
    pub fn lower_64(&self) -> u64 {
        (u64::from(self.q3()) << 32) | u64::from(self.q4())
    }

    /// Oracle SQL_ID of the statement
    pub fn sql_id(&self) -> String {
        let value = self.lower_64();
        (0..SQL_ID_LEN)
            .map(|field| {
                let (start, end) = field_bounds(field);
                let bits = end - start;
                let index = (value >> (SQL_ID_BITS - end)) & ((1u64 << bits) - 1);
                char::from(SQL_ID_ALPHABET[index as usize])
            })
            .collect()
    }

    /// Oracle HASH_VALUE of the statement
    pub fn hash_value(&self) -> u32 {
        self.q4()
    }
}

impl fmt::Display for StatementDigest {
    /// Lowercase hex, 32 characters
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Bit range `[start, end)` of a field, counted from the most significant bit.
///
/// Field 0 is `[0, 4)`, fields 1..=11 are `[5i - 1, 5i + 4)` and field 12 runs
/// from `5 * 12 - 1` to the last bit.
fn field_bounds(field: usize) -> (usize, usize) {
    match field {
        0 => (0, 4),
        f if f < SQL_ID_LEN - 1 => (f * 5 - 1, f * 5 + 4),
        f => (f * 5 - 1, SQL_ID_BITS),
    }
}

/// Compute the Oracle SQL_ID of a statement
pub fn sql_id(sql_text: &str) -> String {
    StatementDigest::of(sql_text).sql_id()
}

/// Compute the Oracle HASH_VALUE of a statement
pub fn hash_value(sql_text: &str) -> u32 {
    StatementDigest::of(sql_text).hash_value()
}

/// Compute the SQL_ID of statement bytes, rejecting input that is not UTF-8
pub fn sql_id_from_bytes(bytes: &[u8]) -> Result<String, SqlIdError> {
    Ok(StatementDigest::from_utf8(bytes)?.sql_id())
}

/// Compute the HASH_VALUE of statement bytes, rejecting input that is not UTF-8
pub fn hash_value_from_bytes(bytes: &[u8]) -> Result<u32, SqlIdError> {
    Ok(StatementDigest::from_utf8(bytes)?.hash_value())
}

/// Check that a string has the shape of a sql_id
pub fn is_valid_sql_id(candidate: &str) -> bool {
    candidate.len() == SQL_ID_LEN && candidate.bytes().all(|b| SQL_ID_ALPHABET.contains(&b))
}
