/*!
 * Structured-text mapping format.
 *
 * A small YAML subset, one entry per sql_id:
 *
 * ```text
 * 520mkxqpf15q8: select 2 from dual
 * 4tm03vndzdgp8: |-
 *   SELECT 'EXAMPLE TRANSLATION'
 *   FROM DUAL
 * ```
 *
 * A header starts at column 0 with the 13-character key and a colon. After the
 * colon, spaces and tabs are skipped and the rest of the line is the value,
 * unless it starts with `|-`: then the value is every following line indented
 * by exactly two spaces, with the indent stripped and `\n` appended to each.
 * The block ends at the first line without that indent, blank lines included.
 */

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use log::trace;

use crate::errors::{StoreError, StoreResult};
use crate::sql_id::SQL_ID_LEN;

/// Marker introducing a multi-line value
const BLOCK_MARKER: &str = "|-";

/// Indent of every line in a multi-line value
const BLOCK_INDENT: &str = "  ";

/// Value part of a header line
enum HeaderValue<'a> {
    Inline(&'a str),
    Block,
}

/// Parse a header line into its key and value part
fn parse_header(line: &str) -> Result<(&str, HeaderValue<'_>), String> {
    if line.trim().len() <= SQL_ID_LEN {
        return Err(format!(
            "expected '<sql_id>: <statement>', line is too short for a {}-character key",
            SQL_ID_LEN
        ));
    }

    let colon = match line.find(':') {
        Some(pos) if pos >= SQL_ID_LEN && pos < line.len() - 1 => pos,
        _ => {
            return Err(format!(
                "expected a {}-character key followed by ': '",
                SQL_ID_LEN
            ));
        }
    };

    let key = line
        .get(..SQL_ID_LEN)
        .ok_or_else(|| format!("key is not {} characters wide", SQL_ID_LEN))?;

    let value = line[colon + 1..].trim_start_matches([' ', '\t']);
    if value.starts_with(BLOCK_MARKER) {
        Ok((key, HeaderValue::Block))
    } else {
        Ok((key, HeaderValue::Inline(value)))
    }
}

/// Read a whole mapping source.
///
/// Fails on the first line that is neither blank, a header, nor part of a
/// multi-line value. Later duplicates of a key replace earlier ones.
pub fn read_mapping<R: BufRead>(reader: R) -> StoreResult<HashMap<String, String>> {
    let mut mapping = HashMap::new();
    let mut lines = reader.lines().enumerate().peekable();

    while let Some((index, line)) = lines.next() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = parse_header(&line).map_err(|message| StoreError::Format {
            line: index + 1,
            message,
        })?;

        let sql_text = match value {
            HeaderValue::Inline(text) => text.to_string(),
            HeaderValue::Block => {
                let mut block = String::with_capacity(line.len() * 16);
                while let Some((_, Ok(next))) = lines.peek() {
                    match next.strip_prefix(BLOCK_INDENT) {
                        Some(content) => {
                            block.push_str(content);
                            block.push('\n');
                        }
                        None => break,
                    }
                    lines.next();
                }
                block
            }
        };

        trace!("Read mapping for {}", key);
        mapping.insert(key.to_string(), sql_text);
    }

    Ok(mapping)
}

/// Read a mapping source held in memory
pub fn parse_mapping(source: &str) -> StoreResult<HashMap<String, String>> {
    read_mapping(source.as_bytes())
}

/// Write one entry.
///
/// Statements containing a newline are written as a `|-` block. Every block
/// line is read back with a newline appended, so exactly one trailing newline
/// of the statement is absorbed by the last block line.
pub fn write_entry<W: Write>(writer: &mut W, sql_id: &str, sql_text: &str) -> io::Result<()> {
    write!(writer, "{}: ", sql_id)?;
    if sql_text.contains('\n') {
        writeln!(writer, "{}", BLOCK_MARKER)?;
        let body = sql_text.strip_suffix('\n').unwrap_or(sql_text);
        for (i, line) in body.split('\n').enumerate() {
            if i > 0 {
                writer.write_all(b"\n")?;
            }
            write!(writer, "{}{}", BLOCK_INDENT, line)?;
        }
    } else {
        writer.write_all(sql_text.as_bytes())?;
    }
    writer.write_all(b"\n")
}

/// Write a set of entries, sorted by key
pub fn write_mapping<W, I, K, V>(writer: &mut W, entries: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<(K, V)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    for (sql_id, sql_text) in &entries {
        write_entry(writer, sql_id.as_ref(), sql_text.as_ref())?;
    }
    writer.flush()?;

    Ok(entries.len())
}
