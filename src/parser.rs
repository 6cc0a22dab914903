//! Parser for the canonical auto-mpg text file.
//!
//! Each line holds nine whitespace-separated fields:
//! `mpg cylinders displacement horsepower weight acceleration model_year origin "make model"`.
//! Only mpg, model year and the quoted name are kept.

use crate::error::{Error, ParseError, ParseErrorKind, Result};
use crate::record::Record;
use std::path::Path;
use tracing::info;

const FIELD_COUNT: usize = 9;
const MPG_FIELD: usize = 0;
const YEAR_FIELD: usize = 6;
const NAME_FIELD: usize = 8;

/// Model years are stored as offsets from 1900.
const YEAR_BASE: i32 = 1900;

/// Known misspellings of manufacturer names and their corrections.
///
/// `toyouta` maps to `toyata`, not `toyota`. Existing outputs depend on
/// that spelling, so it is kept as is.
pub static MAKE_CORRECTIONS: &[(&str, &str)] = &[
    ("chevy", "chevrolet"),
    ("chevroelt", "chevrolet"),
    ("maxda", "mazda"),
    ("mercedes-benz", "mercedes"),
    ("toyouta", "toyata"),
    ("vokswagen", "volkswagen"),
    ("vw", "volkswagen"),
];

/// Corrects a raw make via [`MAKE_CORRECTIONS`] (exact, case-sensitive match).
/// Unknown makes are returned unchanged.
pub fn normalize_make(raw: &str) -> &str {
    MAKE_CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == raw)
        .map_or(raw, |&(_, right)| right)
}

/// Splits a line on runs of whitespace. A field opening with `"` runs to the
/// closing quote and may contain spaces; `""` inside it is a literal quote.
fn split_fields(line: &str) -> std::result::Result<Vec<String>, ParseErrorKind> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut field = String::new();
        if first == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err(ParseErrorKind::UnterminatedQuote),
                }
            }
        }
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            field.push(c);
        }
        fields.push(field);
    }

    Ok(fields)
}

/// Parses one canonical line into a [`Record`]. `line_no` is 1-based and is
/// only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> std::result::Result<Record, ParseError> {
    let err = |kind| ParseError { line: line_no, kind };

    let fields = split_fields(line).map_err(err)?;
    if fields.len() != FIELD_COUNT {
        return Err(err(ParseErrorKind::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        }));
    }

    let raw_mpg = &fields[MPG_FIELD];
    let mpg: f64 = raw_mpg
        .parse()
        .map_err(|_| err(ParseErrorKind::Mpg(raw_mpg.clone())))?;

    let raw_year = &fields[YEAR_FIELD];
    let offset: i32 = raw_year
        .parse()
        .map_err(|_| err(ParseErrorKind::Year(raw_year.clone())))?;

    let year = offset
        .checked_add(YEAR_BASE)
        .ok_or_else(|| err(ParseErrorKind::Year(raw_year.clone())))?;

    let mut name = fields[NAME_FIELD].split_whitespace();
    let raw_make = name.next().ok_or_else(|| err(ParseErrorKind::MissingName))?;
    let model = name.collect::<Vec<_>>().join(" ");

    Ok(Record::new(normalize_make(raw_make), model, year, mpg))
}

/// Parses every non-blank line of `text`, in order.
pub fn parse_str(text: &str) -> std::result::Result<Vec<Record>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line, idx + 1))
        .collect()
}

/// Reads and parses the canonical file at `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn parse_file(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let records = parse_str(&text)?;
    info!(records = records.len(), "Parsed canonical file");
    Ok(records)
}
