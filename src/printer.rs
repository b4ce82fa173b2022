//! # Row Printer
//!
//! Renders rows in the shell's fixed layout:
//!
//! ```text
//! ----------------------------------------
//! user#42
//!   d:name                                   @ 2018/01/01-00:00:00.000000
//!     "alice"
//!   d:age                                    @ 2018/01/01-00:00:00.000000
//!     30
//! ```
//!
//! Qualifiers are left-aligned in a 40-character field; longer qualifiers are
//! not truncated. Versions print in UTC with microseconds. Values go through
//! [`DecodeConfig::render`].

use crate::decode::DecodeConfig;
use crate::row::Row;
use chrono::{DateTime, Utc};
use std::io::{self, Write};

const ROW_SEPARATOR_WIDTH: usize = 40;
const QUALIFIER_WIDTH: usize = 40;
const VERSION_FORMAT: &str = "%Y/%m/%d-%H:%M:%S%.6f";

pub struct RowPrinter<'a, W: Write> {
    out: W,
    decode: &'a DecodeConfig,
}

impl<'a, W: Write> RowPrinter<'a, W> {
    pub fn new(out: W, decode: &'a DecodeConfig) -> Self {
        Self { out, decode }
    }

    pub fn print_rows(&mut self, rows: &[Row]) -> io::Result<()> {
        for row in rows {
            self.print_row(row)?;
        }
        Ok(())
    }

    pub fn print_row(&mut self, row: &Row) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(ROW_SEPARATOR_WIDTH))?;
        writeln!(self.out, "{}", row.display_key())?;

        for column in &row.columns {
            writeln!(
                self.out,
                "  {:<width$} @ {}",
                column.qualifier,
                format_version(&column.version),
                width = QUALIFIER_WIDTH
            )?;
            writeln!(
                self.out,
                "    {}",
                self.decode.render(&column.qualifier, &column.value)
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_version(version: &DateTime<Utc>) -> String {
    version.format(VERSION_FORMAT).to_string()
}

/// Renders `rows` into a string, one block per row.
pub fn render_rows(rows: &[Row], decode: &DecodeConfig) -> String {
    let mut printer = RowPrinter::new(Vec::new(), decode);
    // Writing into a Vec cannot fail.
    let _ = printer.print_rows(rows);
    String::from_utf8_lossy(&printer.into_inner()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeType;
    use crate::row::Column;

    fn version() -> DateTime<Utc> {
        DateTime::from_timestamp(1_514_764_800, 0).unwrap()
    }

    #[test]
    fn prints_row_layout() {
        let row = Row::new("a", vec![Column::new("d", "d:row", "a1", version())]);
        let out = render_rows(&[row], &DecodeConfig::default());
        assert_eq!(
            out,
            "----------------------------------------\n\
             a\n  \
             d:row                                    @ 2018/01/01-00:00:00.000000\n    \
             \"a1\"\n"
        );
    }

    #[test]
    fn version_keeps_microseconds() {
        let v = DateTime::from_timestamp(1_514_764_800, 123_456_000).unwrap();
        assert_eq!(format_version(&v), "2018/01/01-00:00:00.123456");
        assert_eq!(
            format_version(&DateTime::from_timestamp(0, 0).unwrap()),
            "1970/01/01-00:00:00.000000"
        );
    }

    #[test]
    fn decodes_values_per_column() {
        let row = Row::new(
            "a",
            vec![
                Column::new("d", "d:n", 1i64.to_be_bytes(), version()),
                Column::new("d", "d:s", "x", version()),
            ],
        );
        let out = render_rows(&[row], &DecodeConfig::with_default(DecodeType::Int));
        let values: Vec<&str> = out.lines().filter(|l| l.starts_with("    ")).collect();
        assert_eq!(values, vec!["    1", "    \"x\""]);
    }

    #[test]
    fn long_qualifier_is_not_truncated() {
        let qualifier = format!("d:{}", "q".repeat(50));
        let row = Row::new("k", vec![Column::new("d", qualifier.clone(), "v", version())]);
        let out = render_rows(&[row], &DecodeConfig::default());
        assert!(out.contains(&format!("  {} @ ", qualifier)));
    }

    #[test]
    fn every_row_gets_a_separator() {
        let rows = vec![Row::new("a", vec![]), Row::new("b", vec![])];
        let out = render_rows(&rows, &DecodeConfig::default());
        assert_eq!(out.matches(&"-".repeat(40)).count(), 2);
        assert!(out.ends_with("b\n"));
    }
}
