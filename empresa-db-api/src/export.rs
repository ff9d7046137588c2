//! Export contract and delimited-text exporter.
//!
//! An exporter serializes the FULL, unpaginated result table — every row,
//! every column, column order as in the schema. The delimited implementation
//! writes straight to a `Vec<u8>` buffer:
//!
//! - **TSV**: Tab-separated. Control chars (`\t`, `\n`, `\r`) replaced with space.
//! - **CSV**: Comma-separated. RFC 4180 quoting (values containing `,`, `"`, or
//!   newlines are wrapped in double-quotes; internal `"` doubled).

use empresa_db_core::Table;
use thiserror::Error;

/// Errors from exporting a result table.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The table could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Capability of serializing a result table to a downloadable artifact.
pub trait Exporter {
    /// Serialize the full table. All rows, all columns, stable column order.
    fn export(&self, table: &Table) -> Result<Vec<u8>, ExportError>;
}

/// Delimiter type for tabular output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// The byte used between cells.
    #[inline]
    fn byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

/// Delimited-text exporter (TSV or CSV).
#[derive(Debug, Clone, Copy)]
pub struct DelimitedExporter {
    delimiter: Delimiter,
}

impl DelimitedExporter {
    /// Tab-separated exporter.
    pub fn tsv() -> Self {
        Self {
            delimiter: Delimiter::Tab,
        }
    }

    /// Comma-separated exporter with RFC 4180 quoting.
    pub fn csv() -> Self {
        Self {
            delimiter: Delimiter::Comma,
        }
    }

    fn write_cell(&self, out: &mut Vec<u8>, text: &str) {
        match self.delimiter {
            Delimiter::Tab => {
                // TSV cannot quote; collapse control characters to spaces.
                for ch in text.chars() {
                    match ch {
                        '\t' | '\n' | '\r' => out.push(b' '),
                        c => {
                            let mut buf = [0u8; 4];
                            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                        }
                    }
                }
            }
            Delimiter::Comma => {
                let needs_quoting =
                    text.contains([',', '"', '\n', '\r']);
                if needs_quoting {
                    out.push(b'"');
                    for ch in text.chars() {
                        if ch == '"' {
                            out.extend_from_slice(b"\"\"");
                        } else {
                            let mut buf = [0u8; 4];
                            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        }
                    }
                    out.push(b'"');
                } else {
                    out.extend_from_slice(text.as_bytes());
                }
            }
        }
    }
}

impl Exporter for DelimitedExporter {
    fn export(&self, table: &Table) -> Result<Vec<u8>, ExportError> {
        // Rough pre-size: header plus ~16 bytes per cell.
        let width = table.schema().width();
        let mut out = Vec::with_capacity((table.len() + 1) * width * 16);

        for (i, column) in table.schema().columns().iter().enumerate() {
            if i > 0 {
                out.push(self.delimiter.byte());
            }
            self.write_cell(&mut out, column);
        }
        out.push(b'\n');

        for (_, row) in table.records() {
            for (i, cell) in row.cells().iter().enumerate() {
                if i > 0 {
                    out.push(self.delimiter.byte());
                }
                self.write_cell(&mut out, &cell.to_string());
            }
            out.push(b'\n');
        }
        Ok(out)
    }
}
