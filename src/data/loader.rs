use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ParseError, Result};

use super::model::Spectrum;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a spectrum from a whitespace-delimited text file.
///
/// Layout:
/// ```text
/// Frequency  Intensity          <- header, discarded
/// 1420000000 0.12
/// 1420001000 0.14
/// ...
/// ```
///
/// Bytes that are not valid UTF-8 are decoded lossily, so they surface as a
/// [`ParseError`] on the offending line rather than an I/O error.
pub fn load_spectrum(path: &Path) -> Result<Spectrum> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let spectrum = parse_spectrum(&text)?;
    log::debug!("Parsed {} rows from {}", spectrum.len(), path.display());
    Ok(spectrum)
}

/// Parse the text layout accepted by [`load_spectrum`].
///
/// The first line is the header and is never inspected. Whitespace-only
/// lines are skipped. Every other line must hold exactly two numbers.
pub fn parse_spectrum(text: &str) -> std::result::Result<Spectrum, ParseError> {
    let mut frequency = Vec::new();
    let mut intensity = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [f, i] => {
                frequency.push(parse_field(f, line_no, 1)?);
                intensity.push(parse_field(i, line_no, 2)?);
            }
            other => {
                return Err(ParseError::WrongColumnCount {
                    line: line_no,
                    found: other.len(),
                })
            }
        }
    }

    Ok(Spectrum {
        frequency,
        intensity,
    })
}

/// Write `spectrum` in the layout read by [`load_spectrum`].
pub fn write_spectrum(path: &Path, header: &str, spectrum: &Spectrum) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{header}")?;
    for (f, i) in spectrum.frequency.iter().zip(&spectrum.intensity) {
        writeln!(out, "{f} {i}")?;
    }
    out.flush()?;
    Ok(())
}

fn parse_field(token: &str, line: usize, column: usize) -> std::result::Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::NotNumeric {
        line,
        column,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn skips_header_and_parses_columns() {
        let text = "Frequency Intensity\n1420000000 0.5\n1420001000\t-1.25\n";
        let sp = parse_spectrum(text).unwrap();
        assert_eq!(sp.frequency, vec![1_420_000_000.0, 1_420_001_000.0]);
        assert_eq!(sp.intensity, vec![0.5, -1.25]);
    }

    #[test]
    fn header_is_not_parsed() {
        // a header of three non-numeric words must not trip the column check
        let sp = parse_spectrum("freq rel intensity\n1 2\n").unwrap();
        assert_eq!(sp.len(), 1);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let sp = parse_spectrum("h\n1 2\n\n   \n3 4\n\n").unwrap();
        assert_eq!(sp.frequency, vec![1.0, 3.0]);
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse_spectrum("header\n").unwrap().is_empty());
        assert!(parse_spectrum("").unwrap().is_empty());
    }

    #[test]
    fn non_numeric_field() {
        let err = parse_spectrum("h\n1 2\n3 abc\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::NotNumeric {
                line: 3,
                column: 2,
                token: "abc".into()
            }
        );
    }

    #[test]
    fn wrong_column_count() {
        let err = parse_spectrum("h\n1 2 3\n").unwrap_err();
        assert_eq!(err, ParseError::WrongColumnCount { line: 2, found: 3 });

        let err = parse_spectrum("h\n1 2\n4\n").unwrap_err();
        assert_eq!(err, ParseError::WrongColumnCount { line: 3, found: 1 });
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.txt");
        let original = Spectrum::new(
            vec![1_419_900_000.0, 1_420_405_750.0, 1_420_900_123.5],
            vec![-3.25, 12.0001, 0.1 + 0.2],
        )
        .unwrap();

        write_spectrum(&path, "Frequency Intensity", &original).unwrap();
        let loaded = load_spectrum(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        for (a, b) in loaded.frequency.iter().zip(&original.frequency) {
            assert!((a - b).abs() <= 1e-9 * b.abs());
        }
        for (a, b) in loaded.intensity.iter().zip(&original.intensity) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_spectrum(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "h\n1.0 x\n").unwrap();
        let err = load_spectrum(&path).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::NotNumeric { .. })));
    }

    #[test]
    fn invalid_utf8_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, b"h\n1420000000 \xff\xfe\n").unwrap();
        let err = load_spectrum(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::NotNumeric { line: 2, column: 2, .. })
        ));
    }

    #[test]
    fn invalid_utf8_header_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1_header.txt");
        std::fs::write(&path, b"Frequency Intensit\xe9\n1 2\n").unwrap();
        let sp = load_spectrum(&path).unwrap();
        assert_eq!(sp.frequency, vec![1.0]);
    }
}
