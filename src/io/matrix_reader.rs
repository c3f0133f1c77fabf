use std::{
    fs::File,
    io::{BufRead, BufReader, Lines, Read},
    path::Path,
};

use serde::Deserialize;

use crate::{errors::*, instance::*};

/// Reads distance matrices in either of two formats:
///
/// - a line based text format: lines starting with `c` are comments, the header
///   `p tsp <n>` is followed by `n` rows of `n` whitespace separated integers;
/// - JSON: either an array of rows or an object `{"distances": [[...], ...]}`.
///
/// All entries pass the validation of [`DistanceMatrix::try_from_rows`].
pub trait DistanceMatrixReader: Sized {
    fn try_read_text<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_text_file<P: AsRef<Path>>(path: P) -> Result<Self>;
    fn try_read_json<R: Read>(reader: R) -> Result<Self>;
    fn try_read_json_file<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Picks the format by extension: `.json` is read as JSON, everything else as text
    fn try_read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let is_json = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::try_read_json_file(path)
        } else {
            Self::try_read_text_file(path)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MatrixDocument {
    Rows(Vec<Vec<i64>>),
    Object { distances: Vec<Vec<i64>> },
}

impl DistanceMatrixReader for DistanceMatrix {
    fn try_read_text<R: BufRead>(reader: R) -> Result<Self> {
        let rows = MatrixTextReader::try_new(reader)?.read_rows()?;
        Self::try_from_rows(rows)
    }

    fn try_read_text_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        Self::try_read_text(BufReader::new(reader))
    }

    fn try_read_json<R: Read>(reader: R) -> Result<Self> {
        let rows = match serde_json::from_reader(reader)? {
            MatrixDocument::Rows(rows) => rows,
            MatrixDocument::Object { distances } => distances,
        };
        Self::try_from_rows(rows)
    }

    fn try_read_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        Self::try_read_json(BufReader::new(reader))
    }
}

pub struct MatrixTextReader<R> {
    lines: Lines<R>,
    line_number: usize,
    number_of_cities: usize,
}

macro_rules! raise_error_unless {
    ($cond : expr, $line : expr, $info : expr) => {
        if !($cond) {
            return Err(TspError::parse($line, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $line : expr, $name : expr) => {{
        let Some(token) = $iterator.next() else {
            return Err(TspError::parse(
                $line,
                format!("Premature end of line when parsing {}.", $name),
            ));
        };

        match token.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(TspError::parse(
                    $line,
                    format!("Invalid value {:?} found. Cannot parse {}.", token, $name),
                ));
            }
        }
    }};
}

impl<R: BufRead> MatrixTextReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut matrix_reader = Self {
            lines: reader.lines(),
            line_number: 0,
            number_of_cities: 0,
        };

        matrix_reader.number_of_cities = matrix_reader.parse_header()?;
        Ok(matrix_reader)
    }

    pub fn number_of_cities(&self) -> usize {
        self.number_of_cities
    }

    /// Parses the `n` rows following the header; fails if rows are missing or
    /// non-comment content follows them.
    pub fn read_rows(mut self) -> Result<Vec<Vec<i64>>> {
        let n = self.number_of_cities;
        let mut rows = Vec::with_capacity(n);

        for row in 0..n {
            let line = self.next_non_comment_line()?;
            raise_error_unless!(
                line.is_some(),
                self.line_number,
                format!("Expected {n} rows, found only {row}")
            );

            let values: Vec<i64> = self.parse_row(line.unwrap_or_default())?;
            raise_error_unless!(
                values.len() == n,
                self.line_number,
                format!("Row {row} has {} entries, expected {n}", values.len())
            );
            rows.push(values);
        }

        raise_error_unless!(
            self.next_non_comment_line()?.is_none(),
            self.line_number,
            "Unexpected content after the last row"
        );

        Ok(rows)
    }

    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            self.line_number += 1;
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x.into()),
                Some(Ok(line)) if line.starts_with('c') || line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_header(&mut self) -> Result<usize> {
        let line = self.next_non_comment_line()?;

        raise_error_unless!(line.is_some(), self.line_number, "No header found");
        let line = line.unwrap_or_default();

        let mut parts = line.split_whitespace();

        raise_error_unless!(
            parts.next() == Some("p"),
            self.line_number,
            "Invalid header found; line should start with p"
        );

        raise_error_unless!(
            parts.next() == Some("tsp"),
            self.line_number,
            "Invalid header found; file type should be \"tsp\""
        );

        let number_of_cities: usize =
            parse_next_value!(parts, self.line_number, "Header>Number of cities");

        // rows are only allocated after this check
        if number_of_cities > MAX_CITIES as usize {
            return Err(TspError::TooManyCities {
                cities: number_of_cities,
                max: MAX_CITIES,
            });
        }

        raise_error_unless!(
            parts.next().is_none(),
            self.line_number,
            "Invalid header found; expected end of line"
        );

        Ok(number_of_cities)
    }

    fn parse_row(&self, line: String) -> Result<Vec<i64>> {
        line.split_whitespace()
            .map(|token| {
                token.parse().map_err(|_| {
                    TspError::parse(
                        self.line_number,
                        format!("Invalid value {token:?} found. Cannot parse distance."),
                    )
                })
            })
            .collect()
    }
}
