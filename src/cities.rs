/*
 *  cities.rs
 *
 *  citymap - every city, one pixel
 *  (c) 2020-26 Stuart Hunter
 *
 *  CSV backed city database - sequential scan and exact (name, region) lookup
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Field separator. There is no quoting support, see [`tokenize`].
pub const DELIMITER: char = ',';

/// Fixed column positions (0-based) of the fields a [`Record`] is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub name: usize,
    pub region: usize,
    /// longitude or equivalent
    pub x: usize,
    /// latitude or equivalent
    pub y: usize,
}

impl ColumnMap {
    /// SimpleMaps `uscities.csv`: city, city_ascii, state_id, ... lat, lng, ...
    pub const USCITIES: ColumnMap = ColumnMap { name: 0, region: 2, x: 9, y: 8 };

    /// Minimum number of fields a data line must carry
    pub fn required_fields(&self) -> usize {
        self.name.max(self.region).max(self.x).max(self.y) + 1
    }

    /// True when no two roles share a column
    pub fn is_distinct(&self) -> bool {
        let cols = [self.name, self.region, self.x, self.y];
        cols.iter()
            .enumerate()
            .all(|(i, c)| !cols[i + 1..].contains(c))
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap::USCITIES
    }
}

/// One data row. `x`/`y` are source-space coordinates (longitude, latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub region: String,
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} ({:.4}, {:.4})", self.name, self.region, self.x, self.y)
    }
}

/// Split a line on [`DELIMITER`] and delete every double quote.
///
/// No quoting state is tracked, so `"Washington, DC"` splits in two. Splitting
/// mirrors a stream `getline` loop: an empty line has no fields and a single
/// trailing delimiter does not add an empty field.
pub fn tokenize(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    let mut tokens: Vec<String> = line
        .split(DELIMITER)
        .map(|t| t.replace('"', ""))
        .collect();
    if line.ends_with(DELIMITER) {
        tokens.pop();
    }
    tokens
}

/// Dataset handle. Owns the reader and the one cursor over it.
///
/// Line 1 is always a header and is skipped on open and on every
/// [`reset`](CitiesDb::reset). Cursor operations take `&mut self`; give each
/// caller its own handle rather than sharing one across threads.
pub struct CitiesDb<R> {
    reader: R,
    columns: ColumnMap,
    source: PathBuf,
    line_no: usize,
    line: String,
    raw: Vec<u8>,
}

impl CitiesDb<BufReader<File>> {
    /// Open a CSV file, positioned on the first data line
    pub fn open(path: impl AsRef<Path>, columns: ColumnMap) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let db = Self::with_source(BufReader::new(file), columns, path.to_path_buf())?;
        debug!("Opened city database '{}'", path.display());
        Ok(db)
    }
}

impl<R: BufRead + Seek> CitiesDb<R> {
    /// Wrap an already open reader (in-memory data, tests)
    pub fn from_reader(reader: R, columns: ColumnMap) -> Result<Self> {
        Self::with_source(reader, columns, PathBuf::from("<reader>"))
    }

    fn with_source(reader: R, columns: ColumnMap, source: PathBuf) -> Result<Self> {
        let mut db = Self {
            reader,
            columns,
            source,
            line_no: 0,
            line: String::new(),
            raw: Vec::new(),
        };
        db.reset()?;
        Ok(db)
    }

    pub fn columns(&self) -> ColumnMap {
        self.columns
    }

    /// Where the data came from, for messages
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Rewind to the first data line
    pub fn reset(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::io(&self.source, e))?;
        self.line_no = 0;
        // header
        self.read_line()?;
        Ok(())
    }

    /// Read the next data line into a record. `Ok(None)` at end of data.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        match self.next_row()? {
            Some(tokens) => self.to_record(&tokens).map(Some),
            None => Ok(None),
        }
    }

    /// Lazy pass over the remaining lines. Restart with [`reset`](CitiesDb::reset).
    pub fn records(&mut self) -> Records<'_, R> {
        Records { db: self }
    }

    /// First record in file order whose name and region match exactly.
    ///
    /// Always rescans from the top. On success the cursor sits on the line
    /// after the match, otherwise at end of data.
    pub fn find(&mut self, name: &str, region: &str) -> Result<Record> {
        let tokens = self.find_row(name, region)?;
        let record = self.to_record(&tokens)?;
        debug!("Found {} at line {}", record, self.line_no);
        Ok(record)
    }

    /// All raw fields of the first matching line, for columns outside the map
    pub fn find_fields(&mut self, name: &str, region: &str) -> Result<Vec<String>> {
        self.find_row(name, region)
    }

    fn find_row(&mut self, name: &str, region: &str) -> Result<Vec<String>> {
        self.reset()?;
        while let Some(tokens) = self.next_row()? {
            if tokens[self.columns.name] == name && tokens[self.columns.region] == region {
                return Ok(tokens);
            }
        }
        Err(Error::NotFound {
            name: name.to_string(),
            region: region.to_string(),
        })
    }

    /// Tokenized next line, checked against the column map
    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if !self.read_line()? {
            return Ok(None);
        }
        let tokens = tokenize(&self.line);
        let expected = self.columns.required_fields();
        if tokens.len() < expected {
            return Err(Error::MalformedRecord {
                line: self.line_no,
                expected,
                found: tokens.len(),
            });
        }
        Ok(Some(tokens))
    }

    fn to_record(&self, tokens: &[String]) -> Result<Record> {
        let x = parse_coord(&tokens[self.columns.x], self.line_no, self.columns.x)?;
        let y = parse_coord(&tokens[self.columns.y], self.line_no, self.columns.y)?;
        Ok(Record {
            name: tokens[self.columns.name].clone(),
            region: tokens[self.columns.region].clone(),
            x,
            y,
        })
    }

    /// Next line as text. Bytes that are not UTF-8 decode to U+FFFD, so a
    /// Latin-1 row only garbles its own fields.
    fn read_line(&mut self) -> Result<bool> {
        self.raw.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.raw)
            .map_err(|e| Error::io(&self.source, e))?;
        if n == 0 {
            self.line.clear();
            return Ok(false);
        }
        self.line_no += 1;
        if self.raw.ends_with(b"\n") {
            self.raw.pop();
            if self.raw.ends_with(b"\r") {
                self.raw.pop();
            }
        }
        self.line = String::from_utf8_lossy(&self.raw).into_owned();
        Ok(true)
    }
}

fn parse_coord(value: &str, line: usize, column: usize) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidNumber {
            line,
            column,
            value: value.to_string(),
        })
}

/// Single-pass record iterator borrowed from a [`CitiesDb`]
pub struct Records<'a, R> {
    db: &'a mut CitiesDb<R>,
}

impl<R: BufRead + Seek> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.db.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SIMPLE: ColumnMap = ColumnMap { name: 0, region: 1, x: 3, y: 2 };

    fn db(text: &str) -> CitiesDb<Cursor<Vec<u8>>> {
        CitiesDb::from_reader(Cursor::new(text.as_bytes().to_vec()), SIMPLE).unwrap()
    }

    const DATA: &str = "city,state,lat,lng\n\
                        Seattle,WA,47.6,-122.3\n\
                        Austin,TX,30.3,-97.7\n\
                        Portland,OR,45.5,-122.7\n\
                        Portland,ME,43.7,-70.3\n";

    #[test]
    fn test_tokenize_strips_every_quote() {
        assert_eq!(
            tokenize("\"Seattle\",WA,47.6,-122.3"),
            vec!["Seattle", "WA", "47.6", "-122.3"]
        );
        assert_eq!(tokenize("O\"Bri\"en,X"), vec!["OBrien", "X"]);
    }

    #[test]
    fn test_tokenize_getline_edges() {
        assert!(tokenize("").is_empty());
        assert_eq!(tokenize("a,,b"), vec!["a", "", "b"]);
        assert_eq!(tokenize("a,b,"), vec!["a", "b"]);
        assert_eq!(tokenize(","), vec![""]);
    }

    #[test]
    fn test_tokenize_does_not_honor_quotes() {
        assert_eq!(tokenize("\"Washington, DC\",DC"), vec!["Washington", " DC", "DC"]);
    }

    #[test]
    fn test_reset_skips_header() {
        let mut db = db(DATA);
        db.next_record().unwrap();
        db.next_record().unwrap();
        db.reset().unwrap();
        let first = db.next_record().unwrap().unwrap();
        assert_eq!(first.name, "Seattle");
        assert_eq!(first.region, "WA");
        assert_eq!(first.x, -122.3);
        assert_eq!(first.y, 47.6);
    }

    #[test]
    fn test_records_in_file_order() {
        let mut db = db(DATA);
        let names: Vec<String> = db.records().map(|r| r.unwrap().name).collect();
        assert_eq!(names, vec!["Seattle", "Austin", "Portland", "Portland"]);
        // exhausted until reset
        assert!(db.next_record().unwrap().is_none());
    }

    #[test]
    fn test_find_is_idempotent() {
        let mut db = db(DATA);
        let a = db.find("Austin", "TX").unwrap();
        let b = db.find("Austin", "TX").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_find_leaves_cursor_after_match() {
        let mut db = db(DATA);
        db.find("Austin", "TX").unwrap();
        let next = db.next_record().unwrap().unwrap();
        assert_eq!((next.name.as_str(), next.region.as_str()), ("Portland", "OR"));
    }

    #[test]
    fn test_find_matches_region_exactly() {
        let mut db = db(DATA);
        let me = db.find("Portland", "ME").unwrap();
        assert_eq!(me.y, 43.7);
        assert!(matches!(db.find("portland", "ME"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut db = db("h\nA,X,1,2\nA,X,3,4\n");
        let rec = db.find("A", "X").unwrap();
        assert_eq!((rec.y, rec.x), (1.0, 2.0));
    }

    #[test]
    fn test_find_missing_is_not_found() {
        let mut db = db(DATA);
        match db.find("Springfield", "ZZ") {
            Err(Error::NotFound { name, region }) => {
                assert_eq!(name, "Springfield");
                assert_eq!(region, "ZZ");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(db.next_record().unwrap().is_none());
    }

    #[test]
    fn test_short_line_is_malformed() {
        let mut db = db("h\nSeattle,WA,47.6\n");
        match db.next_record() {
            Err(Error::MalformedRecord { line, expected, found }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_coordinate_is_invalid_number() {
        let mut db = db("h\nSeattle,WA,,-122.3\n");
        assert!(matches!(
            db.next_record(),
            Err(Error::InvalidNumber { line: 2, column: 2, .. })
        ));
        // the lookup finds the row, then reports the number, not NotFound
        assert!(matches!(db.find("Seattle", "WA"), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_find_skips_unparsed_coordinates_of_other_rows() {
        let mut db = db("h\nNowhere,ZZ,n/a,n/a\nAustin,TX,30.3,-97.7\n");
        assert_eq!(db.find("Austin", "TX").unwrap().x, -97.7);
    }

    #[test]
    fn test_non_utf8_row_does_not_break_scan() {
        let mut bytes = b"city,state,lat,lng\n".to_vec();
        bytes.extend_from_slice(b"Ca\xf1on City,CO,38.4,-105.2\n");
        bytes.extend_from_slice(b"Austin,TX,30.3,-97.7\n");
        let mut db = CitiesDb::from_reader(Cursor::new(bytes), SIMPLE).unwrap();

        assert_eq!(db.find("Austin", "TX").unwrap().x, -97.7);

        db.reset().unwrap();
        let canon = db.next_record().unwrap().unwrap();
        assert_eq!(canon.name, "Ca\u{FFFD}on City");
        assert_eq!(canon.y, 38.4);
    }

    #[test]
    fn test_find_short_row_before_match_is_fatal() {
        let mut db = db("h\nSeattle,WA\nAustin,TX,30.3,-97.7\n");
        assert!(matches!(
            db.find("Austin", "TX"),
            Err(Error::MalformedRecord { line: 2, expected: 4, found: 2 })
        ));
    }

    #[test]
    fn test_crlf_lines() {
        let mut db = db("city,state,lat,lng\r\nSeattle,WA,47.6,-122.3\r\n");
        let rec = db.next_record().unwrap().unwrap();
        assert_eq!(rec.x, -122.3);
    }

    #[test]
    fn test_header_only_dataset() {
        let mut db = db("city,state,lat,lng\n");
        assert!(db.next_record().unwrap().is_none());
        assert!(matches!(db.find("Seattle", "WA"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_find_fields_returns_raw_row() {
        let mut db = db(DATA);
        let fields = db.find_fields("Seattle", "WA").unwrap();
        assert_eq!(fields, vec!["Seattle", "WA", "47.6", "-122.3"]);
    }

    #[test]
    fn test_uscities_layout() {
        let text = "\"city\",\"city_ascii\",\"state_id\",\"state_name\",\"county_fips\",\"county_name\",\"county_fips_all\",\"county_name_all\",\"lat\",\"lng\"\n\
                    \"El Paso\",\"El Paso\",\"TX\",\"Texas\",\"48141\",\"El Paso\",\"48141\",\"El Paso\",\"31.8479\",\"-106.4309\"\n";
        let mut db = CitiesDb::from_reader(Cursor::new(text.as_bytes().to_vec()), ColumnMap::USCITIES).unwrap();
        let rec = db.find("El Paso", "TX").unwrap();
        assert_eq!(rec.y, 31.8479);
        assert_eq!(rec.x, -106.4309);
    }

    #[test]
    fn test_open_missing_file() {
        let err = CitiesDb::open("/definitely/not/here.csv", ColumnMap::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_column_map() {
        assert_eq!(ColumnMap::USCITIES.required_fields(), 10);
        assert!(ColumnMap::USCITIES.is_distinct());
        assert!(!ColumnMap { name: 0, region: 0, x: 1, y: 2 }.is_distinct());
    }
}
