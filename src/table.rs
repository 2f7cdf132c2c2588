use crate::error::LineError;
use crate::Error;

/// Rows of one text file of the feed, as strings
///
/// The header defines the columns and every row holds exactly one value per
/// column: missing trailing values are empty strings. Rows keep the order of
/// the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed view over one row of a [ParsedTable] (or over a row being parsed)
#[derive(Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Value of a column, `""` if the column is unknown or the value is absent
    pub fn get(&self, column: &str) -> &'a str {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .map_or("", String::as_str)
    }

    pub fn headers(&self) -> &'a [String] {
        self.headers
    }
}

impl std::fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_map()
            .entries(self.headers.iter().map(|h| (h, self.get(h))))
            .finish()
    }
}

impl ParsedTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            headers: &self.headers,
            values,
        })
    }
}

/// Parses a whole text file of the feed
pub fn parse_table(file_name: &str, content: &[u8]) -> Result<ParsedTable, Error> {
    parse_table_filtered(file_name, content, |_| true)
}

/// Parses a text file of the feed, keeping only the rows matching `predicate`
///
/// The predicate sees each row as soon as it is read and rejected rows are
/// dropped immediately, so memory grows with the matching rows only. This is
/// what makes `stop_times.txt` queries affordable on large feeds.
pub fn parse_table_filtered<P>(
    file_name: &str,
    content: &[u8],
    mut predicate: P,
) -> Result<ParsedTable, Error>
where
    P: FnMut(&Row) -> bool,
{
    let content = content.strip_prefix(b"\xef\xbb\xbf").unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);
    let csv_error = |e: csv::Error| Error::CSVError {
        file_name: file_name.to_owned(),
        source: e,
        line_in_error: None,
    };
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(csv_error)? {
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let mut values: Vec<String> = record.deserialize(None).map_err(|e| Error::CSVError {
            file_name: file_name.to_owned(),
            source: e,
            line_in_error: Some(LineError {
                headers: headers.clone(),
                values: record
                    .iter()
                    .map(|v| String::from_utf8_lossy(v).into_owned())
                    .collect(),
            }),
        })?;
        values.resize(headers.len(), String::new());
        let keep = predicate(&Row {
            headers: &headers,
            values: &values,
        });
        if keep {
            rows.push(values);
        }
    }

    Ok(ParsedTable { headers, rows })
}
