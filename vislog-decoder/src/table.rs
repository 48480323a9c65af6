//! Header-keyed table extracted from the charge-log CSV
//!
//! The firmware writes plain comma-separated values with no quoting or
//! escaping, so a hand parser is sufficient. Each column's storage type
//! (numeric or text) is inferred once at parse time; downstream code keys
//! off the storage type, never off individual cell contents.

/// Storage for one CSV column
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Column {
    /// Every cell parsed as a number
    Numeric(Vec<f64>),
    /// At least one cell failed numeric parsing; cells kept verbatim
    Text(Vec<String>),
}

/// Parsed CSV table, columns parallel to the header row
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CsvTable {
    headers: Vec<String>,
    columns: Vec<Column>,
}

impl CsvTable {
    /// Parse CSV text into a table
    ///
    /// Returns `None` if the text has no header row. Short rows are padded
    /// with empty cells; extra cells beyond the header are dropped.
    pub(crate) fn parse(text: &str) -> Option<CsvTable> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let headers: Vec<String> = lines
            .next()?
            .split(',')
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return None;
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for line in lines {
            let mut fields = line.split(',');
            for column in cells.iter_mut() {
                let field = fields.next().unwrap_or("").trim();
                column.push(field.to_string());
            }
        }

        let columns = cells.into_iter().map(infer_column).collect();
        Some(CsvTable { headers, columns })
    }

    /// Column names in CSV order
    pub(crate) fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Column by name (case-sensitive)
    pub(crate) fn column(&self, name: &str) -> Option<&Column> {
        let index = self.headers.iter().position(|h| h == name)?;
        self.columns.get(index)
    }

    /// Numeric values of a column, or `None` if absent or stored as text
    pub(crate) fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        match self.column(name)? {
            Column::Numeric(values) => Some(values),
            Column::Text(_) => None,
        }
    }

    /// True if the column exists and its storage type is numeric
    pub(crate) fn is_numeric(&self, name: &str) -> bool {
        matches!(self.column(name), Some(Column::Numeric(_)))
    }
}

/// Infer a column's storage type from its cells
fn infer_column(cells: Vec<String>) -> Column {
    let numeric: Option<Vec<f64>> = cells.iter().map(|c| c.parse::<f64>().ok()).collect();
    match numeric {
        Some(values) => Column::Numeric(values),
        None => Column::Text(cells),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_table() {
        let table = CsvTable::parse("millis,power\n0,100\n1000,0\n").unwrap();
        assert_eq!(table.headers(), &["millis", "power"]);
        assert_eq!(table.numeric_column("millis"), Some(&[0.0, 1000.0][..]));
        assert_eq!(table.numeric_column("power"), Some(&[100.0, 0.0][..]));
    }

    #[test]
    fn test_text_column_storage_type() {
        let table = CsvTable::parse("millis,state\n0,charging\n1000,idle\n").unwrap();
        assert!(table.is_numeric("millis"));
        assert!(!table.is_numeric("state"));
        assert_eq!(table.numeric_column("state"), None);
        assert_eq!(
            table.column("state"),
            Some(&Column::Text(vec![
                "charging".to_string(),
                "idle".to_string()
            ]))
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = CsvTable::parse("a,b\n1\n2,3\n").unwrap();
        // Missing cell becomes "" which fails numeric parsing
        assert!(!table.is_numeric("b"));
        assert_eq!(table.numeric_column("a"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_empty_text_has_no_table() {
        assert_eq!(CsvTable::parse(""), None);
        assert_eq!(CsvTable::parse("\n \n"), None);
    }

    #[test]
    fn test_column_lookup_is_case_sensitive() {
        let table = CsvTable::parse("Power\n1\n").unwrap();
        assert!(table.column("power").is_none());
        assert!(table.column("Power").is_some());
    }
}
