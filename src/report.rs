use crate::errors::AdsError;

/// Downloaded report as a table of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    /// Parses a CSV body whose first line holds the column names.
    pub fn from_csv(body: &str) -> Result<Self, AdsError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body.as_bytes());

        let columns = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<String>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        tracing::debug!("Parsed report with {} columns and {} rows", columns.len(), rows.len());
        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of the named column.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let position = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(position).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let report = Report::from_csv("Keyword,Clicks\nshoes,12\n\"red, shoes\",3\n").unwrap();

        assert_eq!(report.columns, vec!["Keyword", "Clicks"]);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[1][0], "red, shoes");
        assert_eq!(report.column("Clicks"), Some(vec!["12", "3"]));
        assert_eq!(report.column("Cost"), None);
    }

    #[test]
    fn test_empty_body() {
        let report = Report::from_csv("").unwrap();
        assert!(report.is_empty());
        assert!(report.columns.is_empty());
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        assert!(matches!(
            Report::from_csv("A,B\n1,2,3\n"),
            Err(AdsError::Parse(_))
        ));
    }
}
