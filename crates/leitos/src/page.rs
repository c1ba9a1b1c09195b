use scraper::{ElementRef, Html, Selector};

use crate::parser::ParseError;

/// A fetched copy of the dashboard page.
pub struct DashboardPage {
    document: Html,
}

/// Renders an element the way a browser reports its text: one line per
/// non-empty text node, each line terminated by `\n`.
fn element_lines(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("{t}\n"))
        .collect()
}

impl DashboardPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Text of the first `div > p` mentioning `marker`.
    pub fn date_text(&self, marker: &str) -> Result<String, ParseError> {
        let selector = Selector::parse("div > p").unwrap();

        self.document
            .select(&selector)
            .map(element_lines)
            .find(|text| text.contains(marker))
            .ok_or_else(|| ParseError::MissingRegion(format!("paragraph containing {marker:?}")))
    }

    /// Text of the `index`-th (1-based) `table.PageTable`.
    pub fn table_text(&self, index: usize) -> Result<String, ParseError> {
        let selector = Selector::parse("table.PageTable").unwrap();

        let text = index
            .checked_sub(1)
            .and_then(|i| self.document.select(&selector).nth(i))
            .map(element_lines)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ParseError::MissingRegion(format!(
                "table.PageTable #{index}"
            )));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> DashboardPage {
        let html = fs::read_to_string("fixtures/dashboard.html").expect("Failed to read fixture");
        DashboardPage::parse(&html)
    }

    #[test]
    fn test_date_text_from_fixture() {
        let text = fixture()
            .date_text("ÚLTIMA ATUALIZAÇÃO")
            .expect("Should find the date label");
        assert!(text.contains("05/03/2021"), "got {text:?}");
    }

    #[test]
    fn test_date_text_missing_marker() {
        let err = fixture()
            .date_text("PRÓXIMA ATUALIZAÇÃO")
            .expect_err("Should not find marker");
        assert!(matches!(err, ParseError::MissingRegion(_)));
    }

    #[test]
    fn test_table_text_renders_one_line_per_cell() {
        let text = fixture().table_text(7).expect("Should find the seventh table");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Enfermaria Adulto");
        assert_eq!(lines[1], "Leitos Existentes");
        assert_eq!(lines[2], "2.418");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_table_text_out_of_range() {
        let page = fixture();
        assert!(matches!(
            page.table_text(8),
            Err(ParseError::MissingRegion(_))
        ));
        assert!(matches!(
            page.table_text(0),
            Err(ParseError::MissingRegion(_))
        ));
    }

    #[test]
    fn test_table_text_empty_table() {
        let page = DashboardPage::parse(r#"<table class="PageTable"><tr><td> </td></tr></table>"#);
        assert!(matches!(
            page.table_text(1),
            Err(ParseError::MissingRegion(_))
        ));
    }
}
