use serde::Serialize;

/// Share of ensemble members exceeding each return-period threshold on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceedanceRow {
    /// `%b %d` label of the day.
    pub day: String,
    pub percent_2yr: u8,
    pub percent_10yr: u8,
    pub percent_20yr: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExceedanceTable {
    pub rows: Vec<ExceedanceRow>,
}

impl ExceedanceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table as an HTML `<table>` with one column per day.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"geoglows-probabilities\">\n  <tr>\n    <th>Return Period</th>\n");
        for row in &self.rows {
            html.push_str(&format!("    <th>{}</th>\n", row.day));
        }
        html.push_str("  </tr>\n");

        let levels: [(&str, fn(&ExceedanceRow) -> u8); 3] = [
            ("2 Year", |r| r.percent_2yr),
            ("10 Year", |r| r.percent_10yr),
            ("20 Year", |r| r.percent_20yr),
        ];
        for (label, percent) in levels {
            html.push_str(&format!("  <tr>\n    <td>{label}</td>\n"));
            for row in &self.rows {
                html.push_str(&format!("    <td>{}%</td>\n", percent(row)));
            }
            html.push_str("  </tr>\n");
        }
        html.push_str("</table>\n");
        html
    }
}
