/// Column alignment inside a rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A plain-text table rendered inside a Discord code block
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a table whose columns are all left-aligned
    pub fn new(headers: Vec<&str>) -> Self {
        let aligns = vec![Align::Left; headers.len()];
        Self::with_alignment(headers, aligns)
    }

    /// Create a table with per-column alignment; missing entries default to left
    pub fn with_alignment(headers: Vec<&str>, mut aligns: Vec<Align>) -> Self {
        aligns.resize(headers.len(), Align::Left);
        let col_widths = headers.iter().map(|h| h.chars().count()).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            aligns,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row; cells beyond the header count are dropped
    pub fn add_row(&mut self, row: Vec<&str>) {
        let row: Vec<String> = row
            .iter()
            .take(self.headers.len())
            .map(|s| s.to_string())
            .collect();

        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(row);
    }

    /// Render header, separator and rows wrapped in ``` fences
    pub fn render(&self) -> String {
        let mut output = String::from("```\n");
        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output.push_str("```");
        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(self.col_widths.iter().zip(&self.aligns))
            .map(|(cell, (&width, align))| {
                let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
                match align {
                    Align::Left => format!("{}{}", cell, pad),
                    Align::Right => format!("{}{}", pad, cell),
                }
            })
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}
