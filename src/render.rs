//! Table rendering for flattened meal plans.
//!
//! Column order follows the display convention of the clients:
//! Day / Meal / Name / Calories / Ingredients.

use crate::plan::MealRow;

const HEADERS: [&str; 5] = ["Day", "Meal", "Name", "Calories", "Ingredients"];

fn cells(row: &MealRow) -> [String; 5] {
    [
        row.day.clone(),
        row.slot.clone(),
        row.name.clone(),
        row.calories.to_string(),
        row.ingredients.clone(),
    ]
}

/// Renders the rows as a fixed-width text table for terminal output.
pub fn text_table(rows: &[MealRow]) -> String {
    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    let all_cells: Vec<[String; 5]> = rows.iter().map(cells).collect();
    for row in &all_cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let line = |cells: &[&str]| -> String {
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{cell:<width$}", width = widths[i]));
        }
        out.trim_end().to_string()
    };

    let mut out = line(&HEADERS);
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    for row in &all_cells {
        out.push('\n');
        let refs: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&refs));
    }
    out
}

/// Escapes text for safe interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the rows as an HTML table.
pub fn html_table(rows: &[MealRow]) -> String {
    let mut out = String::from("<table class=\"plan\">\n<thead><tr>");
    for header in HEADERS {
        out.push_str(&format!("<th>{header}</th>"));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in cells(row) {
            out.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}
