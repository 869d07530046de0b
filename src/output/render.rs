//! Text rendering of fetch results

use crate::error::Result;
use crate::flatten::Page;

/// One JSON object per line for tables; the raw value on one line otherwise
pub fn render_json_lines(page: &Page) -> Result<String> {
    match page {
        Page::Table(table) => {
            let mut out = String::new();
            for row in table.to_json() {
                out.push_str(&serde_json::to_string(&row)?);
                out.push('\n');
            }
            Ok(out)
        }
        Page::Raw(value) => Ok(format!("{}\n", serde_json::to_string(value)?)),
    }
}

/// Indented JSON of the whole result
pub fn render_pretty(page: &Page) -> Result<String> {
    Ok(serde_json::to_string_pretty(&page.to_json())?)
}
