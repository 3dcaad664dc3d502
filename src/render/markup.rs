use askama::Template;

use super::{Block, RenderedView, Table};

const CELL_SEPARATOR: &str = " | ";

#[derive(Template)]
#[template(source = "<h{{ level }}>{{ text }}</h{{ level }}>", ext = "html")]
struct HeadingTemplate<'a> {
    level: u8,
    text: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<div class="stat"><span class="label">{{ label }}</span> <span class="value">{{ value }}</span></div>"#,
    ext = "html"
)]
struct StatTemplate<'a> {
    label: &'a str,
    value: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<table><thead><tr>{% for header in table.headers %}<th>{{ header }}</th>{% endfor %}</tr></thead><tbody>{% for row in table.rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>{% endfor %}</tbody></table>"#,
    ext = "html"
)]
struct TableTemplate<'a> {
    table: &'a Table,
}

#[derive(Template)]
#[template(source = "<pre>{{ text }}</pre>", ext = "html")]
struct PreTemplate<'a> {
    text: &'a str,
}

#[derive(Template)]
#[template(source = r#"<div class="placeholder">{{ text }}</div>"#, ext = "html")]
struct PlaceholderTemplate<'a> {
    text: &'a str,
}

/// HTML fragment for a rendered view. Cell text is escaped.
pub fn to_html(view: &RenderedView) -> Result<String, askama::Error> {
    let mut html = String::new();
    for block in &view.blocks {
        let fragment = match block {
            Block::Heading { level, text } => HeadingTemplate { level: *level, text }.render()?,
            Block::Stat { label, value } => StatTemplate { label, value }.render()?,
            Block::Table(table) => TableTemplate { table }.render()?,
            Block::Preformatted(text) => PreTemplate { text }.render()?,
            Block::Placeholder(text) => PlaceholderTemplate { text }.render()?,
        };
        html.push_str(&fragment);
        html.push('\n');
    }
    Ok(html)
}

/// Plain text rendering for terminals, one table row per line.
pub fn to_text(view: &RenderedView) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in &view.blocks {
        match block {
            Block::Heading { text, .. } => lines.push(text.clone()),
            Block::Stat { label, value } => lines.push(format!("{}: {}", label, value)),
            Block::Table(table) => {
                lines.push(table.headers.join(CELL_SEPARATOR));
                lines.extend(table.rows.iter().map(|row| row.join(CELL_SEPARATOR)));
            }
            Block::Preformatted(text) => {
                if !text.is_empty() {
                    lines.push(text.clone());
                }
            }
            Block::Placeholder(text) => lines.push(text.clone()),
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PositionsView, ThreadStatusView, View, ViewKind};
    use crate::snapshot::Snapshot;
    use serde_json::json;

    fn sample() -> Snapshot {
        Snapshot::from(json!({
            "prices": {"BTCUSDT": 65000},
            "positions": {"BTCUSDT": {"side": "long", "size": 0.01}},
            "pnl": {"BTCUSDT": 12.5},
            "total_pnl": 12.5
        }))
    }

    #[test]
    fn test_positions_text_row() {
        let rendered = PositionsView::basic().render(&sample().view());
        let text = to_text(&rendered);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Symbol | Side | Size | Entry | Last | PNL");
        assert_eq!(lines[1], "BTCUSDT | long | 0.01 |  | 65000 | 12.5000");
    }

    #[test]
    fn test_positions_html_row() {
        let rendered = PositionsView::basic().render(&sample().view());
        let html = to_html(&rendered).unwrap();

        assert!(html.contains(
            "<tr><td>BTCUSDT</td><td>long</td><td>0.01</td><td></td><td>65000</td><td>12.5000</td></tr>"
        ));
        assert!(html.contains("<th>Symbol</th>"));
    }

    #[test]
    fn test_html_escapes_cells() {
        let snapshot = Snapshot::from(json!({"prices": {"<b>X</b>": 1}}));
        let rendered = crate::render::SummaryView.render(&snapshot.view());
        let html = to_html(&rendered).unwrap();

        assert!(!html.contains("<b>X</b>"));
        assert!(html.contains("&lt;b&gt;X"));
    }

    #[test]
    fn test_placeholder_text() {
        let rendered = ThreadStatusView.render(&Snapshot::default().view());
        assert_eq!(to_text(&rendered), "No threads");
        assert_eq!(
            to_html(&rendered).unwrap().trim(),
            r#"<div class="placeholder">No threads</div>"#
        );
    }

    #[test]
    fn test_heading_html() {
        let rendered = RenderedView::new(ViewKind::Overview).heading(2, "PNL Total: 12.5000 USDT");
        assert_eq!(to_html(&rendered).unwrap().trim(), "<h2>PNL Total: 12.5000 USDT</h2>");
    }
}
