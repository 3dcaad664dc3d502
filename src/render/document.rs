use super::ViewKind;

/// A table of preformatted cells. Rows keep the order they were pushed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Stat { label: String, value: String },
    Table(Table),
    Preformatted(String),
    Placeholder(String),
}

/// Output of one renderer for one snapshot, independent of where it is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub kind: ViewKind,
    pub blocks: Vec<Block>,
}

impl RenderedView {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
        }
    }

    pub fn heading(mut self, level: u8, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Heading {
            level,
            text: text.into(),
        });
        self
    }

    pub fn stat(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.blocks.push(Block::Stat {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.blocks.push(Block::Table(table));
        self
    }

    pub fn preformatted(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Preformatted(text.into()));
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Placeholder(text.into()));
        self
    }

    /// All tables in block order.
    pub fn tables(&self) -> Vec<&Table> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}
