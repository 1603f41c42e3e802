use serde::Deserialize;

use crate::config::CategoryDefinition;
use crate::matcher;

/// Remote index document: `{ "data": [ { "k": ..., "v": ... }, ... ] }`.
///
/// The order of `data` is meaningful; it decides which entry counts as the
/// first match.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDocument {
    pub data: Vec<IndexRow>,
}

/// One `{k, v}` pair from the wire document.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexRow {
    pub k: String,
    pub v: String,
}

/// One selectable item within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Opaque identifier from the source data.
    pub key: String,
    /// User-facing display text.
    pub label: String,
    /// Relative link to the entry's static detail page. Computed here, never
    /// dereferenced here.
    pub href: String,
}

impl IndexEntry {
    pub fn from_row(definition: &CategoryDefinition, row: IndexRow) -> Self {
        let href = format!(
            "data/{}/{}{}.html",
            definition.name, definition.display_prefix, row.k
        );
        Self {
            key: row.k,
            label: row.v,
            href,
        }
    }
}

/// A loaded entry with its label tokens precomputed once at load time.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: IndexEntry,
    pub tokens: Vec<String>,
}

impl IndexedEntry {
    pub fn new(definition: &CategoryDefinition, row: IndexRow) -> Self {
        let entry = IndexEntry::from_row(definition, row);
        let tokens = matcher::tokenize(&entry.label);
        Self { entry, tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(k: &str, v: &str) -> IndexRow {
        IndexRow {
            k: k.into(),
            v: v.into(),
        }
    }

    #[test]
    fn href_is_derived_from_category_and_key() {
        let def = CategoryDefinition::new("competitors", "c-");
        let entry = IndexEntry::from_row(&def, row("07", "John Smith"));
        assert_eq!(entry.key, "07");
        assert_eq!(entry.label, "John Smith");
        assert_eq!(entry.href, "data/competitors/c-07.html");
    }

    #[test]
    fn indexed_entry_tokens_equal_tokenized_label() {
        let def = CategoryDefinition::new("events", "e-");
        for label in ["John Smith", "100m Freestyle, Heat 2", "  O'Brien  "] {
            let indexed = IndexedEntry::new(&def, row("1", label));
            assert_eq!(indexed.tokens, matcher::tokenize(label));
        }
    }

    #[test]
    fn document_parses_wire_shape() {
        let doc: IndexDocument =
            serde_json::from_str(r#"{"data":[{"k":"07","v":"John Smith"}]}"#).unwrap();
        assert_eq!(doc.data.len(), 1);
        assert_eq!(doc.data[0].k, "07");
        assert_eq!(doc.data[0].v, "John Smith");
    }

    #[test]
    fn document_without_data_field_is_rejected() {
        assert!(serde_json::from_str::<IndexDocument>(r#"{"items":[]}"#).is_err());
    }
}
