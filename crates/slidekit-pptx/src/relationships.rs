//! Relationship parts (`_rels/*.rels`).
//!
//! Slide relationship ids are not sequential: each slide prefers the media
//! pool index plus a per-kind offset (see [`crate::constants`]) and bumps to
//! the next free id when that one is taken. The builder therefore takes
//! explicit ids and only guarantees ordering and uniqueness.
//!
//! # Example
//!
//! ```
//! use slidekit_pptx::constants::{REL_TYPE_IMAGE, REL_TYPE_SLIDE_LAYOUT};
//! use slidekit_pptx::Relationships;
//!
//! let mut rels = Relationships::new();
//! rels.add("rId1", REL_TYPE_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
//! rels.add("rId101", REL_TYPE_IMAGE, "../media/image1.png");
//! assert!(rels.to_xml().contains(r#"Id="rId101""#));
//! ```

use crate::constants::NS_PACKAGE_RELATIONSHIPS;
use crate::xml::escape_xml;

/// A single relationship entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (e.g. `rId101`)
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the owning part
    pub target: String,
}

/// Ordered relationships of one part
///
/// Maintains insertion order for deterministic XML serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationships list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relationship.
    ///
    /// Returns `false` and keeps the first entry when `id` is already present.
    pub fn add(
        &mut self,
        id: impl Into<String>,
        rel_type: impl Into<String>,
        target: impl Into<String>,
    ) -> bool {
        let id = id.into();
        if self.contains(&id) {
            log::debug!("Ignoring duplicate relationship id {}", id);
            return false;
        }
        self.entries.push(Relationship {
            id,
            rel_type: rel_type.into(),
            target: target.into(),
        });
        true
    }

    /// Check if a relationship id exists
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    /// Get the entry for a relationship id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<Relationships xmlns="{}">"#,
            NS_PACKAGE_RELATIONSHIPS
        ));
        xml.push('\n');

        for rel in &self.entries {
            xml.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{REL_TYPE_CHART, REL_TYPE_IMAGE, REL_TYPE_SLIDE_LAYOUT};

    #[test]
    fn test_insertion_order() {
        let mut rels = Relationships::new();
        rels.add("rId1", REL_TYPE_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        rels.add("rId201", REL_TYPE_CHART, "../charts/chart1.xml");
        rels.add("rId101", REL_TYPE_IMAGE, "../media/image1.png");

        let ids: Vec<&str> = rels.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId201", "rId101"]);

        let xml = rels.to_xml();
        let layout = xml.find("rId1\"").unwrap();
        let chart = xml.find("rId201").unwrap();
        let image = xml.find("rId101").unwrap();
        assert!(layout < chart && chart < image);
    }

    #[test]
    fn test_duplicate_ids_ignored() {
        let mut rels = Relationships::new();
        assert!(rels.add("rId101", REL_TYPE_IMAGE, "../media/image1.png"));
        assert!(!rels.add("rId101", REL_TYPE_IMAGE, "../media/image9.png"));
        assert_eq!(rels.len(), 1);
        assert_eq!(rels.get("rId101").unwrap().target, "../media/image1.png");
    }

    #[test]
    fn test_to_xml() {
        let mut rels = Relationships::new();
        assert!(rels.is_empty());
        rels.add("rId1", REL_TYPE_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");

        let xml = rels.to_xml();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(NS_PACKAGE_RELATIONSHIPS));
        assert!(xml.contains(&format!(
            r#"<Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>"#,
            REL_TYPE_SLIDE_LAYOUT
        )));
        assert!(xml.ends_with("</Relationships>"));
    }
}
