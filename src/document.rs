//! Deserialization of the `mysqldump`-shaped XML status document.
//!
//! ```xml
//! <mysqldump>
//!   <database name="sansay">
//!     <table name="system_stat">
//!       <row>
//!         <field name="cpu">3.5</field>
//!       </row>
//!     </table>
//!   </database>
//! </mysqldump>
//! ```
//!
//! Only this nesting is understood. Other elements and attributes are
//! skipped, and absent names or values come back as empty strings.

use crate::error::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::collections::HashSet;

const ROOT_ELEMENT: &str = "mysqldump";

/// Root of a parsed status document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub database: Database,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Database {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "table", default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Table {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "row", default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Row {
    #[serde(rename = "field", default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Field {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl Row {
    /// Fields in document order, skipping any whose name already appeared
    /// earlier in the row.
    pub fn unique_fields(&self) -> impl Iterator<Item = &Field> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .filter(move |field| seen.insert(field.name.as_str()))
    }
}

/// Parse a raw response body.
///
/// The root element must be `<mysqldump>`; an error page served in its place
/// is rejected rather than read as an empty document.
pub fn parse(body: &[u8]) -> Result<Document, ParseError> {
    check_root(body)?;
    Ok(quick_xml::de::from_reader(body)?)
}

fn check_root(body: &[u8]) -> Result<(), ParseError> {
    let mut reader = Reader::from_reader(body);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return if e.name().as_ref() == ROOT_ELEMENT.as_bytes() {
                    Ok(())
                } else {
                    Err(ParseError::UnexpectedRoot(
                        String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ))
                };
            }
            Event::Eof => return Err(ParseError::MissingRoot),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"<?xml version="1.0"?>
<mysqldump xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <database name="sansay">
    <table name="system_stat">
      <row>
        <field name="cpu">3.5</field>
        <field name="ha_current_state">active</field>
      </row>
    </table>
    <table name="XBResourceRealTimeStatList">
      <row>
        <field name="trunkId">T1</field>
        <field name="fqdn">Group</field>
      </row>
      <row>
        <field name="trunkId">T1</field>
        <field name="fqdn">10.1.1.1</field>
      </row>
    </table>
  </database>
</mysqldump>"#;

    #[test]
    fn test_parse_nested_structure() {
        let doc = parse(DUMP.as_bytes()).unwrap();
        assert_eq!(doc.database.name, "sansay");
        assert_eq!(doc.database.tables.len(), 2);

        let system = &doc.database.tables[0];
        assert_eq!(system.name, "system_stat");
        assert_eq!(system.rows.len(), 1);
        assert_eq!(
            system.rows[0].fields[0],
            Field {
                name: "cpu".to_string(),
                value: "3.5".to_string()
            }
        );

        let trunks = &doc.database.tables[1];
        assert_eq!(trunks.rows.len(), 2);
        assert_eq!(trunks.rows[1].fields[1].value, "10.1.1.1");
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let xml = r#"<mysqldump>
  <database name="db">
    <table_structure name="system_stat"><key name="x"/></table_structure>
    <table name="a"><row><field name="x">1</field><comment>hi</comment></row></table>
    <options/>
    <table name="b"/>
  </database>
</mysqldump>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        let names: Vec<_> = doc.database.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.database.tables[0].rows[0].fields.len(), 1);
        assert!(doc.database.tables[1].rows.is_empty());
    }

    #[test]
    fn test_missing_attributes_and_text_default_to_empty() {
        let xml = r#"<mysqldump><database><table><row><field/><field name="y"></field></row></table></database></mysqldump>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.database.name, "");
        let table = &doc.database.tables[0];
        assert_eq!(table.name, "");
        assert_eq!(table.rows[0].fields[0], Field::default());
        assert_eq!(table.rows[0].fields[1].name, "y");
        assert_eq!(table.rows[0].fields[1].value, "");
    }

    #[test]
    fn test_empty_root() {
        let doc = parse(b"<mysqldump/>").unwrap();
        assert!(doc.database.tables.is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<mysqldump><database><table name="a"></database></mysqldump>"#;
        assert!(parse(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_html_error_page_is_rejected() {
        let html = b"<html><body><h1>401 Unauthorized</h1></body></html>";
        assert!(matches!(
            parse(html),
            Err(ParseError::UnexpectedRoot(root)) if root == "html"
        ));
    }

    #[test]
    fn test_other_xml_root_is_rejected() {
        let xml = r#"<?xml version="1.0"?>
<!-- status -->
<dump><database><table name="system_stat"/></database></dump>"#;
        assert!(matches!(
            parse(xml.as_bytes()),
            Err(ParseError::UnexpectedRoot(root)) if root == "dump"
        ));
    }

    #[test]
    fn test_body_without_elements_is_rejected() {
        assert!(matches!(parse(b""), Err(ParseError::MissingRoot)));
        assert!(matches!(
            parse(b"<?xml version=\"1.0\"?>\n"),
            Err(ParseError::MissingRoot)
        ));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(
            parse(DUMP.as_bytes()).unwrap(),
            parse(DUMP.as_bytes()).unwrap()
        );
    }

    #[test]
    fn test_unique_fields_keeps_first_occurrence() {
        let row = Row {
            fields: vec![
                Field {
                    name: "a".into(),
                    value: "1".into(),
                },
                Field {
                    name: "b".into(),
                    value: "2".into(),
                },
                Field {
                    name: "a".into(),
                    value: "3".into(),
                },
            ],
        };
        let values: Vec<_> = row.unique_fields().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2"]);
    }
}
