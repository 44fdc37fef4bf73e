//! Item catalog parsing
//!
//! Reads an `items.xml` style document:
//!
//! ```xml
//! <items>
//!   <item id="123">
//!     <attribute key="primarytype" value="rocks"/>
//!   </item>
//! </items>
//! ```
//!
//! Only direct `item` children of the root and their direct `attribute`
//! children are read. Everything else is skipped, but the whole document
//! must still be well-formed.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::category::PRIMARY_TYPE_KEY;
use crate::error::{Result, TilesetError};

const ITEM_TAG: &[u8] = b"item";
const ATTRIBUTE_TAG: &[u8] = b"attribute";

/// A single `item` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: i64,
    attributes: HashMap<String, Option<String>>,
}

impl ItemRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute. If the key is already set, the earlier value wins.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_attribute(key.into(), Some(value.into()));
        self
    }

    fn insert_attribute(&mut self, key: String, value: Option<String>) {
        self.attributes.entry(key).or_insert(value);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_deref())
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.attribute(PRIMARY_TYPE_KEY)
    }
}

/// Parse an item catalog file
pub fn parse_catalog_file(path: &Path) -> Result<Vec<ItemRecord>> {
    let bytes = fs::read(path).map_err(|e| TilesetError::parse(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    parse_catalog_str(&content, path)
}

/// Parse an item catalog from memory. `origin` is only used in error messages.
pub fn parse_catalog_str(xml: &str, origin: &Path) -> Result<Vec<ItemRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<ItemRecord> = None;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            TilesetError::parse(
                origin,
                format!("{} (at byte {})", e, reader.error_position()),
            )
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));

                match depth {
                    0 => {
                        if seen_root {
                            return Err(TilesetError::parse(
                                origin,
                                "multiple root elements",
                            ));
                        }
                        seen_root = true;
                    }
                    1 if e.name().as_ref() == ITEM_TAG => {
                        let record = ItemRecord::new(read_item_id(e, origin)?);
                        if is_empty {
                            records.push(record);
                        } else {
                            current = Some(record);
                        }
                    }
                    2 if e.name().as_ref() == ATTRIBUTE_TAG => {
                        if let Some(record) = current.as_mut() {
                            if let Some((key, value)) = read_key_value(e, origin)? {
                                record.insert_attribute(key, value);
                            }
                        }
                    }
                    _ => {}
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(TilesetError::parse(origin, "unmatched closing tag"));
                }
                depth -= 1;
                if depth == 1 {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
            }
            Event::Text(ref t) => {
                let text = t.unescape().map_err(|e| {
                    TilesetError::parse(
                        origin,
                        format!("{} (at byte {})", e, reader.buffer_position()),
                    )
                })?;
                if depth == 0
                    && !text
                        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
                        .is_empty()
                {
                    return Err(TilesetError::parse(
                        origin,
                        "text content outside the root element",
                    ));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(TilesetError::parse(
                    origin,
                    "CDATA section outside the root element",
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(TilesetError::parse(
            origin,
            "unexpected end of document (unclosed element)",
        ));
    }
    if !seen_root {
        return Err(TilesetError::parse(origin, "no root element"));
    }

    Ok(records)
}

fn read_item_id(element: &BytesStart<'_>, origin: &Path) -> Result<i64> {
    let raw = read_attribute(element, b"id", origin)?
        .ok_or_else(|| TilesetError::parse(origin, "item element without an id attribute"))?;

    raw.trim().parse::<i64>().map_err(|_| {
        TilesetError::parse(origin, format!("item id '{}' is not an integer", raw))
    })
}

/// `key` is required; a missing `value` is kept as `None` so the key still
/// counts as seen.
fn read_key_value(
    element: &BytesStart<'_>,
    origin: &Path,
) -> Result<Option<(String, Option<String>)>> {
    let Some(key) = read_attribute(element, b"key", origin)? else {
        return Ok(None);
    };
    let value = read_attribute(element, b"value", origin)?;
    Ok(Some((key, value)))
}

fn read_attribute(element: &BytesStart<'_>, name: &[u8], origin: &Path) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| TilesetError::parse(origin, e))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| TilesetError::parse(origin, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
