//! Global tag catalog and the startup palette.

use serde::{Deserialize, Serialize};

use crate::error::InvalidReason;
use crate::models::color::Color;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
    pub color: Color,
}

/// Conditions for a tag catalog read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    All,
    Ids(Vec<EntityId>),
    Name(String),
}

impl TagFilter {
    pub fn matches(&self, tag: &Tag) -> bool {
        match self {
            Self::All => true,
            Self::Ids(ids) => ids.contains(&tag.id),
            Self::Name(name) => &tag.name == name,
        }
    }
}

/// One palette entry to seed into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagSeed {
    pub name: String,
    pub color: Color,
}

/// The set of tags every deployment starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPalette(pub Vec<TagSeed>);

impl Default for TagPalette {
    fn default() -> Self {
        Self(
            [
                ("p1", Color::Red),
                ("p2", Color::Yellow),
                ("p3", Color::Green),
                ("p4", Color::Blue),
            ]
            .into_iter()
            .map(|(name, color)| TagSeed {
                name: name.to_string(),
                color,
            })
            .collect(),
        )
    }
}

impl TagPalette {
    /// Parse `"name:color,name:color"`. Blank entries are skipped.
    pub fn parse(raw: &str) -> Result<Self, InvalidReason> {
        let mut seeds = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, color) = entry
                .split_once(':')
                .ok_or(InvalidReason::MissingField("color"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(InvalidReason::MissingField("name"));
            }
            seeds.push(TagSeed {
                name: name.to_string(),
                color: color.trim().parse()?,
            });
        }
        Ok(Self(seeds))
    }

    pub fn seeds(&self) -> &[TagSeed] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_is_four_priorities() {
        let names: Vec<_> = TagPalette::default()
            .seeds()
            .iter()
            .map(|s| (s.name.clone(), s.color))
            .collect();
        assert_eq!(
            names,
            vec![
                ("p1".to_string(), Color::Red),
                ("p2".to_string(), Color::Yellow),
                ("p3".to_string(), Color::Green),
                ("p4".to_string(), Color::Blue),
            ]
        );
    }

    #[test]
    fn parses_custom_palette() {
        let palette = TagPalette::parse("urgent:red, later : blue,").unwrap();
        assert_eq!(palette.seeds().len(), 2);
        assert_eq!(palette.seeds()[1].name, "later");
        assert_eq!(palette.seeds()[1].color, Color::Blue);
    }

    #[test]
    fn rejects_malformed_entries() {
        assert_eq!(
            TagPalette::parse("urgent"),
            Err(InvalidReason::MissingField("color"))
        );
        assert_eq!(
            TagPalette::parse("urgent:pink"),
            Err(InvalidReason::InvalidColor("pink".into()))
        );
    }
}
