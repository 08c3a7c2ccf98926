use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::models::{Color, Tag, TagFilter, TagPalette};
use crate::store::{finish, Store, TagCatalog};
use crate::types::IdGenerator;

/// Everything a client needs to render tag and color pickers.
#[derive(Debug, Clone, Serialize)]
pub struct Resources {
    pub tags: Vec<Tag>,
    pub colors: Vec<Color>,
}

/// Read access to the tag catalog and palette seeding.
pub struct ResourceManager<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
}

impl<S: Store> ResourceManager<S> {
    pub fn new(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn resources(&self) -> Result<Resources, CoreError> {
        async {
            let mut tx = self.store.begin(false).await?;
            let result = tx.find_tags(&TagFilter::All).await;
            let tags = finish(tx, result).await?;
            Ok(Resources {
                tags,
                colors: Color::ALL.to_vec(),
            })
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Create any palette tag missing from the catalog, matching by name.
    ///
    /// Returns the palette's tags in palette order. Safe to run on every start.
    pub async fn ensure_palette(&self, palette: &TagPalette) -> Result<Vec<Tag>, CoreError> {
        async {
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                let mut tags = Vec::with_capacity(palette.seeds().len());
                for seed in palette.seeds() {
                    let existing = tx.find_tags(&TagFilter::Name(seed.name.clone())).await?;
                    let tag = match existing.into_iter().next() {
                        Some(tag) => tag,
                        None => {
                            let tag = Tag {
                                id: self.ids.generate(),
                                name: seed.name.clone(),
                                color: seed.color,
                            };
                            let tag = tx.create_tag(&tag).await?;
                            tracing::info!(tag_id = %tag.id, name = %tag.name, "Tag seeded");
                            tag
                        }
                    };
                    tags.push(tag);
                }
                Ok(tags)
            }
            .await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }
}
