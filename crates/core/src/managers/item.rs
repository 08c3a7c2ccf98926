use std::sync::Arc;

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::managers::read_scope;
use crate::models::{CreateItem, Item, List, MoveItem, TagFilter, UpdateItem};
use crate::ordering::{repair, Ordered};
use crate::store::{finish, OrderedTx, Store, TagCatalog};
use crate::types::{is_empty_id, EntityId, IdGenerator, Scope};

/// Items of one list, ordered per `(list, owner)`.
pub struct ItemManager<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
}

impl<S: Store> ItemManager<S> {
    pub fn new(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Create an item at the tail of its list.
    ///
    /// The list must belong to `user_id` and every tag must exist.
    pub async fn create(&self, user_id: EntityId, input: CreateItem) -> Result<Item, CoreError> {
        async {
            let item = input.into_item(self.ids.generate(), user_id)?;
            let ctx = item.context("create item");
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                OrderedTx::<List>::find_by_id(&mut tx, item.list_id, user_id).await?;
                require_tags(&mut tx, &item.tags, &ctx).await?;
                repair::insert_at_tail(&mut tx, item).await
            }
            .await;
            let item = finish(tx, result).await?;
            tracing::info!(
                user_id = %user_id,
                list_id = %item.list_id,
                item_id = %item.id,
                "Item created"
            );
            Ok(item)
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Change title, text or tags. Position is never touched.
    pub async fn update(
        &self,
        user_id: EntityId,
        id: EntityId,
        input: UpdateItem,
    ) -> Result<Item, CoreError> {
        async {
            let ctx = ErrorContext::new(Item::KIND, "update item").id(id).owner(user_id);
            let patch = input.into_patch(&ctx)?;
            // A tag check and the write must see the same catalog.
            let mut tx = self.store.begin(patch.tags.is_some()).await?;
            let result: Result<_, CoreError> = async {
                if let Some(tags) = &patch.tags {
                    require_tags(&mut tx, tags, &ctx).await?;
                }
                OrderedTx::<Item>::update(&mut tx, id, user_id, &patch).await
            }
            .await;
            let item = finish(tx, result).await?;
            tracing::info!(user_id = %user_id, item_id = %id, "Item updated");
            Ok(item)
        }
        .await
        .inspect_err(CoreError::log)
    }

    pub async fn delete(&self, user_id: EntityId, id: EntityId) -> Result<(), CoreError> {
        async {
            let ctx = ErrorContext::new(Item::KIND, "delete item").id(id).owner(user_id);
            if is_empty_id(id) || is_empty_id(user_id) {
                return Err(CoreError::invalid(ctx, InvalidReason::EmptyId));
            }
            let mut tx = self.store.begin(true).await?;
            let result = repair::delete_with_splice::<Item, _>(&mut tx, id, user_id).await;
            let item = finish(tx, result).await?;
            tracing::info!(
                user_id = %user_id,
                list_id = %item.list_id,
                item_id = %id,
                "Item deleted"
            );
            Ok(())
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Reposition an item, optionally into another list of the same user.
    pub async fn move_to(
        &self,
        user_id: EntityId,
        id: EntityId,
        input: MoveItem,
    ) -> Result<Item, CoreError> {
        async {
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                if let Some(list_id) = input.list_id {
                    OrderedTx::<List>::find_by_id(&mut tx, list_id, user_id).await?;
                }
                repair::move_to_position::<Item, _>(
                    &mut tx,
                    id,
                    user_id,
                    input.list_id,
                    input.before,
                )
                .await
            }
            .await;
            let item = finish(tx, result).await?;
            tracing::info!(
                user_id = %user_id,
                list_id = %item.list_id,
                item_id = %id,
                before = ?item.before,
                "Item moved"
            );
            Ok(item)
        }
        .await
        .inspect_err(CoreError::log)
    }

    pub async fn find(&self, user_id: EntityId, id: EntityId) -> Result<Item, CoreError> {
        async {
            let mut tx = self.store.begin(false).await?;
            let result = OrderedTx::<Item>::find_by_id(&mut tx, id, user_id).await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Items of one list in chain order.
    pub async fn list_in_list(
        &self,
        user_id: EntityId,
        list_id: EntityId,
    ) -> Result<Vec<Item>, CoreError> {
        async {
            let ctx = ErrorContext::new(Item::KIND, "list items").owner(user_id);
            let mut tx = self.store.begin(false).await?;
            let result: Result<_, CoreError> = async {
                OrderedTx::<List>::find_by_id(&mut tx, list_id, user_id).await?;
                read_scope::<Item, _>(&mut tx, Scope::new(user_id, list_id), &ctx).await
            }
            .await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }
}

/// Every id in `tags` must exist in the catalog.
async fn require_tags<T>(tx: &mut T, tags: &[EntityId], ctx: &ErrorContext) -> Result<(), CoreError>
where
    T: TagCatalog + ?Sized,
{
    if tags.is_empty() {
        return Ok(());
    }
    let known = tx.find_tags(&TagFilter::Ids(tags.to_vec())).await?;
    match tags.iter().find(|id| !known.iter().any(|tag| tag.id == **id)) {
        Some(unknown) => Err(CoreError::invalid(
            ctx.clone(),
            InvalidReason::UnknownTag(*unknown),
        )),
        None => Ok(()),
    }
}
