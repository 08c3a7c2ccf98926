use std::sync::Arc;

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::managers::{cascade_list, read_scope};
use crate::models::{Board, CreateList, List, MoveList, UpdateList};
use crate::ordering::{repair, Ordered};
use crate::store::{finish, OrderedTx, Store};
use crate::types::{is_empty_id, EntityId, IdGenerator, Scope};

/// Lists of one board, ordered per `(board, owner)`.
pub struct ListManager<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
}

impl<S: Store> ListManager<S> {
    pub fn new(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Create a list at the tail of its board. The board must belong to `user_id`.
    pub async fn create(&self, user_id: EntityId, input: CreateList) -> Result<List, CoreError> {
        async {
            let list = input.into_list(self.ids.generate(), user_id)?;
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                OrderedTx::<Board>::find_by_id(&mut tx, list.board_id, user_id).await?;
                repair::insert_at_tail(&mut tx, list).await
            }
            .await;
            let list = finish(tx, result).await?;
            tracing::info!(
                user_id = %user_id,
                board_id = %list.board_id,
                list_id = %list.id,
                "List created"
            );
            Ok(list)
        }
        .await
        .inspect_err(CoreError::log)
    }

    pub async fn update(
        &self,
        user_id: EntityId,
        id: EntityId,
        input: UpdateList,
    ) -> Result<List, CoreError> {
        async {
            let ctx = ErrorContext::new(List::KIND, "update list").id(id).owner(user_id);
            let patch = input.into_patch(&ctx)?;
            let mut tx = self.store.begin(false).await?;
            let result = OrderedTx::<List>::update(&mut tx, id, user_id, &patch).await;
            let list = finish(tx, result).await?;
            tracing::info!(user_id = %user_id, list_id = %id, "List updated");
            Ok(list)
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Delete a list and its items, joining its neighbours.
    pub async fn delete(&self, user_id: EntityId, id: EntityId) -> Result<(), CoreError> {
        async {
            let ctx = ErrorContext::new(List::KIND, "delete list").id(id).owner(user_id);
            if is_empty_id(id) || is_empty_id(user_id) {
                return Err(CoreError::invalid(ctx, InvalidReason::EmptyId));
            }
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                let _: List = repair::delete_with_splice(&mut tx, id, user_id).await?;
                cascade_list(&mut tx, user_id, id).await
            }
            .await;
            let items = finish(tx, result).await?;
            tracing::info!(user_id = %user_id, list_id = %id, items, "List deleted");
            Ok(())
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Reposition a list, optionally onto another board of the same user.
    pub async fn move_to(
        &self,
        user_id: EntityId,
        id: EntityId,
        input: MoveList,
    ) -> Result<List, CoreError> {
        async {
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                if let Some(board_id) = input.board_id {
                    OrderedTx::<Board>::find_by_id(&mut tx, board_id, user_id).await?;
                }
                repair::move_to_position::<List, _>(
                    &mut tx,
                    id,
                    user_id,
                    input.board_id,
                    input.before,
                )
                .await
            }
            .await;
            let list = finish(tx, result).await?;
            tracing::info!(
                user_id = %user_id,
                board_id = %list.board_id,
                list_id = %id,
                before = ?list.before,
                "List moved"
            );
            Ok(list)
        }
        .await
        .inspect_err(CoreError::log)
    }

    pub async fn find(&self, user_id: EntityId, id: EntityId) -> Result<List, CoreError> {
        async {
            let mut tx = self.store.begin(false).await?;
            let result = OrderedTx::<List>::find_by_id(&mut tx, id, user_id).await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Lists of one board in chain order.
    pub async fn list_in_board(
        &self,
        user_id: EntityId,
        board_id: EntityId,
    ) -> Result<Vec<List>, CoreError> {
        async {
            let ctx = ErrorContext::new(List::KIND, "list lists").owner(user_id);
            let mut tx = self.store.begin(false).await?;
            let result: Result<_, CoreError> = async {
                OrderedTx::<Board>::find_by_id(&mut tx, board_id, user_id).await?;
                read_scope::<List, _>(&mut tx, Scope::new(user_id, board_id), &ctx).await
            }
            .await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::managers::Services;
    use crate::memory::MemoryStore;
    use crate::models::{CreateBoard, CreateItem, Item};
    use crate::ordering::{chain, Links};
    use crate::store::{ScopeQuery, Transaction};

    struct Fixture {
        store: MemoryStore,
        services: Services<MemoryStore>,
        user: EntityId,
        board: EntityId,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = MemoryStore::new();
            let services = Services::new(store.clone());
            let user = Uuid::now_v7();
            let board = services
                .boards
                .create(
                    user,
                    CreateBoard {
                        title: "board".into(),
                        text: None,
                        color: "red".into(),
                    },
                )
                .await
                .unwrap()
                .id;
            Self {
                store,
                services,
                user,
                board,
            }
        }

        async fn list(&self, title: &str) -> List {
            self.list_on(self.board, title).await
        }

        async fn list_on(&self, board: EntityId, title: &str) -> List {
            self.services
                .lists
                .create(
                    self.user,
                    CreateList {
                        board_id: Some(board),
                        title: title.into(),
                    },
                )
                .await
                .unwrap()
        }

        async fn titles_on(&self, board: EntityId) -> Vec<String> {
            self.services
                .lists
                .list_in_board(self.user, board)
                .await
                .unwrap()
                .into_iter()
                .map(|l| l.title)
                .collect()
        }

        async fn titles(&self) -> Vec<String> {
            self.titles_on(self.board).await
        }

        async fn raw_lists(&self) -> Vec<List> {
            let mut tx = self.store.begin(false).await.unwrap();
            let rows = OrderedTx::<List>::find(
                &mut tx,
                &ScopeQuery::all(Scope::new(self.user, self.board)),
            )
            .await
            .unwrap();
            tx.commit().await.unwrap();
            rows
        }
    }

    #[tokio::test]
    async fn first_two_lists_link_to_each_other() {
        let fx = Fixture::new().await;
        let l1 = fx.list("L1").await;
        assert_eq!(l1.links(), Links::default());

        let l2 = fx.list("L2").await;
        let l1 = fx.services.lists.find(fx.user, l1.id).await.unwrap();
        assert_eq!(l1.after, Some(l2.id));
        assert_eq!(l2.before, Some(l1.id));
        assert_eq!(l2.after, None);
    }

    #[tokio::test]
    async fn deleting_middle_list_splices_neighbours() {
        let fx = Fixture::new().await;
        let l1 = fx.list("L1").await;
        let l2 = fx.list("L2").await;
        let l3 = fx.list("L3").await;

        fx.services.lists.delete(fx.user, l2.id).await.unwrap();

        let l1 = fx.services.lists.find(fx.user, l1.id).await.unwrap();
        let l3 = fx.services.lists.find(fx.user, l3.id).await.unwrap();
        assert_eq!(l1.after, Some(l3.id));
        assert_eq!(l3.before, Some(l1.id));
        assert_eq!(fx.titles().await, ["L1", "L3"]);
    }

    #[tokio::test]
    async fn moving_tail_to_head() {
        let fx = Fixture::new().await;
        fx.list("L1").await;
        fx.list("L2").await;
        let l3 = fx.list("L3").await;

        let moved = fx
            .services
            .lists
            .move_to(fx.user, l3.id, MoveList::default())
            .await
            .unwrap();
        assert_eq!(moved.before, None);
        assert_eq!(fx.titles().await, ["L3", "L1", "L2"]);
    }

    #[tokio::test]
    async fn move_and_move_back_restores_order() {
        let fx = Fixture::new().await;
        let l1 = fx.list("L1").await;
        let l2 = fx.list("L2").await;
        fx.list("L3").await;
        fx.list("L4").await;

        let original_before = l2.before;
        fx.services
            .lists
            .move_to(
                fx.user,
                l2.id,
                MoveList {
                    board_id: None,
                    before: fx.raw_lists().await.iter().find(|l| l.title == "L4").map(|l| l.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(fx.titles().await, ["L1", "L3", "L4", "L2"]);

        fx.services
            .lists
            .move_to(
                fx.user,
                l2.id,
                MoveList {
                    board_id: None,
                    before: original_before,
                },
            )
            .await
            .unwrap();
        assert_eq!(original_before, Some(l1.id));
        assert_eq!(fx.titles().await, ["L1", "L2", "L3", "L4"]);
    }

    #[tokio::test]
    async fn chain_survives_a_mixed_sequence() {
        let fx = Fixture::new().await;
        let mut ids = Vec::new();
        for n in 0..6 {
            ids.push(fx.list(&format!("L{n}")).await.id);
        }
        fx.services.lists.delete(fx.user, ids[0]).await.unwrap();
        fx.services
            .lists
            .move_to(
                fx.user,
                ids[5],
                MoveList {
                    board_id: None,
                    before: Some(ids[2]),
                },
            )
            .await
            .unwrap();
        fx.services.lists.delete(fx.user, ids[3]).await.unwrap();
        fx.services
            .lists
            .move_to(
                fx.user,
                ids[1],
                MoveList {
                    board_id: None,
                    before: Some(ids[4]),
                },
            )
            .await
            .unwrap();
        fx.list("L6").await;

        let rows = fx.raw_lists().await;
        assert!(chain::check(&rows).is_ok());
        assert_eq!(rows.iter().filter(|l| l.before.is_none()).count(), 1);
        assert_eq!(rows.iter().filter(|l| l.after.is_none()).count(), 1);
        assert_eq!(fx.titles().await, ["L2", "L5", "L4", "L1", "L6"]);
    }

    #[tokio::test]
    async fn move_to_another_board() {
        let fx = Fixture::new().await;
        let other = fx
            .services
            .boards
            .create(
                fx.user,
                CreateBoard {
                    title: "other".into(),
                    text: None,
                    color: "green".into(),
                },
            )
            .await
            .unwrap()
            .id;
        let a = fx.list("a").await;
        fx.list("b").await;
        fx.list_on(other, "x").await;

        let moved = fx
            .services
            .lists
            .move_to(
                fx.user,
                a.id,
                MoveList {
                    board_id: Some(other),
                    before: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.board_id, other);
        assert_eq!(fx.titles().await, ["b"]);
        assert_eq!(fx.titles_on(other).await, ["a", "x"]);
    }

    #[tokio::test]
    async fn move_to_unknown_board_is_not_found() {
        let fx = Fixture::new().await;
        let a = fx.list("a").await;
        let result = fx
            .services
            .lists
            .move_to(
                fx.user,
                a.id,
                MoveList {
                    board_id: Some(Uuid::now_v7()),
                    before: None,
                },
            )
            .await;
        assert_matches!(result, Err(CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_on_foreign_board_is_not_found() {
        let fx = Fixture::new().await;
        let result = fx
            .services
            .lists
            .create(
                Uuid::now_v7(),
                CreateList {
                    board_id: Some(fx.board),
                    title: "sneaky".into(),
                },
            )
            .await;
        assert_matches!(result, Err(CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_create_rolls_back_tail_update() {
        let fx = Fixture::new().await;
        let l1 = fx.list("L1").await;
        // Write 1 relinks the old tail, write 2 inserts the new row.
        fx.store.fail_on_write(2);

        let result = fx
            .services
            .lists
            .create(
                fx.user,
                CreateList {
                    board_id: Some(fx.board),
                    title: "L2".into(),
                },
            )
            .await;
        assert_matches!(result, Err(CoreError::Server { .. }));

        let l1 = fx.services.lists.find(fx.user, l1.id).await.unwrap();
        assert_eq!(l1.after, None);
        assert_eq!(fx.titles().await, ["L1"]);
    }

    #[tokio::test]
    async fn failed_move_leaves_chain_untouched() {
        let fx = Fixture::new().await;
        fx.list("L1").await;
        fx.list("L2").await;
        let l3 = fx.list("L3").await;
        fx.store.fail_on_write(3);

        let result = fx
            .services
            .lists
            .move_to(fx.user, l3.id, MoveList::default())
            .await;
        assert_matches!(result, Err(CoreError::Server { .. }));
        assert_eq!(fx.titles().await, ["L1", "L2", "L3"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_chain_and_items() {
        let fx = Fixture::new().await;
        fx.list("L1").await;
        let l2 = fx.list("L2").await;
        fx.list("L3").await;
        let item = fx
            .services
            .items
            .create(
                fx.user,
                CreateItem {
                    list_id: Some(l2.id),
                    title: "card".into(),
                    text: None,
                    tags: vec![],
                },
            )
            .await
            .unwrap();
        fx.store.fail_on_write(4);

        let result = fx.services.lists.delete(fx.user, l2.id).await;
        assert_matches!(result, Err(CoreError::Server { .. }));

        assert_eq!(fx.titles().await, ["L1", "L2", "L3"]);
        assert!(chain::check(&fx.raw_lists().await).is_ok());
        assert_eq!(fx.services.items.find(fx.user, item.id).await.unwrap().list_id, l2.id);
    }

    #[tokio::test]
    async fn delete_removes_items_of_the_list() {
        let fx = Fixture::new().await;
        let l = fx.list("L").await;
        let item = fx
            .services
            .items
            .create(
                fx.user,
                CreateItem {
                    list_id: Some(l.id),
                    title: "card".into(),
                    text: None,
                    tags: vec![],
                },
            )
            .await
            .unwrap();

        fx.services.lists.delete(fx.user, l.id).await.unwrap();

        let mut tx = fx.store.begin(false).await.unwrap();
        let orphans: Vec<Item> = tx
            .find(&ScopeQuery::all(Scope::new(fx.user, l.id)))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert!(orphans.is_empty());
        assert_matches!(
            fx.services.items.find(fx.user, item.id).await,
            Err(CoreError::NotFound(_))
        );
    }
}
