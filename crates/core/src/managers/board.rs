use std::sync::Arc;

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::managers::{cascade_board, read_scope};
use crate::models::{
    Board, BoardDetail, CreateBoard, Item, List, ListDetail, MoveBoard, UpdateBoard,
};
use crate::ordering::{repair, Ordered};
use crate::store::{finish, OrderedTx, Store};
use crate::types::{is_empty_id, EntityId, IdGenerator, Scope};

/// Boards of one user, ordered per user.
pub struct BoardManager<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
}

impl<S: Store> BoardManager<S> {
    pub fn new(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Create a board at the tail of the user's boards.
    pub async fn create(&self, user_id: EntityId, input: CreateBoard) -> Result<Board, CoreError> {
        async {
            let board = input.into_board(self.ids.generate(), user_id)?;
            let mut tx = self.store.begin(true).await?;
            let result = repair::insert_at_tail(&mut tx, board).await;
            let board = finish(tx, result).await?;
            tracing::info!(user_id = %user_id, board_id = %board.id, "Board created");
            Ok(board)
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Change title, text or color. Position is never touched.
    pub async fn update(
        &self,
        user_id: EntityId,
        id: EntityId,
        input: UpdateBoard,
    ) -> Result<Board, CoreError> {
        async {
            let ctx = ErrorContext::new(Board::KIND, "update board").id(id).owner(user_id);
            let patch = input.into_patch(&ctx)?;
            let mut tx = self.store.begin(false).await?;
            let result = OrderedTx::<Board>::update(&mut tx, id, user_id, &patch).await;
            let board = finish(tx, result).await?;
            tracing::info!(user_id = %user_id, board_id = %id, "Board updated");
            Ok(board)
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Delete a board, its lists and their items.
    pub async fn delete(&self, user_id: EntityId, id: EntityId) -> Result<(), CoreError> {
        async {
            let ctx = ErrorContext::new(Board::KIND, "delete board").id(id).owner(user_id);
            if is_empty_id(id) || is_empty_id(user_id) {
                return Err(CoreError::invalid(ctx, InvalidReason::EmptyId));
            }
            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                let _: Board = repair::delete_with_splice(&mut tx, id, user_id).await?;
                cascade_board(&mut tx, user_id, id).await
            }
            .await;
            let (lists, items) = finish(tx, result).await?;
            tracing::info!(user_id = %user_id, board_id = %id, lists, items, "Board deleted");
            Ok(())
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// Reposition a board after `input.before`, or at the head.
    pub async fn move_to(
        &self,
        user_id: EntityId,
        id: EntityId,
        input: MoveBoard,
    ) -> Result<Board, CoreError> {
        async {
            let mut tx = self.store.begin(true).await?;
            let result =
                repair::move_to_position::<Board, _>(&mut tx, id, user_id, None, input.before)
                    .await;
            let board = finish(tx, result).await?;
            tracing::info!(
                user_id = %user_id,
                board_id = %id,
                before = ?board.before,
                "Board moved"
            );
            Ok(board)
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// A board with its lists and items, each level in chain order.
    pub async fn get(&self, user_id: EntityId, id: EntityId) -> Result<BoardDetail, CoreError> {
        async {
            let ctx = ErrorContext::new(Board::KIND, "get board").id(id).owner(user_id);
            let mut tx = self.store.begin(false).await?;
            let result: Result<_, CoreError> = async {
                let board = OrderedTx::<Board>::find_by_id(&mut tx, id, user_id).await?;
                let lists =
                    read_scope::<List, _>(&mut tx, Scope::new(user_id, board.id), &ctx).await?;
                let mut details = Vec::with_capacity(lists.len());
                for list in lists {
                    let items =
                        read_scope::<Item, _>(&mut tx, Scope::new(user_id, list.id), &ctx).await?;
                    details.push(ListDetail { list, items });
                }
                Ok(BoardDetail {
                    board,
                    lists: details,
                })
            }
            .await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }

    /// All boards of a user in chain order.
    pub async fn list(&self, user_id: EntityId) -> Result<Vec<Board>, CoreError> {
        async {
            let ctx = ErrorContext::new(Board::KIND, "list boards").owner(user_id);
            let mut tx = self.store.begin(false).await?;
            let result = read_scope::<Board, _>(&mut tx, Scope::owner(user_id), &ctx).await;
            finish(tx, result).await
        }
        .await
        .inspect_err(CoreError::log)
    }
}
