use std::sync::Arc;

use crate::error::{CoreError, ErrorContext};
use crate::models::{require_text, NewUser, User, UserFilter};
use crate::store::{finish, Store, UserTx};
use crate::types::{is_empty_id, EntityId, IdGenerator};

/// Account registration and lookup.
pub struct UserManager<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
}

impl<S: Store> UserManager<S> {
    pub fn new(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Register a new account. Names are unique.
    pub async fn sign_up(&self, input: NewUser) -> Result<User, CoreError> {
        async {
            let ctx = ErrorContext::new("user", "sign up").id(&input.name);
            require_text(&input.name, "name", &ctx)?;
            require_text(&input.password_hash, "password", &ctx)?;
            let user = User {
                id: self.ids.generate(),
                name: input.name.trim().to_string(),
                password_hash: input.password_hash,
            };

            let mut tx = self.store.begin(true).await?;
            let result: Result<_, CoreError> = async {
                let taken = tx.find_user(&UserFilter::Name(user.name.clone())).await?;
                if taken.is_some() {
                    return Err(CoreError::Conflict(ctx.clone()));
                }
                tx.create_user(&user).await
            }
            .await;
            let user = finish(tx, result).await?;
            tracing::info!(user_id = %user.id, name = %user.name, "User signed up");
            Ok(user)
        }
        .await
        .inspect_err(CoreError::log)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<User, CoreError> {
        let ctx = ErrorContext::new("user", "find user").id(name);
        self.find_one(UserFilter::Name(name.trim().to_string()), ctx)
            .await
            .inspect_err(CoreError::log)
    }

    pub async fn find(&self, id: EntityId) -> Result<User, CoreError> {
        let ctx = ErrorContext::new("user", "find user").id(id);
        if is_empty_id(id) {
            let err = CoreError::NotFound(ErrorContext::new("user", "find user"));
            err.log();
            return Err(err);
        }
        self.find_one(UserFilter::Id(id), ctx)
            .await
            .inspect_err(CoreError::log)
    }

    async fn find_one(&self, filter: UserFilter, ctx: ErrorContext) -> Result<User, CoreError> {
        let mut tx = self.store.begin(false).await?;
        let result = tx.find_user(&filter).await;
        finish(tx, result)
            .await?
            .ok_or(CoreError::NotFound(ctx))
    }
}
