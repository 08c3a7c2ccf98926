use std::fmt;

use crate::types::EntityId;

/// Placeholder id used when the caller supplied no usable key.
pub const NO_ID: &str = "(no id)";

/// Who and what an error is about.
///
/// Carried by every storage-related [`CoreError`] so that a single log line
/// identifies the owner, the entity and the operation that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Entity label, e.g. `"board"`.
    pub entity: &'static str,
    /// Entity id, user name, or [`NO_ID`].
    pub id: String,
    pub owner: Option<EntityId>,
    /// Operation name, e.g. `"move list"`.
    pub action: &'static str,
}

impl ErrorContext {
    pub fn new(entity: &'static str, action: &'static str) -> Self {
        Self {
            entity,
            id: NO_ID.to_string(),
            owner: None,
            action,
        }
    }

    pub fn id(mut self, id: impl ToString) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.action, self.entity, self.id)?;
        if let Some(owner) = self.owner {
            write!(f, " (owner {owner})")?;
        }
        Ok(())
    }
}

/// Why caller-supplied content was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown color `{0}`")]
    InvalidColor(String),

    #[error("unknown tag {0}")]
    UnknownTag(EntityId),

    #[error("id must not be empty")]
    EmptyId,

    #[error("an entity cannot be placed after itself")]
    SelfPredecessor,

    #[error("predecessor {predecessor} does not belong to parent {parent}")]
    PredecessorOutOfScope {
        predecessor: EntityId,
        parent: EntityId,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0} does not exist")]
    NotFound(ErrorContext),

    #[error("{context} has invalid content: {reason}")]
    InvalidContent {
        context: ErrorContext,
        reason: InvalidReason,
    },

    #[error("{0} already exists")]
    Conflict(ErrorContext),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{context}: internal error: {message}")]
    Server {
        context: ErrorContext,
        message: String,
    },
}

/// The tag callers match on instead of inspecting concrete error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidContent,
    Conflict,
    Unauthorized,
    Server,
}

impl CoreError {
    pub fn invalid(context: ErrorContext, reason: InvalidReason) -> Self {
        Self::InvalidContent { context, reason }
    }

    pub fn server(context: ErrorContext, message: impl fmt::Display) -> Self {
        Self::Server {
            context,
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidContent { .. } => ErrorKind::InvalidContent,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::NotFound(context)
            | Self::Conflict(context)
            | Self::InvalidContent { context, .. }
            | Self::Server { context, .. } => Some(context),
            Self::Unauthorized(_) => None,
        }
    }

    /// Emit one log line for this error.
    ///
    /// Server errors are system faults and go out at error level; every other
    /// kind is an ordinary rejected request and is logged at info level.
    pub fn log(&self) {
        let (owner, entity, id, action) = match self.context() {
            Some(ctx) => (
                ctx.owner.map(|o| o.to_string()),
                ctx.entity,
                ctx.id.as_str(),
                ctx.action,
            ),
            None => (None, "-", NO_ID, "-"),
        };
        let owner = owner.as_deref().unwrap_or(NO_ID);
        match self.kind() {
            ErrorKind::Server => {
                tracing::error!(
                    user_id = owner,
                    entity,
                    id,
                    action,
                    error = %self,
                    "Request failed"
                )
            }
            kind => {
                tracing::info!(
                    user_id = owner,
                    entity,
                    id,
                    action,
                    ?kind,
                    error = %self,
                    "Request rejected"
                )
            }
        }
    }
}
