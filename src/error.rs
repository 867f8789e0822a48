//! Library error type

use thiserror::Error;

use crate::interaction::InteractionError;
use crate::model::{PanelId, PanelType};
use crate::panel::content::{ContentError, RegistryError};
use crate::store::StorageError;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("panel limit reached (maximum {max})")]
    PanelLimit { max: usize },

    #[error("unknown panel type `{0}`")]
    UnknownPanelType(PanelType),

    #[error("panel `{0}` already exists")]
    DuplicatePanel(PanelId),

    #[error("panel `{0}` not found")]
    PanelNotFound(PanelId),

    #[error("layout `{0}` not found")]
    LayoutNotFound(String),

    #[error("panel `{0}` is closed")]
    PanelClosed(PanelId),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),
}

pub type Result<T, E = DeskError> = std::result::Result<T, E>;
