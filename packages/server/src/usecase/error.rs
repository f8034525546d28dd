//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// ルーム作成時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateRoomError {
    #[error("Failed to register room: {0}")]
    Registry(#[from] RepositoryError),
}
