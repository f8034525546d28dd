//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加時の通知（JOIN と USER_LIST のブロードキャスト）
//!
//! ### なぜこのテストが必要か
//! - 存在しないルームへの参加は本人にだけ通知し、レジストリを変更してはならない
//! - 参加者全員の名簿表示が参加のたびに更新されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームへの参加
//! - 異常系：存在しないルーム、使用中のユーザー名

use std::sync::Arc;

use crate::domain::{
    ChatMessage, Connection, RepositoryError, RoomId, RoomRepository, Username,
    entity::{ROOM_NOT_FOUND_NOTICE, USERNAME_TAKEN_NOTICE},
};

use super::broadcast::Broadcaster;

/// 参加処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    RoomNotFound,
    UsernameTaken,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        let broadcaster = Broadcaster::new(repository.clone());
        Self {
            repository,
            broadcaster,
        }
    }

    /// 参加を実行
    ///
    /// On success every participant, the newcomer included, receives a `JOIN`
    /// notice followed by the updated `USER_LIST`. On failure only the
    /// requesting connection receives a `System` notice.
    pub async fn execute(
        &self,
        connection: Arc<dyn Connection>,
        username: Username,
        room_id: RoomId,
    ) -> JoinOutcome {
        if !self.repository.room_exists(&room_id).await {
            return self.reject(connection.as_ref(), &room_id, JoinOutcome::RoomNotFound);
        }

        let result = self
            .repository
            .add_participant(&room_id, username.clone(), connection.clone())
            .await;

        match result {
            Ok(()) => {
                tracing::info!(room_id = %room_id, username = %username, "Participant joined");
                self.broadcaster
                    .broadcast(&room_id, &ChatMessage::join_notice(&username, &room_id))
                    .await;
                self.broadcaster.broadcast_user_list(&room_id).await;
                JoinOutcome::Joined
            }
            Err(RepositoryError::UsernameTaken(_)) => {
                tracing::warn!(room_id = %room_id, username = %username, "Username already in use");
                self.reject(connection.as_ref(), &room_id, JoinOutcome::UsernameTaken)
            }
            Err(e) => {
                // Closed between the existence check and the insert
                tracing::debug!(room_id = %room_id, error = %e, "Join rejected");
                self.reject(connection.as_ref(), &room_id, JoinOutcome::RoomNotFound)
            }
        }
    }

    fn reject(&self, connection: &dyn Connection, room_id: &RoomId, outcome: JoinOutcome) -> JoinOutcome {
        let notice = match outcome {
            JoinOutcome::UsernameTaken => USERNAME_TAKEN_NOTICE,
            _ => ROOM_NOT_FOUND_NOTICE,
        };
        self.broadcaster
            .send_to(connection, &ChatMessage::system_notice(notice, room_id));
        outcome
    }
}
