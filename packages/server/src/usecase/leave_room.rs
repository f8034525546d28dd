//! UseCase: ルーム退出処理
//!
//! 明示的な LEAVE と接続切断の両方から呼ばれる。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 残った参加者に LEAVE 通知と更新後の名簿が届くことを保証
//! - 最後の参加者が抜けたルームが削除されることを保証
//! - 別の接続が保持するユーザー名を外せないことを保証

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, RoomId, RoomRepository, Username};

use super::broadcast::Broadcaster;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        let broadcaster = Broadcaster::new(repository.clone());
        Self {
            repository,
            broadcaster,
        }
    }

    /// 退出を実行
    ///
    /// Only removes `username` while it is bound to `connection_id`. Returns
    /// the room that was left, or `None` if nothing was bound.
    pub async fn execute(
        &self,
        username: &Username,
        connection_id: &ConnectionId,
    ) -> Option<RoomId> {
        let room_id = self
            .repository
            .remove_participant(username, connection_id)
            .await?;

        tracing::info!(room_id = %room_id, username = %username, "Participant left");

        // Both are no-ops when the room was removed with its last participant
        self.broadcaster
            .broadcast(&room_id, &ChatMessage::leave_notice(username, &room_id))
            .await;
        self.broadcaster.broadcast_user_list(&room_id).await;

        Some(room_id)
    }
}
