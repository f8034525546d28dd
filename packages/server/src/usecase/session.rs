//! Session coordinator
//!
//! One `ChatSession` per WebSocket connection. It interprets inbound
//! messages by kind, tracks which (username, room) the connection is bound
//! to and runs the cleanup when the transport goes away.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChatSession::handle() の種別ごとの振る舞い
//! - ChatSession::disconnect() による後片付け
//!
//! ### なぜこのテストが必要か
//! - 異常切断でも退出通知が出て、空のルームが残らないことを保証
//! - 一つの接続が同時に二つのルームに属さないことを保証

use std::{mem, sync::Arc};

use crate::domain::{ChatMessage, Connection, MessageKind, RoomId, RoomRepository, Username};

use super::{
    close_room::CloseRoomUseCase,
    join_room::{JoinOutcome, JoinRoomUseCase},
    leave_room::LeaveRoomUseCase,
    send_message::SendMessageUseCase,
};

/// Lifecycle of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Open, not bound to any room
    Connected,
    /// Bound to `username` inside `room_id`
    Joined { username: Username, room_id: RoomId },
    /// Transport gone; every later message is ignored
    Closed,
}

pub struct ChatSession {
    connection: Arc<dyn Connection>,
    state: SessionState,
    join_room: JoinRoomUseCase,
    leave_room: LeaveRoomUseCase,
    send_message: SendMessageUseCase,
    close_room: CloseRoomUseCase,
}

impl ChatSession {
    pub fn new(repository: Arc<dyn RoomRepository>, connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            state: SessionState::Connected,
            join_room: JoinRoomUseCase::new(repository.clone()),
            leave_room: LeaveRoomUseCase::new(repository.clone()),
            send_message: SendMessageUseCase::new(repository.clone()),
            close_room: CloseRoomUseCase::new(repository),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Dispatch one inbound message
    pub async fn handle(&mut self, message: ChatMessage) {
        if self.state == SessionState::Closed {
            tracing::debug!(connection_id = %self.connection.id(), "Message after close ignored");
            return;
        }

        match message.kind {
            MessageKind::Join => self.join(message.sender, message.room_id).await,
            MessageKind::Chat => {
                self.send_message.execute(&message).await;
            }
            MessageKind::Leave => self.leave(&message.sender).await,
            MessageKind::RoomClosed => self.close(&message.sender, &message.room_id).await,
            // Server-originated only
            MessageKind::UserList => {
                tracing::debug!(connection_id = %self.connection.id(), "Inbound USER_LIST ignored");
            }
        }
    }

    /// Release whatever this connection holds. Safe to call more than once.
    pub async fn disconnect(&mut self) {
        let previous = mem::replace(&mut self.state, SessionState::Closed);
        if let SessionState::Joined { username, room_id } = previous {
            tracing::info!(
                connection_id = %self.connection.id(),
                room_id = %room_id,
                username = %username,
                "Connection closed while joined"
            );
            self.leave_room
                .execute(&username, &self.connection.id())
                .await;
        }
    }

    async fn join(&mut self, username: Username, room_id: RoomId) {
        // A connection is bound to at most one (username, room) pair
        if let SessionState::Joined {
            username: bound_username,
            room_id: bound_room,
        } = &self.state
            && (bound_username != &username || bound_room != &room_id)
        {
            self.leave_room
                .execute(bound_username, &self.connection.id())
                .await;
            self.state = SessionState::Connected;
        }

        let outcome = self
            .join_room
            .execute(self.connection.clone(), username.clone(), room_id.clone())
            .await;
        if outcome == JoinOutcome::Joined {
            self.state = SessionState::Joined { username, room_id };
        }
    }

    async fn leave(&mut self, username: &Username) {
        let left = self
            .leave_room
            .execute(username, &self.connection.id())
            .await;
        if left.is_some()
            && let SessionState::Joined {
                username: bound_username,
                ..
            } = &self.state
            && bound_username == username
        {
            self.state = SessionState::Connected;
        }
    }

    async fn close(&mut self, requester: &Username, room_id: &RoomId) {
        if !self.close_room.execute(requester, room_id).await {
            return;
        }
        if let SessionState::Joined {
            room_id: bound_room,
            ..
        } = &self.state
            && bound_room == room_id
        {
            self.state = SessionState::Connected;
        }
    }
}
