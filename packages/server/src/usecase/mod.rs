//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod broadcast;
pub mod close_room;
pub mod create_room;
pub mod error;
pub mod get_room;
pub mod join_room;
pub mod leave_room;
pub mod send_message;
pub mod session;

pub use broadcast::Broadcaster;
pub use close_room::CloseRoomUseCase;
pub use create_room::CreateRoomUseCase;
pub use error::CreateRoomError;
pub use get_room::GetRoomUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use session::{ChatSession, SessionState};
