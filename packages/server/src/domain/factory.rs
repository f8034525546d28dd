//! Domain factories for creating domain entities and value objects.

use super::{ConnectionId, RoomId, error::ValueObjectError};

/// Factory for generating RoomId instances.
///
/// Separates id generation from the validation logic in RoomId.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new 8-character upper-case RoomId from a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        RoomId::from_uuid(uuid)
    }
}

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_factory_generate() {
        // テスト項目: RoomIdFactory::generate() で 8 文字の大文字英数字の RoomId を生成できる
        // when (操作):
        let result = RoomIdFactory::generate();

        // then (期待する結果):
        assert!(result.is_ok());
        let room_id = result.unwrap();
        let id_str = room_id.as_str();
        assert_eq!(id_str.len(), 8);
        assert!(
            id_str
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_room_id_factory_generate_uniqueness() {
        // テスト項目: RoomIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let ids: std::collections::HashSet<_> = (0..100)
            .map(|_| RoomIdFactory::generate().unwrap())
            .collect();

        // then (期待する結果):
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_connection_id_factory_generate_uniqueness() {
        // テスト項目: ConnectionIdFactory::generate() は毎回異なる ID を生成する
        assert_ne!(
            ConnectionIdFactory::generate(),
            ConnectionIdFactory::generate()
        );
    }
}
