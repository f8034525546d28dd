//! Terminal rendering of chat frames and parsing of user input.

use chrono::NaiveDateTime;
use ichigo_server::infrastructure::dto::websocket::{ChatMessageDto, MessageType};
use ichigo_shared::time::MESSAGE_TIMESTAMP_FORMAT;

/// What the user typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Users,
    Leave,
    Close,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    match line {
        "/users" => Input::Users,
        "/leave" => Input::Leave,
        "/close" => Input::Close,
        "/quit" => Input::Quit,
        command if command.starts_with('/') => Input::Unknown(command.to_string()),
        text => Input::Chat(text.to_string()),
    }
}

/// Render a frame for display. `USER_LIST` frames render nothing.
pub fn render(message: &ChatMessageDto) -> Option<String> {
    match message.r#type {
        MessageType::Chat if message.sender != "System" => Some(format!(
            "[{}] {}: {}",
            clock_time(message.timestamp.as_deref()),
            message.sender,
            message.content
        )),
        MessageType::Chat | MessageType::Join | MessageType::Leave | MessageType::RoomClosed => {
            Some(format!("* {}", message.content))
        }
        MessageType::UserList | MessageType::Unknown => None,
    }
}

/// Roster carried by a `USER_LIST` frame
pub fn parse_user_list(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn clock_time(timestamp: Option<&str>) -> String {
    match timestamp.map(|ts| NaiveDateTime::parse_from_str(ts, MESSAGE_TIMESTAMP_FORMAT)) {
        Some(Ok(datetime)) => datetime.format("%H:%M:%S").to_string(),
        Some(Err(_)) => timestamp.unwrap_or_default().to_string(),
        None => "--:--:--".to_string(),
    }
}
