//! Interactive chat session over WebSocket.

use futures_util::{SinkExt, StreamExt};
use ichigo_server::infrastructure::dto::websocket::{ChatMessageDto, MessageType};
use ichigo_shared::time::message_timestamp_now;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{
    error::ClientError,
    render::{Input, parse_input, parse_user_list, render},
};

const PROMPT: &str = "> ";

/// Identity of the user inside one room
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub username: String,
    pub room_id: String,
}

impl SessionContext {
    fn frame(&self, r#type: MessageType, content: impl Into<String>) -> Result<Message, ClientError> {
        let dto = ChatMessageDto {
            r#type,
            content: content.into(),
            sender: self.username.clone(),
            room_id: self.room_id.clone(),
            timestamp: Some(message_timestamp_now()),
        };
        Ok(Message::Text(serde_json::to_string(&dto)?.into()))
    }
}

/// Connect, join the room and run the prompt until the session ends
pub async fn run_session(ws_url: &str, context: SessionContext) -> Result<(), ClientError> {
    let (stream, _) = connect_async(ws_url).await?;
    tracing::info!(url = %ws_url, "WebSocket connected");
    let (mut write, mut read) = stream.split();

    write.send(context.frame(MessageType::Join, "")?).await?;
    println!(
        "Joined room {} as {}. Commands: /users /leave /close /quit",
        context.room_id, context.username
    );

    let mut lines = spawn_prompt();
    let mut roster: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        println!("* Connection closed by server");
                        break;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                };

                let message: ChatMessageDto = match serde_json::from_str(&text) {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::warn!(error = %e, "Ignored malformed frame");
                        continue;
                    }
                };

                if message.r#type == MessageType::UserList {
                    roster = parse_user_list(&message.content);
                }
                if let Some(line) = render(&message) {
                    println!("{line}");
                }
                if message.r#type == MessageType::RoomClosed {
                    break;
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    // EOF or Ctrl-C at the prompt
                    break;
                };
                match parse_input(&line) {
                    Input::Chat(text) => write.send(context.frame(MessageType::Chat, text)?).await?,
                    Input::Users => println!("* Users: {}", roster.join(", ")),
                    Input::Leave => {
                        write.send(context.frame(MessageType::Leave, "")?).await?;
                        break;
                    }
                    Input::Close => write.send(context.frame(MessageType::RoomClosed, "")?).await?,
                    Input::Quit => break,
                    Input::Empty => {}
                    Input::Unknown(command) => println!("* Unknown command: {command}"),
                }
            }
        }
    }

    // Best effort; the server cleans up on disconnect either way
    let _ = write.send(Message::Close(None)).await;
    tracing::info!("Session ended");
    Ok(())
}

/// Read lines on a dedicated thread so the prompt never blocks the runtime
fn spawn_prompt() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize line editor");
                return;
            }
        };
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read input");
                    break;
                }
            }
        }
    });
    rx
}
