//! Ichigo terminal chat client.

pub mod api;
pub mod cli;
pub mod error;
pub mod render;
pub mod session;

use api::ApiClient;
use cli::{Cli, Command};
use error::ClientError;
use session::{SessionContext, run_session};

/// Run the subcommand selected on the command line
pub async fn run(cli: Cli) -> Result<(), ClientError> {
    let api = ApiClient::new(&cli.server);

    let context = match cli.command {
        Command::Create {
            room_name,
            username,
        } => {
            let room_id = api.create_room(&room_name, &username).await?;
            println!("Created room '{room_name}' with id {room_id}. Share it to invite others.");
            SessionContext { username, room_id }
        }
        Command::Join { room_id, username } => {
            if !api.room_exists(&room_id).await? {
                return Err(ClientError::RoomNotFound(room_id));
            }
            SessionContext { username, room_id }
        }
    };

    run_session(&api.ws_url()?, context).await
}
