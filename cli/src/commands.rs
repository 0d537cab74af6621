//! Subcommand execution.

use std::path::Path;

use anyhow::Context;
use photoframe_core::{FrameClient, FrameConfig, Transport};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::Command;

pub async fn run(config: &FrameConfig, command: Command) -> anyhow::Result<()> {
    let client = FrameClient::from_config(config)?;
    execute(&client, command).await
}

async fn execute<T: Transport>(client: &FrameClient<T>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { folder, raw } => {
            if raw {
                print!("{}", client.list(&folder).await?);
            } else {
                let listing = client.list_folder(&folder).await?;
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
        }
        Command::Get { remote, local } => match local {
            Some(local) => {
                let bytes = client.save_file(&remote, &local).await?;
                info!("Saved {} to {} ({} bytes)", remote, local.display(), bytes);
            }
            None => {
                let mut stdout = tokio::io::stdout();
                client.get_file(&remote, &mut stdout).await?;
                stdout.flush().await?;
            }
        },
        Command::Image { remote } => {
            let image = client.get_image(&remote).await?;
            println!("{}x{} {:?}", image.width(), image.height(), image.color());
        }
        Command::Delete { path } => print!("{}", client.delete(&path).await?),
        Command::DeleteFolder { folder } => {
            let summary = client.delete_folder(&folder).await?;
            println!(
                "Deleted {} files and {} folders",
                summary.files, summary.folders
            );
        }
        Command::Upload {
            folder,
            local,
            name,
            mime,
        } => {
            let name = match name {
                Some(name) => name,
                None => remote_name(&local)?,
            };
            let result = client
                .upload_file(&folder, &name, &local, mime.as_deref())
                .await?;
            println!("{result}");
        }
        Command::Mkdir { parent, name } => print!("{}", client.make_dir(&parent, &name).await?),
        Command::Rename { src, dst } => print!("{}", client.rename(&src, &dst).await?),
        Command::FsInfo => print!("{}", client.filesystem_info().await?),
        Command::Exists { folder } => println!("{}", client.folder_exists(&folder).await),
    }
    Ok(())
}

/// Remote file name for an upload: the local file's name.
fn remote_name(local: &Path) -> anyhow::Result<String> {
    local
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("{} has no file name", local.display()))
}
