//! Metadata refresh of the server's collections folder

use tracing::info;

use super::models::find_by_name;
use crate::error::{SyncError, SyncResult};
use crate::services::MediaServer;

/// Trigger a full recursive metadata and image refresh of the folder named `folder_name`.
///
/// Returns the folder id. A missing folder is a configuration problem, not a transient one.
pub async fn refresh_collections<S>(server: &S, folder_name: &str) -> SyncResult<String>
where
    S: MediaServer + ?Sized,
{
    let folders = server.media_folders().await?;
    let folder = find_by_name(&folders, folder_name)
        .ok_or_else(|| SyncError::FolderNotFound(folder_name.to_string()))?;

    info!("Forcing refresh of collection metadata...");
    server.refresh_item(&folder.id).await?;
    info!("Metadata refresh successfully started!");

    Ok(folder.id.clone())
}
