use std::path::{Path, PathBuf};

use artwork_model::ArtworkRecord;
use notify::event::{CreateKind, ModifyKind};
use notify::{Event, EventKind, RecursiveMode, Watcher, recommended_watcher};
use serde_json::Value;
use tokio::sync::mpsc::{self, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::Error;

/// Reads an artwork collection: a JSON array of artwork records.
pub fn load(path: &Path) -> Result<Vec<ArtworkRecord>, Error> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json_err = |source: serde_json::Error| Error::Json {
        path: path.to_path_buf(),
        source,
    };
    let value: Value = serde_json::from_str(&raw).map_err(json_err)?;
    if !value.is_array() {
        return Err(Error::NotAnArray(path.to_path_buf()));
    }
    let artworks: Vec<ArtworkRecord> = serde_json::from_value(value).map_err(json_err)?;
    info!(path = %path.display(), count = artworks.len(), "loaded artwork collection");
    Ok(artworks)
}

/// Watches the collection file and sends the whole collection again every time
/// it changes on disk. Unreadable intermediate versions are logged and skipped.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn run(
    path: PathBuf,
    to_store: Sender<Vec<ArtworkRecord>>,
    cancel: CancellationToken,
) -> Result<(), Error> {
    // Editors often replace the file, so watch the directory and filter by name.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(file_name) = path.file_name().map(|name| name.to_os_string()) else {
        warn!("collection path has no file name; not watching");
        return Ok(());
    };

    let (watch_tx, mut watch_rx) = mpsc::channel::<notify::Result<Event>>(64);
    let mut watcher = recommended_watcher(move |res| {
        let _ = watch_tx.blocking_send(res);
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(watching = %dir.display(), "collection watcher initialized");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting collection watcher");
                break;
            }
            Some(res) = watch_rx.recv() => match res {
                Ok(event) => {
                    let touches_collection = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if !touches_collection || !is_content_change(&event.kind) {
                        debug!(kind = ?event.kind, "fs: ignored");
                        continue;
                    }
                    match load(&path) {
                        Ok(artworks) => {
                            if to_store.send(artworks).await.is_err() {
                                warn!("collection receiver closed");
                                break;
                            }
                        }
                        Err(err) => warn!(%err, "collection reload failed; keeping previous"),
                    }
                }
                Err(err) => error!("watch error: {err}"),
            }
        }
    }
    Ok(())
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(CreateKind::File | CreateKind::Any)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
    )
}
