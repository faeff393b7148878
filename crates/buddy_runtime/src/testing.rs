//! Fixtures shared by the runtime's unit tests.

use buddy_host::{ImageItem, TextItem};
use futures::{executor::LocalPool, task::LocalSpawnExt};

use crate::spawn::TaskSpawner;

pub(crate) fn image(filename: &str, created_at: &str) -> ImageItem {
    ImageItem {
        filename: filename.to_string(),
        path: format!("C:/Users/dev/Pictures/CLIBuddy/{filename}"),
        thumbnail: "data:image/png;base64,AAAA".to_string(),
        created_at: created_at.to_string(),
        size_bytes: 4_096,
    }
}

pub(crate) fn text(id: &str, created_at: &str) -> TextItem {
    TextItem {
        id: id.to_string(),
        content: format!("copied {id}"),
        preview: format!("copied {id}"),
        hash: format!("hash-{id}"),
        created_at: created_at.to_string(),
        char_count: id.len() + 7,
    }
}

/// Returns a spawner queuing onto `pool`; queued work runs on `run_until_stalled`.
pub(crate) fn pool_spawner(pool: &LocalPool) -> TaskSpawner {
    let spawner = pool.spawner();
    TaskSpawner::new(move |task| {
        spawner
            .spawn_local(task)
            .expect("local pool accepts tasks");
    })
}
