// THEORY:
// The `cue` module plays tier-change sounds without ever holding up the frame loop.
//
// Key architectural principles:
// 1.  **Fire and Forget**: `CueDispatcher::dispatch` hands the cue to a blocking task
//     on a small dedicated runtime and returns at once. The task's handle is dropped;
//     nobody waits for playback to finish.
// 2.  **Failure Isolation**: A missing file, an undecodable file, or a broken audio
//     device ends that one task with a logged warning. A panicking player is caught
//     by the runtime. Nothing flows back to the caller.
// 3.  **Pluggable Output**: The actual sound output sits behind the `CuePlayer` trait,
//     so the engine stays free of audio hardware and tests can record what would
//     have played.
// 4.  **No Mutual Exclusion**: Overlapping cues from rapid tier changes play at the
//     same time. The blocking pool keeps tokio's default size, so a new cue never
//     queues behind one that is still playing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use crate::core_modules::tier::Cue;
use crate::error::CueError;

const CUE_WORKER_THREADS: usize = 1;

/// Something that can play an audio file to completion.
pub trait CuePlayer: Send + Sync + 'static {
    /// Plays the file at `path`, blocking until playback ends.
    fn play(&self, path: &Path) -> Result<(), CueError>;
}

/// Spawns one background task per cue.
pub struct CueDispatcher {
    /// Only `None` while dropping.
    runtime: Option<Runtime>,
    asset_dir: PathBuf,
    player: Arc<dyn CuePlayer>,
}

impl CueDispatcher {
    pub fn new(asset_dir: impl Into<PathBuf>, player: Arc<dyn CuePlayer>) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(CUE_WORKER_THREADS)
            .thread_name("cue-playback")
            .build()?;
        Ok(Self {
            runtime: Some(runtime),
            asset_dir: asset_dir.into(),
            player,
        })
    }

    pub fn asset_path(&self, cue: Cue) -> PathBuf {
        self.asset_dir.join(cue.asset_name())
    }

    /// Starts playing `cue` in the background and returns immediately.
    pub fn dispatch(&self, cue: Cue) {
        let path = self.asset_path(cue);
        let player = Arc::clone(&self.player);
        debug!(?cue, path = %path.display(), "dispatching cue");

        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };
        // The handle is dropped on purpose; playback is never awaited.
        let _ = runtime.spawn_blocking(move || {
            if let Err(err) = player.play(&path) {
                warn!(?cue, error = %err, "cue playback failed");
            }
        });
    }
}

impl Drop for CueDispatcher {
    fn drop(&mut self) {
        // Do not wait for cues that are still playing.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
