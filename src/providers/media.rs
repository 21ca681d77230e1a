//! Media capture (photo and video)
//!
//! Stills and recordings come from a camera port and land as timestamped
//! files under the media directory. Recording runs on its own task so it
//! never blocks command routing, and it stops on an explicit external
//! signal rather than a fixed duration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{Error, Result};

/// Frame poll interval while recording
const FRAME_INTERVAL: Duration = Duration::from_millis(250);

/// Timestamp format for captured filenames
const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Trait for the external "stop recording" signal
///
/// Recording is the one operation with a human-in-the-loop termination:
/// it runs until this resolves, not for a fixed duration.
#[async_trait]
pub trait StopSignal: Send + Sync {
    /// Resolve once the user asks the recording to stop
    async fn wait(&self);
}

/// Enter keypress on stdin as the stop signal
#[derive(Debug, Default, Clone, Copy)]
pub struct EnterKeyStop;

#[async_trait]
impl StopSignal for EnterKeyStop {
    async fn wait(&self) {
        let _ = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
        })
        .await;
    }
}

/// Trait for camera backends
#[async_trait]
pub trait Camera: Send + Sync {
    /// Grab one encoded (JPEG) frame
    ///
    /// # Errors
    ///
    /// Returns error if the camera is unreachable or produced no frame
    async fn fetch_frame(&self) -> Result<Vec<u8>>;
}

/// Network camera exposing an HTTP snapshot endpoint
pub struct SnapshotCamera {
    client: reqwest::Client,
    url: String,
}

impl SnapshotCamera {
    /// Create a camera client for the given snapshot URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Camera for SnapshotCamera {
    async fn fetch_frame(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Media(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Media(format!(
                "snapshot endpoint returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Media(e.to_string()))?;

        if bytes.is_empty() {
            return Err(Error::Media("camera produced an empty frame".to_string()));
        }

        Ok(bytes.to_vec())
    }
}

/// Handle to an in-flight recording
pub struct RecordingHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<Result<usize>>,
    dir: PathBuf,
}

impl RecordingHandle {
    /// Directory the recording's frames are written to
    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Signal the stop and wait for the recorder to drain.
    ///
    /// Returns the number of frames written.
    ///
    /// # Errors
    ///
    /// Returns error if the recorder task failed
    pub async fn stop(self) -> Result<usize> {
        let _ = self.stop.send(true);
        self.task
            .await
            .map_err(|e| Error::Media(format!("recorder task failed: {e}")))?
    }
}

/// Photo and video capture on top of a camera port
pub struct MediaCapture {
    camera: Arc<dyn Camera>,
    media_dir: PathBuf,
}

impl MediaCapture {
    /// Create a capture provider writing into `media_dir`
    #[must_use]
    pub fn new(camera: Arc<dyn Camera>, media_dir: PathBuf) -> Self {
        Self { camera, media_dir }
    }

    /// Capture one still, returning the written file path
    ///
    /// # Errors
    ///
    /// Returns error if the camera or the filesystem write fails
    pub async fn take_photo(&self) -> Result<PathBuf> {
        let frame = self.camera.fetch_frame().await?;

        tokio::fs::create_dir_all(&self.media_dir).await?;
        let path = self
            .media_dir
            .join(format!("{}.jpg", Local::now().format(STAMP_FORMAT)));
        tokio::fs::write(&path, frame).await?;

        tracing::info!(path = %path.display(), "photo captured");
        Ok(path)
    }

    /// Start a recording without blocking the caller.
    ///
    /// Frames are polled into a timestamped directory until the returned
    /// handle's stop signal fires (or the handle is dropped). Individual
    /// frame failures are logged and skipped.
    #[must_use]
    pub fn start_recording(&self) -> RecordingHandle {
        let camera = Arc::clone(&self.camera);
        let dir = self
            .media_dir
            .join(format!("recording-{}", Local::now().format(STAMP_FORMAT)));
        let task_dir = dir.clone();

        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            tokio::fs::create_dir_all(&task_dir).await?;
            let mut frames = 0usize;
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);

            loop {
                tokio::select! {
                    // Also fires on sender drop, which counts as a stop
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        match camera.fetch_frame().await {
                            Ok(frame) => {
                                let path = task_dir.join(format!("frame-{frames:06}.jpg"));
                                tokio::fs::write(&path, frame).await?;
                                frames += 1;
                            }
                            Err(e) => tracing::warn!(error = %e, "frame fetch failed"),
                        }
                    }
                }
            }

            tracing::info!(frames, dir = %task_dir.display(), "recording stopped");
            Ok(frames)
        });

        RecordingHandle {
            stop: stop_tx,
            task,
            dir,
        }
    }
}
