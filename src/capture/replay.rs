//! Recorded-frame sensor driver
//!
//! Plays back frames from a JSON-lines file on a dedicated producer thread,
//! the same way a sensor SDK raises its frame event from its own thread.
//! Each line holds one frame, or `null` for a frame that could not be acquired.

use crate::capture::events::{FrameEvent, FrameHandler, SubscriptionId};
use crate::tracking::{TrackingError, TrackingResult};
use parking_lot::Mutex as ParkingMutex;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default frame interval, roughly the 30 Hz both sensor generations stream at
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(33_333);

#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    pub frame_interval: Duration,
    /// Restart from the first frame after the last one
    pub looping: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            looping: false,
        }
    }
}

/// Parse a JSON-lines recording. Blank lines are skipped.
pub fn parse_frames<F: DeserializeOwned>(content: &str) -> TrackingResult<Vec<Option<F>>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Option<F>>(line).map_err(|source| TrackingError::ReplayError {
                line: index + 1,
                source,
            })
        })
        .collect()
}

pub fn load_frames<F: DeserializeOwned>(path: &Path) -> TrackingResult<Vec<Option<F>>> {
    let content = std::fs::read_to_string(path)?;
    let frames = parse_frames(&content)?;
    tracing::debug!("Loaded {} recorded frames from {:?}", frames.len(), path);
    Ok(frames)
}

/// Sensor that streams a fixed list of frames
pub struct ReplaySensor<F> {
    name: String,
    frames: Arc<Vec<Option<F>>>,
    options: ReplayOptions,
    event: Arc<FrameEvent<F>>,
    is_streaming: Arc<AtomicBool>,
    thread_handle: ParkingMutex<Option<JoinHandle<()>>>,
}

impl<F: Send + Sync + 'static> ReplaySensor<F> {
    pub fn new(name: impl Into<String>, frames: Vec<Option<F>>, options: ReplayOptions) -> Self {
        Self {
            name: name.into(),
            frames: Arc::new(frames),
            options,
            event: Arc::new(FrameEvent::new()),
            is_streaming: Arc::new(AtomicBool::new(false)),
            thread_handle: ParkingMutex::new(None),
        }
    }

    pub fn from_file(name: impl Into<String>, path: &Path, options: ReplayOptions) -> TrackingResult<Self>
    where
        F: DeserializeOwned,
    {
        let frames = load_frames(path)?;
        Ok(Self::new(name, frames, options))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn subscribe(&self, handler: FrameHandler<F>) -> SubscriptionId {
        self.event.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.event.subscriber_count()
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming.load(Ordering::SeqCst)
    }

    /// Start the producer thread. Does nothing if already streaming.
    pub fn start_stream(&self) -> TrackingResult<()> {
        let mut thread_handle = self.thread_handle.lock();

        if self.is_streaming.load(Ordering::SeqCst) {
            return Ok(());
        }

        // Reap a thread that ran off the end of a non-looping recording
        if let Some(handle) = thread_handle.take() {
            let _ = handle.join();
        }

        if self.frames.is_empty() {
            return Err(TrackingError::SensorError(format!(
                "recording for {} contains no frames",
                self.name
            )));
        }

        let is_streaming = self.is_streaming.clone();
        is_streaming.store(true, Ordering::SeqCst);

        let frames = self.frames.clone();
        let event = self.event.clone();
        let options = self.options;
        let name = self.name.clone();

        let handle = std::thread::Builder::new()
            .name(format!("replay-{}", name))
            .spawn(move || {
                tracing::info!(
                    "Replay of {} started ({} frames, interval={:?}, looping={})",
                    name,
                    frames.len(),
                    options.frame_interval,
                    options.looping
                );

                let mut index = 0;
                while is_streaming.load(Ordering::Relaxed) {
                    let frame_start = Instant::now();

                    event.raise(frames[index].as_ref());

                    index += 1;
                    if index == frames.len() {
                        if !options.looping {
                            break;
                        }
                        index = 0;
                    }

                    let elapsed = frame_start.elapsed();
                    if elapsed < options.frame_interval {
                        std::thread::sleep(options.frame_interval - elapsed);
                    }
                }

                is_streaming.store(false, Ordering::SeqCst);
                tracing::info!("Replay of {} stopped", name);
            })
            .map_err(|e| {
                self.is_streaming.store(false, Ordering::SeqCst);
                TrackingError::IoError(e)
            })?;

        *thread_handle = Some(handle);
        Ok(())
    }

    /// Stop the producer thread and wait for the current frame to finish
    pub fn stop_stream(&self) {
        self.is_streaming.store(false, Ordering::SeqCst);

        if let Some(handle) = self.thread_handle.lock().take() {
            let _ = handle.join();
        }
    }
}

impl<F> Drop for ReplaySensor<F> {
    fn drop(&mut self) {
        self.is_streaming.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.get_mut().take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::AtomicUsize;

    fn wait_until_stopped<F: Send + Sync + 'static>(sensor: &ReplaySensor<F>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while sensor.is_streaming() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_parse_frames_with_gaps() {
        let frames: Vec<Option<u32>> = parse_frames("1\nnull\n\n3\n").unwrap();
        assert_eq!(frames, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_frames::<u32>("1\n\"two\"\n").unwrap_err();
        match err {
            TrackingError::ReplayError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_frames_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10").unwrap();
        writeln!(file, "20").unwrap();

        let frames: Vec<Option<u32>> = load_frames(file.path()).unwrap();
        assert_eq!(frames, vec![Some(10), Some(20)]);
    }

    #[test]
    fn test_stream_plays_every_frame_once() {
        let options = ReplayOptions {
            frame_interval: Duration::from_millis(1),
            looping: false,
        };
        let sensor = ReplaySensor::new("test", vec![Some(1u32), None, Some(2)], options);

        let raised = Arc::new(AtomicUsize::new(0));
        let missing = Arc::new(AtomicUsize::new(0));
        let raised_clone = raised.clone();
        let missing_clone = missing.clone();
        sensor.subscribe(Arc::new(move |frame: Option<&u32>| {
            raised_clone.fetch_add(1, Ordering::SeqCst);
            if frame.is_none() {
                missing_clone.fetch_add(1, Ordering::SeqCst);
            }
        }));

        sensor.start_stream().unwrap();
        wait_until_stopped(&sensor);
        sensor.stop_stream();

        assert_eq!(raised.load(Ordering::SeqCst), 3);
        assert_eq!(missing.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_recording_fails_to_start() {
        let sensor: ReplaySensor<u32> = ReplaySensor::new("empty", vec![], ReplayOptions::default());
        assert!(sensor.start_stream().is_err());
        assert!(!sensor.is_streaming());
    }

    #[test]
    fn test_stop_looping_stream() {
        let options = ReplayOptions {
            frame_interval: Duration::from_millis(1),
            looping: true,
        };
        let sensor = ReplaySensor::new("loop", vec![Some(1u32)], options);
        sensor.start_stream().unwrap();
        assert!(sensor.is_streaming());

        sensor.stop_stream();
        assert!(!sensor.is_streaming());
    }
}
