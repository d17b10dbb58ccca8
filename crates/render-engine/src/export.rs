//! Export configuration and job management.
//!
//! An [`ExportSession`] composites the projected SVG overlay onto the
//! source video with ffmpeg. Rendering runs on tokio's blocking pool and
//! writes to a partial file that is renamed into place only on success.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use swingtrace_common::config::ExportDefaults;
use swingtrace_common::error::{TracerError, TracerResult};

use crate::projector::OverlayDescription;

const OVERLAY_FILE_NAME: &str = "overlay.svg";
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);
const STALL_WARNING_SECS: u64 = 10;

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// x264 encoder knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    pub preset: String,
    pub crf: u32,
}

impl From<&ExportDefaults> for EncoderSettings {
    fn from(defaults: &ExportDefaults) -> Self {
        Self {
            preset: defaults.preset.clone(),
            crf: defaults.crf,
        }
    }
}

/// An export job ready to be rendered.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Original video.
    pub source_path: PathBuf,

    /// Final output file path.
    pub output_path: PathBuf,

    /// Tracer overlay sized to the source.
    pub overlay: OverlayDescription,

    /// Source duration, used to turn ffmpeg's output time into a percentage.
    pub duration_secs: Option<f64>,

    pub encoder: EncoderSettings,
}

/// What a backend is asked to produce. Paths are already resolved to the
/// scratch overlay and the partial output.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source_path: PathBuf,
    pub overlay_path: PathBuf,
    pub output_path: PathBuf,
    pub encoder: EncoderSettings,
    pub duration_secs: Option<f64>,
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    /// Whole percent, 0 to 100.
    pub percent: u8,

    /// Estimated time remaining in seconds.
    pub eta_secs: f64,

    pub stage: ExportStage,
}

impl ExportProgress {
    fn at(stage: ExportStage, percent: u8) -> Self {
        Self {
            percent,
            eta_secs: 0.0,
            stage,
        }
    }
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Rendering,
    Finalizing,
    Complete,
    Failed,
    Cancelled,
}

/// Cooperative cancellation shared between the caller and a running export.
///
/// Cancellation is sticky: once set, every later run on the same session
/// ends immediately with [`TracerError::ExportCancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Trait for render backends.
pub trait RenderBackend: Send {
    /// Render `request`, polling `cancel` while work is in flight.
    fn render(
        &mut self,
        request: &RenderRequest,
        progress: Option<&ProgressCallback>,
        cancel: &CancelHandle,
    ) -> TracerResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Owns the render backend and a scratch directory for one or more
/// exports. The backend is created on first use; the scratch directory is
/// removed by [`ExportSession::close`] or on drop.
pub struct ExportSession {
    defaults: ExportDefaults,
    backend: Option<Box<dyn RenderBackend>>,
    scratch_dir: Option<PathBuf>,
    cancel: CancelHandle,
}

impl ExportSession {
    pub fn new(defaults: ExportDefaults) -> Self {
        Self {
            defaults,
            backend: None,
            scratch_dir: None,
            cancel: CancelHandle::default(),
        }
    }

    /// Use a specific backend instead of ffmpeg.
    pub fn with_backend(defaults: ExportDefaults, backend: Box<dyn RenderBackend>) -> Self {
        let mut session = Self::new(defaults);
        session.backend = Some(backend);
        session
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn defaults(&self) -> &ExportDefaults {
        &self.defaults
    }

    /// Scratch directory, if one has been created.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch_dir.as_deref()
    }

    /// Build a job from this session's encoder defaults.
    pub fn job(
        &self,
        source_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        overlay: OverlayDescription,
        duration_secs: Option<f64>,
    ) -> ExportJob {
        ExportJob {
            source_path: source_path.into(),
            output_path: output_path.into(),
            overlay,
            duration_secs,
            encoder: EncoderSettings::from(&self.defaults),
        }
    }

    fn take_backend(&mut self) -> TracerResult<Box<dyn RenderBackend>> {
        if let Some(backend) = self.backend.take() {
            return Ok(backend);
        }

        let backend = FfmpegBackend::new(&self.defaults.ffmpeg_binary);
        if !backend.is_available() {
            return Err(TracerError::unsupported(format!(
                "No supported render backend found (expected {} in PATH)",
                self.defaults.ffmpeg_binary
            )));
        }
        Ok(Box::new(backend))
    }

    fn ensure_scratch_dir(&mut self) -> TracerResult<PathBuf> {
        if let Some(dir) = &self.scratch_dir {
            return Ok(dir.clone());
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "swingtrace-export-{}-{}-{}",
            std::process::id(),
            nanos,
            SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Created export scratch directory");
        self.scratch_dir = Some(dir.clone());
        Ok(dir)
    }

    /// Render `job`, returning the final output path.
    pub async fn run(
        &mut self,
        job: ExportJob,
        progress: Option<ProgressCallback>,
    ) -> TracerResult<PathBuf> {
        tracing::info!(
            source = %job.source_path.display(),
            output = %job.output_path.display(),
            preset = %job.encoder.preset,
            crf = job.encoder.crf,
            "Starting export"
        );

        if self.cancel.is_cancelled() {
            return Err(TracerError::ExportCancelled);
        }

        if !job.source_path.exists() {
            return Err(TracerError::FileNotFound {
                path: job.source_path.clone(),
            });
        }

        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if let Some(cb) = &progress {
            cb(ExportProgress::at(ExportStage::Preparing, 0));
        }

        let scratch = self.ensure_scratch_dir()?;
        let overlay_path = scratch.join(OVERLAY_FILE_NAME);
        std::fs::write(&overlay_path, job.overlay.to_svg())?;

        let partial_path = partial_output_path(&job.output_path);
        let request = RenderRequest {
            source_path: job.source_path.clone(),
            overlay_path,
            output_path: partial_path.clone(),
            encoder: job.encoder.clone(),
            duration_secs: job.duration_secs,
        };

        let mut backend = self.take_backend()?;
        tracing::info!(backend = backend.name(), "Using render backend");

        let cancel = self.cancel.clone();
        let started = Instant::now();
        // If this future is dropped mid-render, stop ffmpeg and discard the
        // partial file; the blocking task cleans up again once it returns.
        let guard = AbandonGuard::new(self.cancel.clone(), partial_path.clone());
        let joined = tokio::task::spawn_blocking(move || {
            let mut result = backend.render(&request, progress.as_ref(), &cancel);
            if result.is_ok() && cancel.is_cancelled() {
                result = Err(TracerError::ExportCancelled);
            }
            if result.is_err() {
                remove_if_exists(&request.output_path);
            }
            (backend, progress, result)
        })
        .await;
        guard.disarm();

        let (backend, progress, result) = match joined {
            Ok(parts) => parts,
            Err(err) => {
                remove_if_exists(&partial_path);
                return Err(TracerError::export(format!("Render task failed: {err}")));
            }
        };
        self.backend = Some(backend);

        if let Err(err) = result {
            remove_if_exists(&partial_path);
            let (stage, err) = if self.cancel.is_cancelled() {
                tracing::info!("Export cancelled; partial output removed");
                (ExportStage::Cancelled, TracerError::ExportCancelled)
            } else {
                tracing::error!(error = %err, "Export failed");
                (ExportStage::Failed, err)
            };
            if let Some(cb) = &progress {
                cb(ExportProgress::at(stage, 0));
            }
            return Err(err);
        }

        if let Some(cb) = &progress {
            cb(ExportProgress::at(ExportStage::Finalizing, 100));
        }
        if let Err(err) = std::fs::rename(&partial_path, &job.output_path) {
            remove_if_exists(&partial_path);
            return Err(err.into());
        }
        if let Some(cb) = &progress {
            cb(ExportProgress::at(ExportStage::Complete, 100));
        }

        tracing::info!(
            output = %job.output_path.display(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Export finished"
        );
        Ok(job.output_path)
    }

    /// Release the backend and remove the scratch directory.
    pub fn close(mut self) -> TracerResult<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> TracerResult<()> {
        self.backend = None;
        if let Some(dir) = self.scratch_dir.take() {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => tracing::debug!(dir = %dir.display(), "Removed export scratch directory"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

impl Drop for ExportSession {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            tracing::warn!(error = %err, "Failed to clean up export scratch directory");
        }
    }
}

impl std::fmt::Debug for ExportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportSession")
            .field("defaults", &self.defaults)
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .field("scratch_dir", &self.scratch_dir)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// `out.mp4` becomes `out.partial.mp4`, keeping the extension so ffmpeg
/// still picks the right muxer.
pub fn partial_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{stem}.partial.{}", ext.to_string_lossy()),
        None => format!("{stem}.partial"),
    };
    output.with_file_name(name)
}

/// Armed while a render is in flight. Dropping it armed cancels the
/// render and removes the partial output.
struct AbandonGuard {
    cancel: CancelHandle,
    partial_path: PathBuf,
    armed: bool,
}

impl AbandonGuard {
    fn new(cancel: CancelHandle, partial_path: PathBuf) -> Self {
        Self {
            cancel,
            partial_path,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if self.armed {
            tracing::info!("Export abandoned; cancelling render");
            self.cancel.cancel();
            remove_if_exists(&self.partial_path);
        }
    }
}

fn remove_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed partial output"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(error = %err, path = %path.display(), "Failed to remove partial output"),
    }
}

/// ffmpeg arguments that burn the overlay into the source.
pub fn build_ffmpeg_args(request: &RenderRequest) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostats".to_string(),
        "-i".to_string(),
        request.source_path.to_string_lossy().into_owned(),
        "-i".to_string(),
        request.overlay_path.to_string_lossy().into_owned(),
        "-filter_complex".to_string(),
        "[0:v][1:v]overlay=0:0".to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        request.encoder.preset.clone(),
        "-crf".to_string(),
        request.encoder.crf.to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
        request.output_path.to_string_lossy().into_owned(),
    ]
}

pub struct FfmpegBackend {
    binary: String,
}

impl FfmpegBackend {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run_ffmpeg(
        &self,
        request: &RenderRequest,
        progress: Option<&ProgressCallback>,
        cancel: &CancelHandle,
    ) -> TracerResult<()> {
        let args = build_ffmpeg_args(request);
        tracing::debug!(args = ?args, "Running ffmpeg");
        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| TracerError::export(format!("Failed to start ffmpeg: {e}")))?;

        tracing::info!(pid = child.id(), "ffmpeg process started");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TracerError::export("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TracerError::export("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently to avoid ffmpeg blocking on a full stderr pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let child = Arc::new(Mutex::new(child));
        let finished = Arc::new(AtomicBool::new(false));
        let watcher = spawn_cancel_watcher(Arc::clone(&child), cancel.clone(), Arc::clone(&finished));

        let read_result = read_progress(stdout, request.duration_secs, progress, start);

        let status = child
            .lock()
            .map_err(|_| TracerError::export("ffmpeg process handle poisoned"))
            .and_then(|mut child| {
                child
                    .wait()
                    .map_err(|e| TracerError::export(format!("Failed to wait on ffmpeg: {e}")))
            });
        finished.store(true, Ordering::SeqCst);
        let _ = watcher.join();

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if cancel.is_cancelled() {
            return Err(TracerError::ExportCancelled);
        }
        read_result?;
        let status = status?;

        if !status.success() {
            return Err(TracerError::export(format!(
                "ffmpeg export failed (status {}): {}",
                status,
                stderr_output.trim()
            )));
        }

        Ok(())
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(
        &mut self,
        request: &RenderRequest,
        progress: Option<&ProgressCallback>,
        cancel: &CancelHandle,
    ) -> TracerResult<()> {
        if let Some(cb) = progress {
            cb(ExportProgress::at(ExportStage::Rendering, 0));
        }
        self.run_ffmpeg(request, progress, cancel)
    }

    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Kill the child as soon as `cancel` is set; exit once `finished` is.
fn spawn_cancel_watcher(
    child: Arc<Mutex<Child>>,
    cancel: CancelHandle,
    finished: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !finished.load(Ordering::SeqCst) {
            if cancel.is_cancelled() {
                if let Ok(mut child) = child.lock() {
                    if let Err(err) = child.kill() {
                        tracing::debug!(error = %err, "ffmpeg already exited");
                    } else {
                        tracing::info!("Killed ffmpeg after cancellation");
                    }
                }
                return;
            }
            std::thread::sleep(CANCEL_POLL_INTERVAL);
        }
    })
}

fn read_progress(
    stdout: impl Read,
    duration_secs: Option<f64>,
    progress: Option<&ProgressCallback>,
    start: Instant,
) -> TracerResult<()> {
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();

    let mut latest_progress = ProgressState::default();
    let mut last_progress_secs = 0.0f64;
    let mut last_progress_wall = Instant::now();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|e| TracerError::export(format!("Failed reading ffmpeg progress: {e}")))?;
        if bytes == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            latest_progress.update(key, value);
            if key == "progress" {
                let advanced = latest_progress.out_time_secs > last_progress_secs + 0.001;
                if advanced {
                    last_progress_secs = latest_progress.out_time_secs;
                    last_progress_wall = Instant::now();
                }
                if let Some(cb) = progress {
                    cb(progress_report(
                        &latest_progress,
                        duration_secs.unwrap_or(0.0),
                        start.elapsed().as_secs_f64(),
                    ));
                }
                if last_progress_wall.elapsed().as_secs() >= STALL_WARNING_SECS {
                    tracing::warn!(
                        out_time_secs = latest_progress.out_time_secs,
                        elapsed_secs = start.elapsed().as_secs_f64(),
                        "No ffmpeg progress advancement for 10s"
                    );
                    last_progress_wall = Instant::now();
                }
            }
        }
    }
    Ok(())
}

/// Whether `binary` resolves on `PATH` (or as a path).
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // ffmpeg reports microseconds under both keys.
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }
}

fn progress_report(
    state: &ProgressState,
    expected_duration_secs: f64,
    elapsed_secs: f64,
) -> ExportProgress {
    let fraction = if state.complete {
        1.0
    } else if expected_duration_secs <= 0.0 {
        0.0
    } else {
        (state.out_time_secs / expected_duration_secs).clamp(0.0, 1.0)
    };

    let eta_secs = if fraction > 0.0 {
        (elapsed_secs / fraction) - elapsed_secs
    } else {
        0.0
    }
    .max(0.0);

    ExportProgress {
        percent: (fraction * 100.0).round() as u8,
        eta_secs,
        stage: if state.complete {
            ExportStage::Finalizing
        } else {
            ExportStage::Rendering
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RenderRequest {
        RenderRequest {
            source_path: PathBuf::from("/videos/swing.mp4"),
            overlay_path: PathBuf::from("/tmp/work/overlay.svg"),
            output_path: PathBuf::from("/out/traced.partial.mp4"),
            encoder: EncoderSettings {
                preset: "medium".to_string(),
                crf: 23,
            },
            duration_secs: Some(4.0),
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_ffmpeg_args_composite_overlay() {
        let args = build_ffmpeg_args(&request());
        let inputs: Vec<&str> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-i")
            .map(|(i, _)| args[i + 1].as_str())
            .collect();
        assert_eq!(inputs, vec!["/videos/swing.mp4", "/tmp/work/overlay.svg"]);
        assert_eq!(
            value_after(&args, "-filter_complex"),
            Some("[0:v][1:v]overlay=0:0")
        );
        assert_eq!(value_after(&args, "-c:a"), Some("copy"));
        assert_eq!(value_after(&args, "-c:v"), Some("libx264"));
        assert_eq!(value_after(&args, "-preset"), Some("medium"));
        assert_eq!(value_after(&args, "-crf"), Some("23"));
        assert_eq!(value_after(&args, "-progress"), Some("pipe:1"));
        assert_eq!(args.last().map(String::as_str), Some("/out/traced.partial.mp4"));
    }

    #[test]
    fn test_partial_output_path() {
        assert_eq!(
            partial_output_path(Path::new("/out/traced_golf_swing.mp4")),
            PathBuf::from("/out/traced_golf_swing.partial.mp4")
        );
        assert_eq!(
            partial_output_path(Path::new("clip")),
            PathBuf::from("clip.partial")
        );
    }

    #[test]
    fn test_progress_state_parses_microseconds() {
        let mut state = ProgressState::default();
        state.update("out_time_us", "2000000");
        assert_eq!(state.out_time_secs, 2.0);
        state.update("out_time_ms", "3000000");
        assert_eq!(state.out_time_secs, 3.0);
        state.update("progress", "continue");
        assert!(!state.complete);
        state.update("progress", "end");
        assert!(state.complete);
    }

    #[test]
    fn test_progress_report_percent() {
        let state = ProgressState {
            out_time_secs: 1.0,
            complete: false,
        };
        let report = progress_report(&state, 4.0, 2.0);
        assert_eq!(report.percent, 25);
        assert_eq!(report.stage, ExportStage::Rendering);
        assert!((report.eta_secs - 6.0).abs() < 1e-9);

        let overrun = ProgressState {
            out_time_secs: 9.0,
            complete: false,
        };
        assert_eq!(progress_report(&overrun, 4.0, 1.0).percent, 100);
    }

    #[test]
    fn test_progress_report_unknown_duration() {
        let state = ProgressState {
            out_time_secs: 1.0,
            complete: false,
        };
        assert_eq!(progress_report(&state, 0.0, 1.0).percent, 0);

        let done = ProgressState {
            out_time_secs: 1.0,
            complete: true,
        };
        let report = progress_report(&done, 0.0, 1.0);
        assert_eq!(report.percent, 100);
        assert_eq!(report.stage, ExportStage::Finalizing);
    }

    #[test]
    fn test_read_progress_reports_each_block() {
        let raw = "frame=10\nout_time_us=1000000\nprogress=continue\nout_time_us=2000000\nprogress=end\n";
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb: ProgressCallback = Box::new(move |p| sink.lock().unwrap().push(p.percent));

        read_progress(raw.as_bytes(), Some(2.0), Some(&cb), Instant::now()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![50, 100]);
    }

    #[test]
    fn test_cancel_handle_is_shared() {
        let handle = CancelHandle::default();
        let clone = handle.clone();
        assert!(!handle.is_cancelled());
        clone.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        assert!(!FfmpegBackend::new("swingtrace-no-such-ffmpeg").is_available());
    }
}
