//! Export session lifecycle against scripted backends.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use swingtrace_common::config::{ExportDefaults, PathOrder};
use swingtrace_common::error::{TracerError, TracerResult};
use swingtrace_project_model::point::TracerPoint;
use swingtrace_project_model::style::TracerStyle;
use swingtrace_render_engine::{
    partial_output_path, project_overlay, CancelHandle, CanvasSize, ExportProgress, ExportSession,
    ExportStage, ProgressCallback, RenderBackend, RenderRequest,
};

enum Script {
    Succeed,
    Fail,
    CancelMidway,
    /// Keep rendering until cancelled, then flag that the cancel was seen.
    WaitForCancel(Arc<AtomicBool>),
}

struct ScriptedBackend {
    script: Script,
    seen_overlay: Arc<Mutex<Option<String>>>,
}

impl RenderBackend for ScriptedBackend {
    fn render(
        &mut self,
        request: &RenderRequest,
        progress: Option<&ProgressCallback>,
        cancel: &CancelHandle,
    ) -> TracerResult<()> {
        *self.seen_overlay.lock().unwrap() = std::fs::read_to_string(&request.overlay_path).ok();
        std::fs::write(&request.output_path, b"partial frames")?;
        if let Some(cb) = progress {
            cb(ExportProgress {
                percent: 50,
                eta_secs: 1.0,
                stage: ExportStage::Rendering,
            });
        }
        match self.script {
            Script::Succeed => Ok(()),
            Script::Fail => Err(TracerError::export("encoder exploded")),
            Script::CancelMidway => {
                cancel.cancel();
                Err(TracerError::export("ffmpeg killed"))
            }
            Script::WaitForCancel(ref saw_cancel) => {
                let deadline = Instant::now() + Duration::from_secs(5);
                while !cancel.is_cancelled() && Instant::now() < deadline {
                    std::thread::sleep(Duration::from_millis(10));
                }
                saw_cancel.store(cancel.is_cancelled(), Ordering::SeqCst);
                Err(TracerError::export("ffmpeg killed"))
            }
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn workspace(name: &str) -> (PathBuf, PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("swingtrace_export_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let source = dir.join("swing.mp4");
    std::fs::write(&source, b"not really a video").unwrap();
    let output = dir.join("out").join("traced_golf_swing.mp4");
    (dir, source, output)
}

fn session(script: Script) -> (ExportSession, Arc<Mutex<Option<String>>>) {
    let seen = Arc::new(Mutex::new(None));
    let backend = ScriptedBackend {
        script,
        seen_overlay: Arc::clone(&seen),
    };
    (
        ExportSession::with_backend(ExportDefaults::default(), Box::new(backend)),
        seen,
    )
}

fn overlay() -> swingtrace_render_engine::OverlayDescription {
    let points = vec![
        TracerPoint::new(0, 100.0, 200.0),
        TracerPoint::new(3, 130.0, 198.0),
    ];
    project_overlay(
        &points,
        &TracerStyle::default(),
        CanvasSize::new(640, 360),
        PathOrder::Frame,
    )
    .unwrap()
}

fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<ExportStage>>>) {
    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stages);
    let cb: ProgressCallback = Box::new(move |p: ExportProgress| sink.lock().unwrap().push(p.stage));
    (cb, stages)
}

#[tokio::test]
async fn test_successful_export_renames_partial_output() {
    let (dir, source, output) = workspace("success");
    let (mut session, seen) = session(Script::Succeed);
    let (cb, stages) = recorder();

    let job = session.job(&source, &output, overlay(), Some(2.0));
    let written = session.run(job, Some(cb)).await.unwrap();

    assert_eq!(written, output);
    assert_eq!(std::fs::read(&output).unwrap(), b"partial frames");
    assert!(!partial_output_path(&output).exists());
    assert!(seen.lock().unwrap().as_deref().unwrap().contains("<path"));
    assert_eq!(
        *stages.lock().unwrap(),
        vec![
            ExportStage::Preparing,
            ExportStage::Rendering,
            ExportStage::Finalizing,
            ExportStage::Complete
        ]
    );

    let scratch = session.scratch_dir().unwrap().to_path_buf();
    assert!(scratch.exists());
    session.close().unwrap();
    assert!(!scratch.exists());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_failed_export_leaves_no_output() {
    let (dir, source, output) = workspace("failure");
    let (mut session, _) = session(Script::Fail);

    let job = session.job(&source, &output, overlay(), Some(2.0));
    let err = session.run(job, None).await.unwrap_err();

    assert!(matches!(err, TracerError::Export { .. }));
    assert!(!output.exists());
    assert!(!partial_output_path(&output).exists());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_cancelled_export_removes_partial_output() {
    let (dir, source, output) = workspace("cancel");
    let (mut session, _) = session(Script::CancelMidway);
    let (cb, stages) = recorder();

    let job = session.job(&source, &output, overlay(), Some(2.0));
    let err = session.run(job, Some(cb)).await.unwrap_err();

    assert!(matches!(err, TracerError::ExportCancelled));
    assert!(!output.exists());
    assert!(!partial_output_path(&output).exists());
    assert_eq!(stages.lock().unwrap().last(), Some(&ExportStage::Cancelled));

    // Cancellation sticks to the session.
    let again = session.job(&source, &output, overlay(), Some(2.0));
    assert!(matches!(
        session.run(again, None).await,
        Err(TracerError::ExportCancelled)
    ));

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_missing_source_is_reported() {
    let (dir, _, output) = workspace("missing");
    let (mut session, _) = session(Script::Succeed);

    let job = session.job(dir.join("nope.mp4"), &output, overlay(), None);
    let err = session.run(job, None).await.unwrap_err();
    assert!(matches!(err, TracerError::FileNotFound { .. }));

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_drop_removes_scratch_dir() {
    let (dir, source, output) = workspace("drop");
    let scratch = {
        let (mut session, _) = session(Script::Succeed);
        let job = session.job(&source, &output, overlay(), None);
        session.run(job, None).await.unwrap();
        session.scratch_dir().unwrap().to_path_buf()
    };
    assert!(!scratch.exists());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_abandoned_export_cancels_render_and_removes_partial() {
    let (dir, source, output) = workspace("abandon");
    let saw_cancel = Arc::new(AtomicBool::new(false));
    let (mut session, _) = session(Script::WaitForCancel(Arc::clone(&saw_cancel)));
    let cancel = session.cancel_handle();

    let job = session.job(&source, &output, overlay(), Some(2.0));
    let timed_out = tokio::time::timeout(Duration::from_millis(100), session.run(job, None)).await;
    assert!(timed_out.is_err());
    assert!(cancel.is_cancelled());

    // The blocking render notices the cancel on its own thread.
    let deadline = Instant::now() + Duration::from_secs(2);
    while !saw_cancel.load(Ordering::SeqCst) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(saw_cancel.load(Ordering::SeqCst));

    let partial = partial_output_path(&output);
    let deadline = Instant::now() + Duration::from_secs(2);
    while partial.exists() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!partial.exists());
    assert!(!output.exists());

    drop(session);
    std::fs::remove_dir_all(dir).unwrap();
}
