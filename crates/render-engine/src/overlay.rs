//! Live overlay rendering.
//!
//! Produces an ordered list of [`DrawCommand`]s for a single frame. The
//! host paints them onto a transparent layer sized to the video, in video
//! pixel space, so no coordinate conversion happens here.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use swingtrace_common::clock::FrameIndex;
use swingtrace_common::config::PathOrder;
use swingtrace_project_model::point::{sorted_by_frame, TracerPoint};
use swingtrace_project_model::session::EditingSession;
use swingtrace_project_model::style::{HexColor, TracerStyle};

pub const SELECTED_COLOR: HexColor = HexColor::rgb(0x21, 0x96, 0xf3);
pub const CURRENT_FRAME_COLOR: HexColor = HexColor::rgb(0x4c, 0xaf, 0x50);
const WHITE: HexColor = HexColor::rgb(0xff, 0xff, 0xff);
const BLACK: HexColor = HexColor::rgb(0x00, 0x00, 0x00);

const SELECTED_RADIUS: f64 = 8.0;
const POINT_RADIUS: f64 = 6.0;
const LABEL_OFFSET_X: f64 = 10.0;
const LABEL_OFFSET_Y: f64 = -10.0;
const LABEL_FONT_PX: f64 = 12.0;

/// Pixel dimensions of the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: HexColor,
    pub width: f64,
    pub opacity: f64,
    /// Dash pattern; empty means continuous.
    pub dash: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fill {
    pub color: HexColor,
    pub opacity: f64,
}

/// One painting step, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Wipe the whole surface to transparent.
    Clear { width: u32, height: u32 },
    /// Open path through `points` with round caps and joins.
    Polyline { points: Vec<(f64, f64)>, stroke: Stroke },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: Fill,
        stroke: Option<Stroke>,
    },
    /// Outlined text anchored at its baseline start.
    Label {
        text: String,
        x: f64,
        y: f64,
        font_px: f64,
        fill: Fill,
        outline: Stroke,
    },
}

/// How a point is highlighted in the editor. Earlier variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointHighlight {
    Selected,
    CurrentFrame,
    Default,
}

impl PointHighlight {
    pub fn of(
        index: usize,
        point: &TracerPoint,
        selected: Option<usize>,
        current_frame: FrameIndex,
    ) -> Self {
        if selected == Some(index) {
            PointHighlight::Selected
        } else if point.frame == current_frame {
            PointHighlight::CurrentFrame
        } else {
            PointHighlight::Default
        }
    }

    fn radius(self) -> f64 {
        match self {
            PointHighlight::Selected => SELECTED_RADIUS,
            _ => POINT_RADIUS,
        }
    }

    fn fill(self) -> Fill {
        match self {
            PointHighlight::Selected => Fill {
                color: SELECTED_COLOR,
                opacity: 1.0,
            },
            PointHighlight::CurrentFrame => Fill {
                color: CURRENT_FRAME_COLOR,
                opacity: 1.0,
            },
            PointHighlight::Default => Fill {
                color: WHITE,
                opacity: 0.7,
            },
        }
    }

    fn outline(self) -> Stroke {
        let (color, width) = match self {
            PointHighlight::Default => (BLACK, 1.0),
            _ => (WHITE, 2.0),
        };
        Stroke {
            color,
            width,
            opacity: 1.0,
            dash: Vec::new(),
        }
    }

    fn is_labelled(self) -> bool {
        !matches!(self, PointHighlight::Default)
    }
}

/// Points in the order they are joined into a path.
pub fn ordered_points(points: &[TracerPoint], order: PathOrder) -> Vec<TracerPoint> {
    match order {
        PathOrder::Frame => sorted_by_frame(points),
        PathOrder::Insertion => points.to_vec(),
    }
}

/// The tracer as the viewer sees it at `current_frame`: every point whose
/// frame has been reached, joined into a path and dotted with markers.
pub fn render_playback(
    points: &[TracerPoint],
    current_frame: FrameIndex,
    style: &TracerStyle,
    order: PathOrder,
    canvas: CanvasSize,
) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        width: canvas.width,
        height: canvas.height,
    }];

    let visible: Vec<TracerPoint> = ordered_points(points, order)
        .into_iter()
        .filter(|p| p.is_visible_at(current_frame))
        .collect();

    if visible.len() >= 2 {
        commands.push(DrawCommand::Polyline {
            points: visible.iter().map(|p| (p.x, p.y)).collect(),
            stroke: Stroke {
                color: style.color,
                width: style.width,
                opacity: style.opacity,
                dash: style.line_style.dash_pattern().to_vec(),
            },
        });
    }

    let marker_fill = Fill {
        color: style.color,
        opacity: style.opacity,
    };
    commands.extend(visible.iter().map(|p| DrawCommand::Circle {
        cx: p.x,
        cy: p.y,
        radius: style.marker_radius(),
        fill: marker_fill,
        stroke: None,
    }));

    commands
}

/// Edit handles for every point regardless of visibility, with frame
/// labels on the selected point and on points at the current frame.
pub fn render_editor(
    points: &[TracerPoint],
    current_frame: FrameIndex,
    selected: Option<usize>,
    canvas: CanvasSize,
) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        width: canvas.width,
        height: canvas.height,
    }];

    for (index, point) in points.iter().enumerate() {
        let highlight = PointHighlight::of(index, point, selected, current_frame);
        commands.push(DrawCommand::Circle {
            cx: point.x,
            cy: point.y,
            radius: highlight.radius(),
            fill: highlight.fill(),
            stroke: Some(highlight.outline()),
        });

        if highlight.is_labelled() {
            commands.push(DrawCommand::Label {
                text: format!("Frame: {}", point.frame),
                x: point.x + LABEL_OFFSET_X,
                y: point.y + LABEL_OFFSET_Y,
                font_px: LABEL_FONT_PX,
                fill: Fill {
                    color: WHITE,
                    opacity: 1.0,
                },
                outline: Stroke {
                    color: BLACK,
                    width: 3.0,
                    opacity: 1.0,
                    dash: Vec::new(),
                },
            });
        }
    }

    commands
}

/// Which of the two overlays a renderer paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLayer {
    Playback,
    Editor,
}

/// Repaint flag shared with a session listener.
#[derive(Debug, Clone, Default)]
pub struct RepaintFlag(Rc<Cell<bool>>);

impl RepaintFlag {
    pub fn mark(&self) {
        self.0.set(true);
    }

    /// Read and clear the flag.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Repaints one overlay layer whenever the session reports a change.
#[derive(Debug)]
pub struct OverlayRenderer {
    layer: OverlayLayer,
    dirty: RepaintFlag,
}

impl OverlayRenderer {
    /// Create a renderer and subscribe it to `session`. The first call to
    /// [`OverlayRenderer::render_if_dirty`] always paints.
    pub fn attach(layer: OverlayLayer, session: &mut EditingSession) -> Self {
        let dirty = RepaintFlag::default();
        dirty.mark();
        let listener_flag = dirty.clone();
        session.subscribe(Box::new(move |_event| listener_flag.mark()));
        Self { layer, dirty }
    }

    pub fn layer(&self) -> OverlayLayer {
        self.layer
    }

    /// Draw the current state unconditionally.
    ///
    /// Without media there is nothing to paint on and no commands are
    /// produced. The editor layer only clears while editing is off.
    pub fn render(&self, session: &EditingSession) -> Vec<DrawCommand> {
        let Some(media) = session.media() else {
            return Vec::new();
        };
        let canvas = CanvasSize::new(media.width, media.height);

        match self.layer {
            OverlayLayer::Playback => render_playback(
                session.points(),
                session.current_frame(),
                session.style(),
                session.playback().path_order,
                canvas,
            ),
            OverlayLayer::Editor if session.is_editing() => render_editor(
                session.points(),
                session.current_frame(),
                session.selected(),
                canvas,
            ),
            OverlayLayer::Editor => vec![DrawCommand::Clear {
                width: canvas.width,
                height: canvas.height,
            }],
        }
    }

    /// Draw only if something changed since the last paint.
    pub fn render_if_dirty(&self, session: &EditingSession) -> Option<Vec<DrawCommand>> {
        if self.dirty.take() {
            Some(self.render(session))
        } else {
            None
        }
    }
}
