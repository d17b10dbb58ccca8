//! Export projector: the full tracer path as a static vector overlay.
//!
//! Unlike the live overlay there is no current frame here; every point is
//! drawn. The result is sized to the real source dimensions so ffmpeg can
//! composite it at `0:0` without scaling.

use std::fmt::Write as _;

use serde::Serialize;
use swingtrace_common::config::PathOrder;
use swingtrace_common::error::{TracerError, TracerResult};
use swingtrace_project_model::point::TracerPoint;
use swingtrace_project_model::style::TracerStyle;

use crate::overlay::{ordered_points, CanvasSize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

/// Vector description of the baked-in tracer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayDescription {
    pub width: u32,
    pub height: u32,
    pub style: TracerStyle,
    /// Empty when fewer than two points exist.
    pub path: Vec<PathCommand>,
    pub markers: Vec<Marker>,
}

/// Build the overlay for `points` on a `canvas`-sized video.
pub fn project_overlay(
    points: &[TracerPoint],
    style: &TracerStyle,
    canvas: CanvasSize,
    order: PathOrder,
) -> TracerResult<OverlayDescription> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(TracerError::export(format!(
            "Invalid overlay dimensions {}x{}",
            canvas.width, canvas.height
        )));
    }
    style.validate()?;

    let ordered = ordered_points(points, order);

    let path = if ordered.len() >= 2 {
        ordered
            .iter()
            .enumerate()
            .map(|(i, p)| match i {
                0 => PathCommand::MoveTo { x: p.x, y: p.y },
                _ => PathCommand::LineTo { x: p.x, y: p.y },
            })
            .collect()
    } else {
        Vec::new()
    };

    let markers = ordered
        .iter()
        .map(|p| Marker {
            cx: p.x,
            cy: p.y,
            radius: style.marker_radius(),
        })
        .collect();

    Ok(OverlayDescription {
        width: canvas.width,
        height: canvas.height,
        style: *style,
        path,
        markers,
    })
}

impl OverlayDescription {
    /// SVG path data, e.g. `M 100 200 L 130 198`.
    pub fn path_data(&self) -> String {
        self.path
            .iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo { x, y } => format!("M {} {}", fmt_num(*x), fmt_num(*y)),
                PathCommand::LineTo { x, y } => format!("L {} {}", fmt_num(*x), fmt_num(*y)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.markers.is_empty()
    }

    /// Standalone SVG document with a transparent background.
    pub fn to_svg(&self) -> String {
        let color = self.style.color.to_string();
        let opacity = fmt_num(self.style.opacity);

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if !self.path.is_empty() {
            let dash = self.style.line_style.dash_pattern();
            let dash_attr = if dash.is_empty() {
                String::new()
            } else {
                let pattern: Vec<String> = dash.iter().map(|d| fmt_num(*d)).collect();
                format!(r#" stroke-dasharray="{}""#, pattern.join(","))
            };
            let _ = writeln!(
                svg,
                r#"  <path d="{d}" fill="none" stroke="{color}" stroke-width="{width}" stroke-opacity="{opacity}" stroke-linecap="round" stroke-linejoin="round"{dash_attr}/>"#,
                d = self.path_data(),
                width = fmt_num(self.style.width),
            );
        }

        for marker in &self.markers {
            let _ = writeln!(
                svg,
                r#"  <circle cx="{}" cy="{}" r="{}" fill="{color}" fill-opacity="{opacity}"/>"#,
                fmt_num(marker.cx),
                fmt_num(marker.cy),
                fmt_num(marker.radius),
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Compact decimal rendering: at most three fractional digits, no
/// trailing zeros.
fn fmt_num(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
