//! Update the tracer style.

use std::path::PathBuf;

use swingtrace_common::config::AppConfig;
use swingtrace_project_model::style::{HexColor, LineStyle, TracerStyle};

use super::{open_session, save_session};

pub struct StyleArgs {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub opacity: Option<f64>,
    pub line_style: Option<String>,
}

impl StyleArgs {
    fn apply(&self, mut style: TracerStyle) -> anyhow::Result<TracerStyle> {
        if let Some(color) = &self.color {
            style.color = HexColor::parse(color)?;
        }
        if let Some(width) = self.width {
            style.width = width;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity;
        }
        if let Some(line_style) = &self.line_style {
            style.line_style = line_style.parse::<LineStyle>()?;
        }
        Ok(style)
    }
}

pub fn run(path: PathBuf, args: StyleArgs, config: &AppConfig) -> anyhow::Result<()> {
    let (mut loaded, mut session) = open_session(&path, config)?;

    let requested = args.apply(*session.style())?;
    let style = requested.clamped();
    if style != requested {
        println!(
            "Note: width and opacity were clamped to {} and {}",
            style.width, style.opacity
        );
    }
    session.set_style(style)?;
    save_session(&mut loaded, &session)?;

    let style = session.style();
    println!("Style updated:");
    println!("  Color: {}", style.color);
    println!("  Width: {}", style.width);
    println!("  Opacity: {}", style.opacity);
    println!("  Line: {}", style.line_style.as_str());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_then_clamp_keeps_values_in_range() {
        let args = StyleArgs {
            color: Some("#00ff00".to_string()),
            width: Some(25.0),
            opacity: Some(0.0),
            line_style: Some("dotted".to_string()),
        };
        let style = args.apply(TracerStyle::default()).unwrap().clamped();
        assert_eq!(style.width, 10.0);
        assert_eq!(style.opacity, 0.1);
        assert_eq!(style.line_style, LineStyle::Dotted);
        assert!(style.validate().is_ok());
    }

    #[test]
    fn test_apply_rejects_bad_colour() {
        let args = StyleArgs {
            color: Some("green".to_string()),
            width: None,
            opacity: None,
            line_style: None,
        };
        assert!(args.apply(TracerStyle::default()).is_err());
    }
}
