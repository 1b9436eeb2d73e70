use crate::core::LogicalSize;
use crate::error::ViewportResult;
use crate::render::{Color, LinePrimitive, RectPrimitive, TextPrimitive};

/// Genome track scene for one draw pass, in logical pixels.
///
/// Backends paint in lane stacking order: the background fill over `size`,
/// grid and guide lines, feature bars and label chips, then all text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub size: LogicalSize,
    pub background: Color,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: LogicalSize, background: Color) -> Self {
        Self {
            size,
            background,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// The background as a rect covering the whole frame.
    #[must_use]
    pub fn background_rect(&self) -> RectPrimitive {
        RectPrimitive::new(0.0, 0.0, self.size.width, self.size.height, self.background)
    }

    /// Number of primitives a backend will paint, background included.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        1 + self.lines.len() + self.rects.len() + self.texts.len()
    }

    /// Checks every primitive; the frame size itself is trusted because
    /// frames are only built for measured surfaces.
    pub fn validate(&self) -> ViewportResult<()> {
        self.background.validate()?;
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::LogicalSize;
    use crate::render::{Color, RectPrimitive, TextPrimitive};

    #[test]
    fn background_covers_frame_and_counts_as_primitive() {
        let frame = RenderFrame::new(LogicalSize::new(300.0, 120.0), Color::rgb(1.0, 1.0, 1.0));

        let background = frame.background_rect();
        assert_eq!((background.x, background.y), (0.0, 0.0));
        assert_eq!((background.width, background.height), (300.0, 120.0));
        assert_eq!(frame.primitive_count(), 1);
        frame.validate().expect("empty frame is valid");
    }

    #[test]
    fn invalid_primitive_fails_validation() {
        let mut frame = RenderFrame::new(LogicalSize::new(10.0, 10.0), Color::rgb(0.0, 0.0, 0.0));
        frame
            .rects
            .push(RectPrimitive::new(0.0, 0.0, -1.0, 4.0, Color::rgb(0.0, 0.0, 0.0)));
        assert!(frame.validate().is_err());

        frame.rects.clear();
        frame
            .texts
            .push(TextPrimitive::new("", 0.0, 0.0, 12.0, Color::rgb(0.0, 0.0, 0.0)));
        assert!(frame.validate().is_err());
    }
}
