use kurbo::Affine;
use smallvec::SmallVec;

use crate::core::BackingSize;
use crate::error::ViewportResult;
use crate::interaction::PointerId;
use crate::render::{DrawingContext, DrawingSurface, RenderFrame, Renderer};

/// One operation observed by a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Backing buffer resized; the context state was reset.
    Reset(BackingSize),
    Save,
    Restore,
    SetTransform(Affine),
    Transform(Affine),
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// A frame was painted under the given transform.
    Frame {
        transform: Affine,
        rects: usize,
        lines: usize,
        texts: usize,
    },
}

/// Headless context that records every call, for tests and headless hosts.
///
/// It still validates frames so tests catch invalid geometry.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    current: Affine,
    stack: SmallVec<[Affine; 4]>,
    last_frame: Option<RenderFrame>,
}

impl RecordingContext {
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    fn reset(&mut self, size: BackingSize) {
        self.current = Affine::IDENTITY;
        self.stack.clear();
        self.commands.push(DrawCommand::Reset(size));
    }
}

impl Renderer for RecordingContext {
    fn render(&mut self, frame: &RenderFrame) -> ViewportResult<()> {
        frame.validate()?;
        self.commands.push(DrawCommand::Frame {
            transform: self.current,
            rects: frame.rects.len(),
            lines: frame.lines.len(),
            texts: frame.texts.len(),
        });
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

impl DrawingContext for RecordingContext {
    fn save(&mut self) {
        self.stack.push(self.current);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn current_transform(&self) -> Affine {
        self.current
    }

    fn set_transform(&mut self, transform: Affine) {
        self.current = transform;
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn transform(&mut self, transform: Affine) {
        self.current = self.current * transform;
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }
}

/// In-memory [`DrawingSurface`] backed by a [`RecordingContext`].
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    context: Option<RecordingContext>,
    backing: BackingSize,
    device_pixel_ratio: Option<f64>,
    resize_count: usize,
    captured: Option<PointerId>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            context: Some(RecordingContext::default()),
            backing: BackingSize::default(),
            device_pixel_ratio: None,
            resize_count: 0,
            captured: None,
        }
    }

    /// Surface that never yields a context, like an unsupported canvas.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            context: None,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_device_pixel_ratio(mut self, device_pixel_ratio: f64) -> Self {
        self.device_pixel_ratio = Some(device_pixel_ratio);
        self
    }

    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: Option<f64>) {
        self.device_pixel_ratio = device_pixel_ratio;
    }

    #[must_use]
    pub fn context(&self) -> Option<&RecordingContext> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    #[must_use]
    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.captured
    }
}

impl DrawingSurface for RecordingSurface {
    type Context = RecordingContext;

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn resize_backing(&mut self, size: BackingSize) -> ViewportResult<()> {
        self.backing = size;
        self.resize_count += 1;
        if let Some(context) = self.context.as_mut() {
            context.reset(size);
        }
        Ok(())
    }

    fn context_mut(&mut self) -> Option<&mut RecordingContext> {
        self.context.as_mut()
    }

    fn set_pointer_capture(&mut self, pointer: PointerId) {
        self.captured = Some(pointer);
    }

    fn release_pointer_capture(&mut self, pointer: PointerId) {
        if self.captured == Some(pointer) {
            self.captured = None;
        }
    }
}
