//! GTK4 host for a genome [`RenderSurface`].
//!
//! The engine renders offscreen into a Cairo image at device resolution;
//! the `DrawingArea` draw function only blits that image back at `1/dpr`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4 as gtk;
use gtk::prelude::*;
use tracing::warn;

use crate::api::{ManualSizeObserver, RenderSurface, ViewportConfig};
use crate::core::GenomeDataset;
use crate::error::ViewportResult;
use crate::interaction::{PointerEvent, WheelEvent};
use crate::render::{CairoContext, CairoSurface, GenomeTrackPainter};

/// GTK reports discrete wheel steps of `1.0`; browsers report pixels.
const SCROLL_STEP_TO_WHEEL_DELTA: f64 = 100.0;

type SharedSurface = Rc<RefCell<RenderSurface<CairoSurface, GenomeDataset>>>;

pub struct GtkGenomeView {
    area: gtk::DrawingArea,
    surface: SharedSurface,
}

impl GtkGenomeView {
    pub fn new(config: &ViewportConfig) -> ViewportResult<Self> {
        let area = gtk::DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);

        let observer = ManualSizeObserver::new();
        let trigger = observer.trigger();
        let cairo = CairoSurface::new(Some(f64::from(area.scale_factor())))?;
        let surface: SharedSurface = Rc::new(RefCell::new(
            RenderSurface::new(cairo, observer, config)
                .with_draw_callback(GenomeTrackPainter::default().into_draw_callback::<CairoContext>()),
        ));

        {
            let surface = Rc::clone(&surface);
            area.connect_resize(move |area, width, height| {
                trigger.resize(f64::from(width), f64::from(height));
                let mut surface = surface.borrow_mut();
                surface
                    .surface_mut()
                    .set_device_pixel_ratio(Some(f64::from(area.scale_factor())));
                surface.poll_resize();
                area.queue_draw();
            });
        }

        {
            let surface = Rc::clone(&surface);
            area.set_draw_func(move |_area, context, _width, _height| {
                let surface = surface.borrow();
                let ratio = surface.physical_viewport().device_pixel_ratio;
                blit(context, surface.surface().image_surface(), ratio);
            });
        }

        install_pan(&area, &surface);
        install_wheel_zoom(&area, &surface);

        Ok(Self { area, surface })
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    pub fn set_dataset(&self, dataset: Option<GenomeDataset>) {
        self.surface.borrow_mut().set_data(dataset);
        self.area.queue_draw();
    }

    /// Runs `f` against the engine and schedules a redraw afterwards.
    pub fn with_surface<T>(
        &self,
        f: impl FnOnce(&mut RenderSurface<CairoSurface, GenomeDataset>) -> T,
    ) -> T {
        let result = f(&mut self.surface.borrow_mut());
        self.area.queue_draw();
        result
    }
}

fn blit(context: &gtk::cairo::Context, image: &gtk::cairo::ImageSurface, ratio: f64) {
    context.scale(1.0 / ratio, 1.0 / ratio);
    if let Err(err) = context.set_source_surface(image, 0.0, 0.0) {
        warn!(error = %err, "failed to set blit source");
        return;
    }
    if let Err(err) = context.paint() {
        warn!(error = %err, "failed to blit genome view");
    }
}

fn install_pan(area: &gtk::DrawingArea, surface: &SharedSurface) {
    let drag = gtk::GestureDrag::new();
    drag.set_button(gtk::gdk::BUTTON_PRIMARY);

    {
        let surface = Rc::clone(surface);
        let area = area.downgrade();
        drag.connect_drag_begin(move |_, x, y| {
            surface.borrow_mut().on_pointer_down(PointerEvent::primary(x, y));
            if let Some(area) = area.upgrade() {
                area.queue_draw();
            }
        });
    }
    {
        let surface = Rc::clone(surface);
        let area = area.downgrade();
        drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            surface
                .borrow_mut()
                .on_pointer_move(PointerEvent::primary(start_x + offset_x, start_y + offset_y));
            if let Some(area) = area.upgrade() {
                area.queue_draw();
            }
        });
    }
    {
        let surface = Rc::clone(surface);
        drag.connect_drag_end(move |gesture, offset_x, offset_y| {
            let (start_x, start_y) = gesture.start_point().unwrap_or_default();
            surface
                .borrow_mut()
                .on_pointer_up(PointerEvent::primary(start_x + offset_x, start_y + offset_y));
        });
    }

    area.add_controller(drag);
}

fn install_wheel_zoom(area: &gtk::DrawingArea, surface: &SharedSurface) {
    let pointer_x = Rc::new(Cell::new(0.0));

    let motion = gtk::EventControllerMotion::new();
    {
        let pointer_x = Rc::clone(&pointer_x);
        motion.connect_motion(move |_, x, _y| pointer_x.set(x));
    }
    area.add_controller(motion);

    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    {
        let surface = Rc::clone(surface);
        let area = area.downgrade();
        scroll.connect_scroll(move |_, _dx, dy| {
            surface.borrow_mut().on_wheel(WheelEvent::new(
                dy * SCROLL_STEP_TO_WHEEL_DELTA,
                pointer_x.get(),
            ));
            if let Some(area) = area.upgrade() {
                area.queue_draw();
            }
            gtk::glib::Propagation::Stop
        });
    }
    area.add_controller(scroll);
}
