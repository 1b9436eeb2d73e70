use std::ops::{Deref, DerefMut};

use crate::render::DrawingContext;

/// Saves the context transform on creation and restores it on drop.
///
/// The restore also runs while unwinding, so a panicking draw callback
/// cannot leave the shared context transformed for the next frame.
pub struct TransformScope<'a, C: DrawingContext + ?Sized> {
    context: &'a mut C,
}

impl<'a, C: DrawingContext + ?Sized> TransformScope<'a, C> {
    pub fn new(context: &'a mut C) -> Self {
        context.save();
        Self { context }
    }
}

impl<C: DrawingContext + ?Sized> Deref for TransformScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.context
    }
}

impl<C: DrawingContext + ?Sized> DerefMut for TransformScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.context
    }
}

impl<C: DrawingContext + ?Sized> Drop for TransformScope<'_, C> {
    fn drop(&mut self) {
        self.context.restore();
    }
}
