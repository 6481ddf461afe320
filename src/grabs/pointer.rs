use smithay::utils::{Logical, Point, Size};

use super::ResizeEdge;
use crate::{
    geometry::keep_size_within_limits,
    input::{Modifiers, PointerAction, PointerButtons, PointerEvent},
    toolkit::{WindowId, WindowSpec, WindowToolkit},
};

/// What must stay true for a pointer gesture to continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureGrip {
    pub window: WindowId,
    pub button: PointerButtons,
    pub modifiers: Modifiers,
}

impl GestureGrip {
    fn from_trigger(window: WindowId, trigger: &PointerEvent) -> Option<Self> {
        let button = trigger.buttons.first_held()?;
        Some(Self {
            window,
            button,
            modifiers: trigger.modifiers,
        })
    }

    fn continues_with(&self, event: &PointerEvent) -> bool {
        event.action == PointerAction::Motion
            && event.modifiers == self.modifiers
            && event.buttons.contains(self.button)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerGesture {
    #[default]
    None,
    Moving(GestureGrip),
    Resizing {
        grip: GestureGrip,
        edges: ResizeEdge,
        top_left: Point<i32, Logical>,
        size: Size<i32, Logical>,
    },
}

impl PointerGesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, PointerGesture::None)
    }

    fn grip(&self) -> Option<GestureGrip> {
        match self {
            PointerGesture::None => None,
            PointerGesture::Moving(grip) | PointerGesture::Resizing { grip, .. } => Some(*grip),
        }
    }

    pub fn begin_move(&mut self, window: WindowId, trigger: &PointerEvent) -> bool {
        let Some(grip) = GestureGrip::from_trigger(window, trigger) else {
            return false;
        };
        tracing::debug!(%window, button = ?grip.button, "pointer move gesture started");
        *self = PointerGesture::Moving(grip);
        true
    }

    pub fn begin_resize<T: WindowToolkit>(
        &mut self,
        toolkit: &T,
        window: WindowId,
        trigger: &PointerEvent,
        edges: ResizeEdge,
    ) -> bool {
        let Some(grip) = GestureGrip::from_trigger(window, trigger) else {
            return false;
        };
        let Some(info) = toolkit.info_for(window) else {
            return false;
        };
        tracing::debug!(%window, ?edges, "pointer resize gesture started");
        *self = PointerGesture::Resizing {
            grip,
            edges,
            top_left: info.top_left,
            size: info.size,
        };
        true
    }

    /// Feeds one pointer event through the gesture. Returns whether the event
    /// was consumed; any event that breaks the grip ends the gesture.
    pub fn handle_event<T: WindowToolkit>(
        &mut self,
        toolkit: &mut T,
        event: &PointerEvent,
    ) -> bool {
        let Some(grip) = self.grip() else {
            return false;
        };

        if !grip.continues_with(event) {
            tracing::debug!(window = %grip.window, "pointer gesture ended");
            *self = PointerGesture::None;
            return false;
        }

        if toolkit.select_active_window(grip.window) != Some(grip.window) {
            tracing::debug!(window = %grip.window, "pointer gesture lost its window");
            *self = PointerGesture::None;
            return true;
        }

        match *self {
            PointerGesture::None => {}
            PointerGesture::Moving(_) => toolkit.drag_active_window(event.motion),
            PointerGesture::Resizing {
                grip,
                edges,
                top_left,
                size,
            } => {
                let (top_left, size) =
                    resize_step(toolkit, grip.window, edges, top_left, size, event.motion);
                *self = PointerGesture::Resizing {
                    grip,
                    edges,
                    top_left,
                    size,
                };
            }
        }

        true
    }
}

fn resize_step<T: WindowToolkit>(
    toolkit: &mut T,
    window: WindowId,
    edges: ResizeEdge,
    top_left: Point<i32, Logical>,
    size: Size<i32, Logical>,
    movement: Point<i32, Logical>,
) -> (Point<i32, Logical>, Size<i32, Logical>) {
    let mut width = size.w;
    let mut height = size.h;

    if edges.contains(ResizeEdge::RIGHT) {
        width = size.w + movement.x;
    }
    if edges.contains(ResizeEdge::LEFT) {
        width = size.w - movement.x;
    }
    if edges.contains(ResizeEdge::TOP) {
        height = size.h - movement.y;
    }
    if edges.contains(ResizeEdge::BOTTOM) {
        height = size.h + movement.y;
    }

    let limits = toolkit
        .info_for(window)
        .map(|info| info.limits())
        .unwrap_or_default();
    let clamped = keep_size_within_limits(&limits, movement, width, height);

    let mut new_top_left = top_left;
    if edges.contains(ResizeEdge::LEFT) {
        new_top_left.x = top_left.x + clamped.delta.x;
    }
    if edges.contains(ResizeEdge::TOP) {
        new_top_left.y = top_left.y + clamped.delta.y;
    }

    toolkit.modify_window(
        window,
        &WindowSpec {
            top_left: Some(new_top_left),
            size: Some(clamped.size),
            ..WindowSpec::default()
        },
    );

    (new_top_left, clamped.size)
}
