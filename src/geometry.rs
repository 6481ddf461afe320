use smithay::utils::{Logical, Point, Size};

/// Smallest width or height a gesture may shrink a window to.
pub const MIN_GESTURE_EXTENT: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 0,
            min_height: 0,
            max_width: i32::MAX,
            max_height: i32::MAX,
        }
    }
}

impl SizeLimits {
    pub fn new(min: Size<i32, Logical>, max: Size<i32, Logical>) -> Self {
        Self {
            min_width: min.w,
            min_height: min.h,
            max_width: max.w,
            max_height: max.h,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clamped {
    pub delta: Point<i32, Logical>,
    pub size: Size<i32, Logical>,
}

/// Clamps a proposed size into the window limits, using a floor of
/// [`MIN_GESTURE_EXTENT`] on both minimums.
///
/// When a dimension hits its lower bound, a positive displacement on that axis
/// is dropped so the opposite edge stays put; at the upper bound a negative
/// displacement is dropped.
pub fn keep_size_within_limits(
    limits: &SizeLimits,
    delta: Point<i32, Logical>,
    width: i32,
    height: i32,
) -> Clamped {
    let mut delta = delta;
    let mut width = width;
    let mut height = height;

    let min_width = limits.min_width.max(MIN_GESTURE_EXTENT);
    let min_height = limits.min_height.max(MIN_GESTURE_EXTENT);
    let max_width = limits.max_width.max(min_width);
    let max_height = limits.max_height.max(min_height);

    if width < min_width {
        width = min_width;
        if delta.x > 0 {
            delta.x = 0;
        }
    }

    if height < min_height {
        height = min_height;
        if delta.y > 0 {
            delta.y = 0;
        }
    }

    if width > max_width {
        width = max_width;
        if delta.x < 0 {
            delta.x = 0;
        }
    }

    if height > max_height {
        height = max_height;
        if delta.y < 0 {
            delta.y = 0;
        }
    }

    Clamped {
        delta,
        size: Size::from((width, height)),
    }
}

pub fn constrain_resize(limits: &SizeLimits, size: Size<i32, Logical>) -> Size<i32, Logical> {
    let min_width = limits.min_width.max(0);
    let min_height = limits.min_height.max(0);
    let width = size.w.clamp(min_width, limits.max_width.max(min_width));
    let height = size.h.clamp(min_height, limits.max_height.max(min_height));
    Size::from((width, height))
}
