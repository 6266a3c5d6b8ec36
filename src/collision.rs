//! Axis-aligned bounding-box hit testing.

/// An axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Bounds {
            x,
            y,
            width,
            height,
        }
    }
}

/// True when `a` and `b` overlap on both axes.
///
/// `a` is ruled out only when it lies strictly past `b`'s far edge or its own
/// far edge lies strictly before `b`'s near edge, so boxes that merely touch
/// still count as a hit.  The test is evaluated from `a`'s side: `b`'s extent
/// bounds the right/below checks and `a`'s extent the left/above checks.
pub fn is_collision(a: &Bounds, b: &Bounds) -> bool {
    let right_of = a.x > b.x + b.width;
    let left_of = a.x + a.width < b.x;
    let below = a.y > b.y + b.height;
    let above = a.y + a.height < b.y;

    !(right_of || left_of || below || above)
}
