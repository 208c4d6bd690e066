use crate::consts::CROP_MIN_GAP;

/// A point in image space (bitmap pixels, origin top-left).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

impl ImagePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: ImagePoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A point in screen space (canvas pixels, origin top-left of the canvas).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A displacement in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenVec {
    pub x: f32,
    pub y: f32,
}

impl ScreenVec {
    pub const ZERO: ScreenVec = ScreenVec { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height, in whichever space the caller works in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenRect {
    pub fn from_min_size(min: ScreenPoint, size: Size) -> Self {
        Self {
            min,
            max: ScreenPoint::new(min.x + size.width, min.y + size.height),
        }
    }

    pub fn from_min_max(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// One side of a crop rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl CropEdge {
    /// Hit-test priority order: the first edge within tolerance wins.
    pub const ALL: [CropEdge; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];
}

/// Crop rectangle in image space.
///
/// Holds `0 <= left < right <= width` and `0 <= top < bottom <= height`
/// whenever it was produced by one of the clamping constructors below.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl CropRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The rectangle covering the whole image.
    pub fn full(image: Size) -> Self {
        Self::new(0.0, 0.0, image.width, image.height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn edge(&self, edge: CropEdge) -> f32 {
        match edge {
            CropEdge::Left => self.left,
            CropEdge::Right => self.right,
            CropEdge::Top => self.top,
            CropEdge::Bottom => self.bottom,
        }
    }

    /// True when the rectangle spans at least one whole pixel each way.
    pub fn is_applicable(&self) -> bool {
        self.width().floor() >= 1.0 && self.height().floor() >= 1.0
    }

    /// Move one edge while dragging: the edge is clamped to the image bounds
    /// and kept `CROP_MIN_GAP` away from the opposite edge.
    pub fn with_dragged_edge(&self, edge: CropEdge, pos: ImagePoint, image: Size) -> Self {
        let mut next = *self;
        match edge {
            CropEdge::Left => next.left = pos.x.max(0.0).min(self.right - CROP_MIN_GAP),
            CropEdge::Right => next.right = pos.x.min(image.width).max(self.left + CROP_MIN_GAP),
            CropEdge::Top => next.top = pos.y.max(0.0).min(self.bottom - CROP_MIN_GAP),
            CropEdge::Bottom => {
                next.bottom = pos.y.min(image.height).max(self.top + CROP_MIN_GAP)
            }
        }
        next
    }

    /// Set one edge from a numeric input and re-establish the invariant on
    /// whole-pixel values.
    pub fn with_edge_value(&self, edge: CropEdge, value: f32, image: Size) -> Self {
        let mut next = *self;
        match edge {
            CropEdge::Left => next.left = value,
            CropEdge::Right => next.right = value,
            CropEdge::Top => next.top = value,
            CropEdge::Bottom => next.bottom = value,
        }
        next.clamped_to(image)
    }

    /// Snap to whole pixels inside `image`, forcing `left < right` and `top < bottom`.
    pub fn clamped_to(&self, image: Size) -> Self {
        let w = image.width.floor().max(1.0);
        let h = image.height.floor().max(1.0);

        let mut left = self.left.floor().clamp(0.0, w - 1.0);
        let right = self.right.floor().clamp(1.0, w);
        let mut top = self.top.floor().clamp(0.0, h - 1.0);
        let bottom = self.bottom.floor().clamp(1.0, h);

        if left >= right {
            left = right - 1.0;
        }
        if top >= bottom {
            top = bottom - 1.0;
        }

        Self::new(left, top, right, bottom)
    }
}
