//! Axis-agnostic geometry.
//!
//! Maps a physical axis to the concrete anchor attributes and sign
//! conventions a slider needs, so the same layout code serves horizontal
//! and vertical sliders. Everything here is a pure function.
//!
//! Horizontal layouts are mirrored relative to vertical ones: the "near"
//! edge (and the "top" edge) of a horizontal axis is the right side, the
//! "far" edge (and the "bottom" edge) is the left side. A slider's value
//! grows from far to near in both orientations.

use floem::kurbo::{Point, Rect};

/// A physical layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// The axis orthogonal to this one.
    pub fn perpendicular(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub fn is_vertical(self) -> bool {
        self == Axis::Vertical
    }
}

/// The logical role of an axis relative to a control's direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    Primary,
    Perpendicular,
}

impl AxisRole {
    /// Physical axis this role denotes for a control travelling along `primary`.
    pub fn resolve(self, primary: Axis) -> Axis {
        match self {
            AxisRole::Primary => primary,
            AxisRole::Perpendicular => primary.perpendicular(),
        }
    }
}

/// Anchor attributes understood by the layout engine.
///
/// `NotAnAttribute` is the sentinel used when a constraint has no
/// counterpart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
    LastBaseline,
    FirstBaseline,
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    LeadingMargin,
    TrailingMargin,
    CenterXWithinMargins,
    CenterYWithinMargins,
    #[default]
    NotAnAttribute,
}

impl Attribute {
    pub const ALL: [Attribute; 21] = [
        Attribute::Left,
        Attribute::Right,
        Attribute::Top,
        Attribute::Bottom,
        Attribute::Leading,
        Attribute::Trailing,
        Attribute::Width,
        Attribute::Height,
        Attribute::CenterX,
        Attribute::CenterY,
        Attribute::LastBaseline,
        Attribute::FirstBaseline,
        Attribute::LeftMargin,
        Attribute::RightMargin,
        Attribute::TopMargin,
        Attribute::BottomMargin,
        Attribute::LeadingMargin,
        Attribute::TrailingMargin,
        Attribute::CenterXWithinMargins,
        Attribute::CenterYWithinMargins,
        Attribute::NotAnAttribute,
    ];

    /// Mirror attribute. Attributes without a direction are fixed points.
    pub fn opposite(self) -> Self {
        use Attribute::*;
        match self {
            Left => Right,
            Right => Left,
            Top => Bottom,
            Bottom => Top,
            Leading => Trailing,
            Trailing => Leading,
            LeftMargin => RightMargin,
            RightMargin => LeftMargin,
            TopMargin => BottomMargin,
            BottomMargin => TopMargin,
            LeadingMargin => TrailingMargin,
            TrailingMargin => LeadingMargin,
            other => other,
        }
    }

    /// Sign of an offset that points from this edge into its view.
    pub fn inward_sign(self) -> f64 {
        use Attribute::*;
        match self {
            Bottom | Trailing | Right | BottomMargin | TrailingMargin | RightMargin => -1.0,
            _ => 1.0,
        }
    }

    /// True for edges that have a distinct mirror.
    pub fn is_edge(self) -> bool {
        self.opposite() != self
    }

    /// The center anchor orthogonal to this attribute.
    pub fn perpendicular_center(self) -> Self {
        use Attribute::*;
        match self {
            Left | Right | Leading | Trailing | LeftMargin | RightMargin | LeadingMargin
            | TrailingMargin | CenterX | CenterXWithinMargins => CenterY,
            _ => CenterX,
        }
    }
}

/// Center anchor along `axis`.
pub fn center_for(axis: Axis) -> Attribute {
    match axis {
        Axis::Vertical => Attribute::CenterY,
        Axis::Horizontal => Attribute::CenterX,
    }
}

/// The edge a value grows towards. Right on a horizontal axis.
pub fn top_edge_for(axis: Axis) -> Attribute {
    match axis {
        Axis::Vertical => Attribute::Top,
        Axis::Horizontal => Attribute::Right,
    }
}

/// The edge a value grows from. Left on a horizontal axis.
pub fn bottom_edge_for(axis: Axis) -> Attribute {
    match axis {
        Axis::Vertical => Attribute::Bottom,
        Axis::Horizontal => Attribute::Left,
    }
}

/// Scalar position of `point` along `axis`.
pub fn coordinate(point: Point, axis: Axis) -> f64 {
    match axis {
        Axis::Vertical => point.y,
        Axis::Horizontal => point.x,
    }
}

/// Extent of `rect` along `axis`.
pub fn size(rect: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Vertical => rect.height(),
        Axis::Horizontal => rect.width(),
    }
}

/// Coordinate of the [`top_edge_for`] edge: min y vertically, max x horizontally.
pub fn edge_near(rect: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Vertical => rect.min_y(),
        Axis::Horizontal => rect.max_x(),
    }
}

/// Coordinate of the [`bottom_edge_for`] edge: max y vertically, min x horizontally.
pub fn edge_far(rect: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::Vertical => rect.max_y(),
        Axis::Horizontal => rect.min_x(),
    }
}

/// Dimension attribute measured along `axis`.
pub fn extent_for(axis: Axis) -> Attribute {
    match axis {
        Axis::Vertical => Attribute::Height,
        Axis::Horizontal => Attribute::Width,
    }
}

/// Point at `along` on `axis` and `across` on its perpendicular.
pub fn point_on(axis: Axis, along: f64, across: f64) -> Point {
    match axis {
        Axis::Vertical => Point::new(across, along),
        Axis::Horizontal => Point::new(along, across),
    }
}

/// Rect spanning `from..to` on `axis`, `across_extent` thick around `across_center`.
pub fn span_rect(axis: Axis, from: f64, to: f64, across_center: f64, across_extent: f64) -> Rect {
    let half = across_extent / 2.0;
    let a = point_on(axis, from, across_center - half);
    let b = point_on(axis, to, across_center + half);
    Rect::from_points(a, b)
}

/// Resolve a positional attribute to a coordinate inside `rect`.
///
/// Leading/trailing resolve left-to-right. Margins are treated as the bare
/// edge. Dimensions, baselines and the sentinel have no coordinate.
pub fn anchor_coordinate(rect: Rect, attribute: Attribute) -> Option<f64> {
    use Attribute::*;
    let c = rect.center();
    match attribute {
        Left | Leading | LeftMargin | LeadingMargin => Some(rect.min_x()),
        Right | Trailing | RightMargin | TrailingMargin => Some(rect.max_x()),
        Top | TopMargin => Some(rect.min_y()),
        Bottom | BottomMargin => Some(rect.max_y()),
        CenterX | CenterXWithinMargins => Some(c.x),
        CenterY | CenterYWithinMargins => Some(c.y),
        Width | Height | FirstBaseline | LastBaseline | NotAnAttribute => None,
    }
}

/// Physical axis an anchor lies on, if it is positional.
pub fn anchor_axis(attribute: Attribute) -> Option<Axis> {
    use Attribute::*;
    match attribute {
        Left | Right | Leading | Trailing | LeftMargin | RightMargin | LeadingMargin
        | TrailingMargin | CenterX | CenterXWithinMargins => Some(Axis::Horizontal),
        Top | Bottom | TopMargin | BottomMargin | CenterY | CenterYWithinMargins => {
            Some(Axis::Vertical)
        }
        Width | Height | FirstBaseline | LastBaseline | NotAnAttribute => None,
    }
}
