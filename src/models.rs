use imageproc::geometry::{approximate_polygon_dp, arc_length, min_area_rect};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Closed polygon traced around a connected edge region.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the closed outline.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }

    /// Douglas-Peucker simplification with a tolerance proportional to the perimeter.
    ///
    /// The returned polygon never repeats its first vertex at the end, so its
    /// length is the vertex count.
    pub fn simplify(&self, epsilon_fraction: f64) -> Vec<Point<i32>> {
        let mut points = self.points.clone();
        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        let epsilon = Contour::new(points.clone()).perimeter() * epsilon_fraction;
        if points.len() < 3 || !(epsilon > 0.0) {
            return points;
        }

        let mut approx = approximate_polygon_dp(&points, epsilon, true);
        approx.dedup();
        if approx.len() > 1 && approx.first() == approx.last() {
            approx.pop();
        }
        approx
    }

    /// Minimal-area rotated rectangle around all contour points.
    pub fn min_area_rect(&self) -> Option<RotatedRect> {
        RotatedRect::fit(&self.points)
    }
}

/// Rectangle of any rotation, described by its four corners in traversal order.
///
/// `width` is the length of the first edge (corner 0 to 1), `height` the
/// length of the second edge (corner 1 to 2). Either may be the longer one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    pub corners: [Point<f32>; 4],
    pub center: Point<f32>,
    pub width: f32,
    pub height: f32,
    /// Direction of the first edge in degrees.
    pub angle: f32,
}

impl RotatedRect {
    pub fn from_corners(corners: [Point<f32>; 4]) -> Self {
        let edge = |a: Point<f32>, b: Point<f32>| (b.x - a.x).hypot(b.y - a.y);
        let center = Point::new(
            corners.iter().map(|p| p.x).sum::<f32>() / 4.0,
            corners.iter().map(|p| p.y).sum::<f32>() / 4.0,
        );
        let angle = (corners[1].y - corners[0].y)
            .atan2(corners[1].x - corners[0].x)
            .to_degrees();

        Self {
            corners,
            center,
            width: edge(corners[0], corners[1]),
            height: edge(corners[1], corners[2]),
            angle,
        }
    }

    /// Fit the minimal rotated rectangle around a point set.
    ///
    /// Needs at least three points; smaller sets have no meaningful rectangle.
    pub fn fit(points: &[Point<i32>]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let corners = min_area_rect(points).map(|p| Point::new(p.x as f32, p.y as f32));
        Some(Self::from_corners(corners))
    }

    pub fn long_side(&self) -> f32 {
        self.width.max(self.height)
    }

    pub fn short_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Long side over short side, always >= 1 for non-degenerate rectangles.
    pub fn aspect_ratio(&self) -> f64 {
        let short = self.short_side() as f64;
        if short <= 0.0 {
            return f64::INFINITY;
        }
        self.long_side() as f64 / short
    }

    /// Short side over long side, in (0, 1].
    pub fn portrait_ratio(&self) -> f64 {
        let long = self.long_side() as f64;
        if long <= 0.0 {
            return 0.0;
        }
        self.short_side() as f64 / long
    }

    /// Axis-aligned bounds, clamped to a `max_width` x `max_height` image.
    pub fn bounding_box(&self, max_width: u32, max_height: u32) -> Option<BoundingBox> {
        let min_x = self.corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = self.corners.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = self.corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = self.corners.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

        BoundingBox::clamped(
            min_x.floor() as i64,
            min_y.floor() as i64,
            max_x.ceil() as i64,
            max_y.ceil() as i64,
            max_width,
            max_height,
        )
    }
}

/// A card-shaped rectangle that survived vertex and area filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardCandidate {
    /// Position of the source contour in extraction order.
    pub contour_index: usize,
    /// Vertex count of the simplified contour.
    pub vertices: usize,
    pub rect: RotatedRect,
}

/// Result of card selection.
#[derive(Debug, Clone, PartialEq)]
pub enum CardSelection {
    /// A top-ranked candidate matched the ID-card aspect band.
    Found(CardCandidate),
    /// No candidate matched the band; the largest survivor was taken.
    FoundByFallback(CardCandidate),
    /// Nothing survived filtering. `rejected` lists the largest raw contours.
    NotFound { rejected: Vec<RotatedRect> },
}

impl CardSelection {
    pub fn candidate(&self) -> Option<&CardCandidate> {
        match self {
            CardSelection::Found(candidate) | CardSelection::FoundByFallback(candidate) => {
                Some(candidate)
            }
            CardSelection::NotFound { .. } => None,
        }
    }

    pub fn rect(&self) -> Option<&RotatedRect> {
        self.candidate().map(|c| &c.rect)
    }

    pub fn is_found(&self) -> bool {
        self.candidate().is_some()
    }
}

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Build a box from inclusive-exclusive edges, clipped to the image. `None` if nothing is left.
    pub fn clamped(
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
        max_width: u32,
        max_height: u32,
    ) -> Option<Self> {
        let left = left.clamp(0, max_width as i64);
        let right = right.clamp(0, max_width as i64);
        let top = top.clamp(0, max_height as i64);
        let bottom = bottom.clamp(0, max_height as i64);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn to_rect(&self) -> Rect {
        Rect::at(self.x as i32, self.y as i32).of_size(self.width, self.height)
    }
}

/// Portrait located inside a normalized card.
#[derive(Debug, Clone, PartialEq)]
pub struct Portrait {
    pub region: BoundingBox,
    /// Detector score; only the face classifier produces one.
    pub confidence: Option<f64>,
}

/// Terminal state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoCard,
    CardWithoutPortrait,
    CardWithPortrait,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::NoCard => "No card-like rectangles found.",
            Outcome::CardWithoutPortrait => "No portrait detected.",
            Outcome::CardWithPortrait => "Card with portrait detected.",
        }
    }
}
