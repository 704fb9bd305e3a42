//! Drawing primitives and point-to-outline distance rules.

use std::f64::consts::PI;

/// Line segments used to approximate a quadratic Bézier.
pub const CURVE_SAMPLES: usize = 32;

/// A point in canvas (or template design) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Apply a uniform scale followed by a translation.
    pub fn transform(&self, scale: f64, offset: Point) -> Point {
        Point::new(self.x * scale + offset.x, self.y * scale + offset.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ── Bounds ─────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// An empty box that any union replaces.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

// ── Primitives ─────────────────────────────────────────────

/// One guide shape of a template step.
///
/// Ellipse `width`/`height` are full diameters.  `Rect` is anchored at its
/// top-left corner.  `Curve` holds the start, control and end points of a
/// quadratic Bézier.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle { center: Point, radius: f64 },
    Ellipse { center: Point, width: f64, height: f64 },
    Rect { origin: Point, width: f64, height: f64 },
    Line { p1: Point, p2: Point },
    Triangle { points: [Point; 3] },
    Curve { points: [Point; 3] },
}

impl Primitive {
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self::Circle {
            center: Point::new(x, y),
            radius,
        }
    }

    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Ellipse {
            center: Point::new(x, y),
            width,
            height,
        }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Line {
            p1: Point::new(x1, y1),
            p2: Point::new(x2, y2),
        }
    }

    pub fn triangle(points: [(f64, f64); 3]) -> Self {
        Self::Triangle {
            points: points.map(Point::from),
        }
    }

    pub fn curve(points: [(f64, f64); 3]) -> Self {
        Self::Curve {
            points: points.map(Point::from),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Rect { .. } => "rect",
            Self::Line { .. } => "line",
            Self::Triangle { .. } => "triangle",
            Self::Curve { .. } => "curve",
        }
    }

    /// Whether the primitive has no traceable outline.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Circle { radius, .. } => *radius <= 0.0,
            Self::Ellipse { width, height, .. } | Self::Rect { width, height, .. } => {
                *width <= 0.0 || *height <= 0.0
            }
            Self::Line { p1, p2 } => p1.distance(*p2) <= 0.0,
            Self::Triangle { .. } | Self::Curve { .. } => self.outline_length() <= 0.0,
        }
    }

    /// Bounding box.  Curves use their control points.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        match self {
            Self::Circle { center, radius } => {
                b.include(Point::new(center.x - radius, center.y - radius));
                b.include(Point::new(center.x + radius, center.y + radius));
            }
            Self::Ellipse {
                center,
                width,
                height,
            } => {
                b.include(Point::new(center.x - width / 2.0, center.y - height / 2.0));
                b.include(Point::new(center.x + width / 2.0, center.y + height / 2.0));
            }
            Self::Rect {
                origin,
                width,
                height,
            } => {
                b.include(*origin);
                b.include(Point::new(origin.x + width, origin.y + height));
            }
            Self::Line { p1, p2 } => {
                b.include(*p1);
                b.include(*p2);
            }
            Self::Triangle { points } | Self::Curve { points } => {
                for p in points {
                    b.include(*p);
                }
            }
        }
        b
    }

    /// Copy with a uniform scale then translation applied.
    pub fn transformed(&self, scale: f64, offset: Point) -> Primitive {
        match self {
            Self::Circle { center, radius } => Self::Circle {
                center: center.transform(scale, offset),
                radius: radius * scale,
            },
            Self::Ellipse {
                center,
                width,
                height,
            } => Self::Ellipse {
                center: center.transform(scale, offset),
                width: width * scale,
                height: height * scale,
            },
            Self::Rect {
                origin,
                width,
                height,
            } => Self::Rect {
                origin: origin.transform(scale, offset),
                width: width * scale,
                height: height * scale,
            },
            Self::Line { p1, p2 } => Self::Line {
                p1: p1.transform(scale, offset),
                p2: p2.transform(scale, offset),
            },
            Self::Triangle { points } => Self::Triangle {
                points: points.map(|p| p.transform(scale, offset)),
            },
            Self::Curve { points } => Self::Curve {
                points: points.map(|p| p.transform(scale, offset)),
            },
        }
    }

    /// Length of the outline a user traces.
    pub fn outline_length(&self) -> f64 {
        match self {
            Self::Circle { radius, .. } => 2.0 * PI * radius.max(0.0),
            Self::Ellipse { width, height, .. } => {
                // Ramanujan's approximation.
                let a = (width / 2.0).max(0.0);
                let b = (height / 2.0).max(0.0);
                PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
            }
            Self::Rect { width, height, .. } => 2.0 * (width.max(0.0) + height.max(0.0)),
            Self::Line { p1, p2 } => p1.distance(*p2),
            Self::Triangle { points } => {
                points[0].distance(points[1]) + points[1].distance(points[2]) + points[2].distance(points[0])
            }
            Self::Curve { points } => {
                let samples = bezier_samples(points);
                samples.windows(2).map(|w| w[0].distance(w[1])).sum()
            }
        }
    }

    /// Whether `p` lies on the outline within `tolerance`.
    ///
    /// Triangles and curves only match when `open_shapes` is set.
    /// Degenerate primitives never match.
    pub fn hits(&self, p: Point, tolerance: f64, open_shapes: bool) -> bool {
        if self.is_degenerate() {
            return false;
        }
        match self {
            Self::Circle { center, radius } => (p.distance(*center) - radius).abs() <= tolerance,
            Self::Ellipse {
                center,
                width,
                height,
            } => {
                let dx = (p.x - center.x) / (width / 2.0);
                let dy = (p.y - center.y) / (height / 2.0);
                ((dx * dx + dy * dy).sqrt() - 1.0).abs() <= tolerance / 20.0
            }
            Self::Rect {
                origin,
                width,
                height,
            } => {
                let right = origin.x + width;
                let bottom = origin.y + height;
                let inside = p.x >= origin.x - tolerance
                    && p.x <= right + tolerance
                    && p.y >= origin.y - tolerance
                    && p.y <= bottom + tolerance;
                let near_edge = (p.x - origin.x).abs() <= tolerance
                    || (p.x - right).abs() <= tolerance
                    || (p.y - origin.y).abs() <= tolerance
                    || (p.y - bottom).abs() <= tolerance;
                inside && near_edge
            }
            Self::Line { p1, p2 } => segment_distance(p, *p1, *p2) <= tolerance,
            Self::Triangle { points } => {
                open_shapes
                    && (0..3)
                        .map(|i| segment_distance(p, points[i], points[(i + 1) % 3]))
                        .any(|d| d <= tolerance)
            }
            Self::Curve { points } => {
                open_shapes
                    && bezier_samples(points)
                        .windows(2)
                        .any(|w| segment_distance(p, w[0], w[1]) <= tolerance)
            }
        }
    }
}

/// Distance from `p` to the segment `a`-`b`, clamped to the endpoints.
pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let cx = b.x - a.x;
    let cy = b.y - a.y;
    let len_sq = cx * cx + cy * cy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * cx + (p.y - a.y) * cy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * cx, a.y + t * cy))
}

/// Point on a quadratic Bézier at parameter `t`.
pub fn bezier_point(points: &[Point; 3], t: f64) -> Point {
    let u = 1.0 - t;
    let [p0, p1, p2] = points;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

fn bezier_samples(points: &[Point; 3]) -> Vec<Point> {
    (0..=CURVE_SAMPLES)
        .map(|i| bezier_point(points, i as f64 / CURVE_SAMPLES as f64))
        .collect()
}
