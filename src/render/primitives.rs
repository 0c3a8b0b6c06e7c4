//! Backend-agnostic scene primitives.

use crate::error::{ChartError, ChartResult};
use crate::shape::Point;

/// Open or closed path through optional points; `None` breaks the path (gap).
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrimitive {
    pub points: Vec<Option<Point>>,
    pub closed: bool,
    pub class_name: String,
    pub opacity: f64,
    /// Horizontal translate used by the streaming flow animation.
    pub translate_x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub corners: Vec<Point>,
    pub class_name: String,
    pub opacity: f64,
    pub translate_x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub class_name: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
    pub rotate_deg: f64,
    pub class_name: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CirclePrimitive {
    pub center: Point,
    pub radius: f64,
    pub class_name: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcPrimitive {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius_ratio: f64,
    pub class_name: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path(PathPrimitive),
    Polygon(PolygonPrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
    Circle(CirclePrimitive),
    Arc(ArcPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> ChartResult<()> {
        let (opacity, finite) = match self {
            Self::Path(path) => (
                path.opacity,
                path.translate_x.is_finite()
                    && path
                        .points
                        .iter()
                        .flatten()
                        .all(|point| point.x.is_finite() && point.y.is_finite()),
            ),
            Self::Polygon(polygon) => (
                polygon.opacity,
                polygon.translate_x.is_finite()
                    && polygon
                        .corners
                        .iter()
                        .all(|point| point.x.is_finite() && point.y.is_finite()),
            ),
            Self::Rect(rect) => (
                rect.opacity,
                rect.x.is_finite()
                    && rect.y.is_finite()
                    && rect.width.is_finite()
                    && rect.height.is_finite()
                    && rect.width >= 0.0
                    && rect.height >= 0.0,
            ),
            Self::Text(text) => (
                text.opacity,
                text.x.is_finite() && text.y.is_finite() && text.rotate_deg.is_finite(),
            ),
            Self::Circle(circle) => (
                circle.opacity,
                circle.center.x.is_finite()
                    && circle.center.y.is_finite()
                    && circle.radius.is_finite()
                    && circle.radius >= 0.0,
            ),
            Self::Arc(arc) => (
                arc.opacity,
                arc.center.x.is_finite()
                    && arc.center.y.is_finite()
                    && arc.radius.is_finite()
                    && arc.radius >= 0.0
                    && arc.start_angle.is_finite()
                    && arc.end_angle.is_finite()
                    && (0.0..=1.0).contains(&arc.inner_radius_ratio),
            ),
        };

        if !finite {
            return Err(ChartError::InvalidData(
                "primitive coordinates must be finite".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ChartError::InvalidData(
                "primitive opacity must be in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        match self {
            Self::Path(path) => path.opacity,
            Self::Polygon(polygon) => polygon.opacity,
            Self::Rect(rect) => rect.opacity,
            Self::Text(text) => text.opacity,
            Self::Circle(circle) => circle.opacity,
            Self::Arc(arc) => arc.opacity,
        }
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        match &mut self {
            Self::Path(path) => path.opacity = opacity,
            Self::Polygon(polygon) => polygon.opacity = opacity,
            Self::Rect(rect) => rect.opacity = opacity,
            Self::Text(text) => text.opacity = opacity,
            Self::Circle(circle) => circle.opacity = opacity,
            Self::Arc(arc) => arc.opacity = opacity,
        }
        self
    }

    /// Interpolates between two primitives of the same variant; mismatched
    /// variants or incompatible point counts snap to the target.
    #[must_use]
    pub fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        match (from, to) {
            (Self::Path(a), Self::Path(b)) if a.points.len() == b.points.len() => {
                let points = a
                    .points
                    .iter()
                    .zip(&b.points)
                    .map(|(left, right)| match (left, right) {
                        (Some(p), Some(q)) => Some(lerp_point(*p, *q, t)),
                        _ => *right,
                    })
                    .collect();
                Self::Path(PathPrimitive {
                    points,
                    closed: b.closed,
                    class_name: b.class_name.clone(),
                    opacity: lerp_f64(a.opacity, b.opacity, t),
                    translate_x: lerp_f64(a.translate_x, b.translate_x, t),
                })
            }
            (Self::Polygon(a), Self::Polygon(b)) if a.corners.len() == b.corners.len() => {
                let corners = a
                    .corners
                    .iter()
                    .zip(&b.corners)
                    .map(|(left, right)| lerp_point(*left, *right, t))
                    .collect();
                Self::Polygon(PolygonPrimitive {
                    corners,
                    class_name: b.class_name.clone(),
                    opacity: lerp_f64(a.opacity, b.opacity, t),
                    translate_x: lerp_f64(a.translate_x, b.translate_x, t),
                })
            }
            (Self::Rect(a), Self::Rect(b)) => Self::Rect(RectPrimitive {
                x: lerp_f64(a.x, b.x, t),
                y: lerp_f64(a.y, b.y, t),
                width: lerp_f64(a.width, b.width, t),
                height: lerp_f64(a.height, b.height, t),
                class_name: b.class_name.clone(),
                opacity: lerp_f64(a.opacity, b.opacity, t),
            }),
            (Self::Text(a), Self::Text(b)) => Self::Text(TextPrimitive {
                x: lerp_f64(a.x, b.x, t),
                y: lerp_f64(a.y, b.y, t),
                lines: b.lines.clone(),
                rotate_deg: lerp_f64(a.rotate_deg, b.rotate_deg, t),
                class_name: b.class_name.clone(),
                opacity: lerp_f64(a.opacity, b.opacity, t),
            }),
            (Self::Circle(a), Self::Circle(b)) => Self::Circle(CirclePrimitive {
                center: lerp_point(a.center, b.center, t),
                radius: lerp_f64(a.radius, b.radius, t),
                class_name: b.class_name.clone(),
                opacity: lerp_f64(a.opacity, b.opacity, t),
            }),
            (Self::Arc(a), Self::Arc(b)) => Self::Arc(ArcPrimitive {
                center: lerp_point(a.center, b.center, t),
                radius: lerp_f64(a.radius, b.radius, t),
                start_angle: lerp_f64(a.start_angle, b.start_angle, t),
                end_angle: lerp_f64(a.end_angle, b.end_angle, t),
                inner_radius_ratio: lerp_f64(a.inner_radius_ratio, b.inner_radius_ratio, t),
                class_name: b.class_name.clone(),
                opacity: lerp_f64(a.opacity, b.opacity, t),
            }),
            _ => to.clone(),
        }
    }
}

fn lerp_f64(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn lerp_point(from: Point, to: Point, t: f64) -> Point {
    Point::new(lerp_f64(from.x, to.x, t), lerp_f64(from.y, to.y, t))
}
