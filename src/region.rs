// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 跟踪区域 (Tracking region)
//!
//! The zone of interest is always the convex hull of the points the user
//! supplied, so masking and the outline agree on a single simple polygon.

use geo::{Area, ConvexHull, Coord, Intersects, LineString, MultiPoint, Point, Polygon};

use crate::error::{Result, SolutionError};

/// 默认区域: 1280x720 画面中央的矩形
pub const DEFAULT_REGION: [(i32, i32); 4] = [(150, 150), (1130, 150), (1130, 570), (150, 570)];

/// Convex polygon restricting where objects are tracked.
///
/// Vertices are stored without the closing point, in counter-clockwise order
/// (x right, y up convention) starting from the vertex with the smallest `y`
/// (then smallest `x`).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    points: Vec<(i32, i32)>,
    polygon: Polygon<f64>,
}

impl Region {
    /// Builds a region from user points, or from [`DEFAULT_REGION`] when `None`.
    pub fn build(points: Option<&[(i32, i32)]>) -> Result<Self> {
        Self::from_points(points.unwrap_or(&DEFAULT_REGION))
    }

    /// Convex hull of `points`. Fails when fewer than 3 non-collinear points remain.
    pub fn from_points(points: &[(i32, i32)]) -> Result<Self> {
        let mut distinct = points.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(SolutionError::InvalidRegion(distinct.len()));
        }

        let cloud: MultiPoint<f64> = distinct
            .iter()
            .map(|&(x, y)| Point::new(x as f64, y as f64))
            .collect();
        let hull = cloud.convex_hull();

        // 外环是闭合的, 去掉重复的首尾点
        let mut ring: Vec<(i32, i32)> = hull
            .exterior()
            .coords()
            .map(|c| (c.x.round() as i32, c.y.round() as i32))
            .collect();
        ring.dedup();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let mut vertices = drop_collinear(&ring);
        if vertices.len() < 3 {
            return Err(SolutionError::InvalidRegion(vertices.len()));
        }

        if signed_area2(&vertices) < 0 {
            vertices.reverse();
        }
        let start = vertices
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.1, p.0))
            .map(|(i, _)| i)
            .unwrap_or(0);
        vertices.rotate_left(start);

        let polygon = to_polygon(&vertices);
        Ok(Self {
            points: vertices,
            polygon,
        })
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inside-or-on-edge test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygon.intersects(&Point::new(x, y))
    }

    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// `(min_x, min_y, max_x, max_y)` of the vertices.
    pub fn bounding_box(&self) -> (i32, i32, i32, i32) {
        self.points.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        )
    }
}

/// 叉积在 i128 中计算: i32 坐标差可达 2^32, 乘积超出 i64
fn cross(o: (i32, i32), a: (i32, i32), b: (i32, i32)) -> i128 {
    let (ox, oy) = (o.0 as i128, o.1 as i128);
    (a.0 as i128 - ox) * (b.1 as i128 - oy) - (a.1 as i128 - oy) * (b.0 as i128 - ox)
}

/// Twice the signed shoelace area.
fn signed_area2(points: &[(i32, i32)]) -> i128 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            x0 as i128 * y1 as i128 - x1 as i128 * y0 as i128
        })
        .sum()
}

fn drop_collinear(ring: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let n = ring.len();
    if n < 3 {
        return ring.to_vec();
    }
    (0..n)
        .filter(|&i| cross(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]) != 0)
        .map(|i| ring[i])
        .collect()
}

fn to_polygon(points: &[(i32, i32)]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|&(x, y)| Coord {
            x: x as f64,
            y: y as f64,
        })
        .collect();
    // LineString 会在 Polygon::new 中自动闭合
    Polygon::new(LineString::new(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region() {
        let region = Region::build(None).unwrap();
        assert_eq!(region.points(), &DEFAULT_REGION);
        assert_eq!(region.area(), 980.0 * 420.0);
        assert_eq!(region.bounding_box(), (150, 150, 1130, 570));
    }

    #[test]
    fn test_hull_drops_interior_and_duplicate_points() {
        let pts = [(0, 0), (100, 0), (50, 50), (100, 100), (0, 100), (0, 0), (100, 0)];
        let region = Region::from_points(&pts).unwrap();
        assert_eq!(region.len(), 4);
        assert!(!region.points().contains(&(50, 50)));
    }

    #[test]
    fn test_hull_drops_collinear_edge_points() {
        let pts = [(0, 0), (50, 0), (100, 0), (100, 100), (0, 100)];
        let region = Region::from_points(&pts).unwrap();
        assert_eq!(region.len(), 4);
        assert!(!region.points().contains(&(50, 0)));
    }

    #[test]
    fn test_order_is_independent_of_input_order() {
        let a = Region::from_points(&[(150, 570), (1130, 150), (150, 150), (1130, 570)]).unwrap();
        let b = Region::build(None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_regions_are_rejected() {
        assert!(matches!(
            Region::from_points(&[(0, 0), (10, 10)]),
            Err(SolutionError::InvalidRegion(2))
        ));
        assert!(matches!(
            Region::from_points(&[(5, 5), (5, 5), (5, 5)]),
            Err(SolutionError::InvalidRegion(1))
        ));
        assert!(matches!(
            Region::from_points(&[(0, 0), (10, 10), (20, 20), (30, 30)]),
            Err(SolutionError::InvalidRegion(_))
        ));
        assert!(Region::from_points(&[]).is_err());
    }

    #[test]
    fn test_contains() {
        let region = Region::build(None).unwrap();
        assert!(region.contains(640.0, 360.0));
        assert!(region.contains(150.0, 150.0));
        assert!(!region.contains(10.0, 10.0));
        assert!(!region.contains(1200.0, 360.0));
    }

    #[test]
    fn test_triangle() {
        let region = Region::from_points(&[(0, 0), (10, 0), (0, 10)]).unwrap();
        assert_eq!(region.len(), 3);
        assert!(region.contains(2.0, 2.0));
        assert!(!region.contains(9.0, 9.0));
    }

    #[test]
    fn test_extreme_coordinates() {
        let region = Region::from_points(&[
            (-2_000_000_000, -2_000_000_000),
            (2_000_000_000, -2_000_000_000),
            (0, 2_000_000_000),
        ])
        .unwrap();
        assert_eq!(region.len(), 3);
        assert_eq!(region.points()[0], (-2_000_000_000, -2_000_000_000));
        assert!(region.contains(0.0, 0.0));

        let square = [
            (i32::MIN, i32::MIN),
            (i32::MAX, i32::MIN),
            (i32::MAX, i32::MAX),
            (i32::MIN, i32::MAX),
        ];
        let region = Region::from_points(&square).unwrap();
        assert_eq!(region.len(), 4);
        assert_eq!(region.points(), &square);

        // 极大坐标下的共线点仍被识别
        assert!(matches!(
            Region::from_points(&[(i32::MIN, i32::MIN), (0, 0), (i32::MAX, i32::MAX)]),
            Err(SolutionError::InvalidRegion(_))
        ));
    }
}
