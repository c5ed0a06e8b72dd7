//! Closed-form circle through three points.

use super::types::{CircleModel, Point};

/// Construct the unique circle through `p1`, `p2` and `p3`.
///
/// The center is the intersection of the perpendicular bisectors of the
/// chords `p1p2` and `p2p3`, solved from their slopes. Points are permuted so
/// that neither chord is vertical before the slopes are taken.
///
/// Returns `None` for collinear points, which includes three points sharing
/// one x-coordinate and any repeated point.
pub fn construct_circle(p1: Point, p2: Point, p3: Point) -> Option<CircleModel> {
    if is_collinear(p1, p2, p3) {
        return None;
    }

    let (p1, p2, p3) = if p1.x == p2.x {
        (p1, p3, p2)
    } else if p2.x == p3.x {
        (p2, p1, p3)
    } else {
        (p1, p2, p3)
    };

    let [x1, y1] = [p1.x as f64, p1.y as f64];
    let [x2, y2] = [p2.x as f64, p2.y as f64];
    let [x3, y3] = [p3.x as f64, p3.y as f64];

    let ma = (y2 - y1) / (x2 - x1);
    let mb = (y3 - y2) / (x3 - x2);
    if ma == mb {
        return None;
    }

    let cx = (ma * mb * (y1 - y3) + mb * (x1 + x2) - ma * (x2 + x3)) / (2.0 * (mb - ma));

    // Substitute into the bisector of a non-horizontal chord; its slope is
    // the negative reciprocal of the chord slope.
    let cy = if ma == 0.0 {
        -(cx - (x2 + x3) * 0.5) / mb + (y2 + y3) * 0.5
    } else {
        -(cx - (x1 + x2) * 0.5) / ma + (y1 + y2) * 0.5
    };

    let radius = ((x1 - cx).powi(2) + (y1 - cy).powi(2)).sqrt();
    if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
        return None;
    }

    Some(CircleModel {
        center: [cx, cy],
        radius,
    })
}

/// Exact collinearity test on integer coordinates.
fn is_collinear(p1: Point, p2: Point, p3: Point) -> bool {
    let (ax, ay) = (p2.x as i64 - p1.x as i64, p2.y as i64 - p1.y as i64);
    let (bx, by) = (p3.x as i64 - p2.x as i64, p3.y as i64 - p2.y as i64);
    ax * by - ay * bx == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::prelude::*;

    fn assert_on_circle(c: &CircleModel, pts: &[Point]) {
        for p in pts {
            let d = c.distance_to_outline(p.x as f64, p.y as f64);
            assert!(d < 1e-6, "point {:?} is {d:.3e} px off {:?}", p, c);
        }
    }

    #[test]
    fn right_triangle_circumcircle() {
        let p1 = Point::new(0, 0);
        let p2 = Point::new(4, 0);
        let p3 = Point::new(0, 4);
        let c = construct_circle(p1, p2, p3).expect("circle");
        assert_relative_eq!(c.center[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(c.center[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(c.radius, 8f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn points_on_known_circle() {
        let p1 = Point::new(140, 100);
        let p2 = Point::new(100, 140);
        let p3 = Point::new(60, 100);
        let c = construct_circle(p1, p2, p3).expect("circle");
        assert_relative_eq!(c.center[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(c.center[1], 100.0, epsilon = 1e-9);
        assert_relative_eq!(c.radius, 40.0, epsilon = 1e-9);
        assert_eq!(c.to_circle().radius, 40);
    }

    #[test]
    fn vertical_first_chord_is_permuted() {
        let pts = [Point::new(0, 0), Point::new(0, 10), Point::new(5, 5)];
        let c = construct_circle(pts[0], pts[1], pts[2]).expect("circle");
        assert_on_circle(&c, &pts);
    }

    #[test]
    fn vertical_second_chord_is_permuted() {
        let pts = [Point::new(-3, 2), Point::new(7, 0), Point::new(7, 9)];
        let c = construct_circle(pts[0], pts[1], pts[2]).expect("circle");
        assert_on_circle(&c, &pts);
    }

    #[test]
    fn horizontal_first_chord_uses_second_bisector() {
        let pts = [Point::new(0, 0), Point::new(10, 0), Point::new(3, 7)];
        let c = construct_circle(pts[0], pts[1], pts[2]).expect("circle");
        assert_relative_eq!(c.center[0], 5.0, epsilon = 1e-9);
        assert_on_circle(&c, &pts);
    }

    #[test]
    fn collinear_points_have_no_circle() {
        assert!(construct_circle(Point::new(0, 0), Point::new(1, 1), Point::new(5, 5)).is_none());
        assert!(construct_circle(Point::new(0, 3), Point::new(4, 3), Point::new(-9, 3)).is_none());
        assert!(construct_circle(Point::new(1, 2), Point::new(3, 8), Point::new(2, 5)).is_none());
    }

    #[test]
    fn all_equal_x_has_no_circle() {
        assert!(construct_circle(Point::new(4, 0), Point::new(4, 9), Point::new(4, -2)).is_none());
    }

    #[test]
    fn repeated_point_has_no_circle() {
        let p = Point::new(12, 30);
        assert!(construct_circle(p, p, Point::new(40, 1)).is_none());
        assert!(construct_circle(p, Point::new(40, 1), p).is_none());
    }

    #[test]
    fn random_triples_lie_on_result() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut checked = 0;
        while checked < 500 {
            let pts: Vec<Point> = (0..3)
                .map(|_| Point::new(rng.gen_range(-200..200), rng.gen_range(-200..200)))
                .collect();
            let Some(c) = construct_circle(pts[0], pts[1], pts[2]) else {
                assert!(is_collinear(pts[0], pts[1], pts[2]));
                continue;
            };
            for p in &pts {
                let d = c.distance_to_outline(p.x as f64, p.y as f64);
                assert!(d <= 1e-6 * c.radius.max(1.0), "{pts:?} -> {c:?}");
            }
            checked += 1;
        }
    }
}
