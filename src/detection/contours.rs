use image::GrayImage;
use imageproc::contours::{self, Contour};
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

/// Maximum distance, in pixels, between a contour and its simplified polygon.
pub const SIMPLIFY_EPSILON: f64 = 3.0;

/// Trace every border in a binary edge image.
///
/// Both outer borders and hole borders are returned in tracing order; each
/// contour also records its parent, but nothing downstream relies on the
/// nesting.
pub fn find_contours(edges: &GrayImage) -> Vec<Contour<i32>> {
    contours::find_contours::<i32>(edges)
}

/// Approximate a contour by a closed polygon.
pub fn simplify(contour: &Contour<i32>) -> Vec<Point<i32>> {
    simplify_points(&contour.points)
}

pub fn simplify_points(points: &[Point<i32>]) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    approximate_polygon_dp(points, SIMPLIFY_EPSILON, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn blank_image_has_no_contours() {
        let edges = GrayImage::new(32, 32);
        assert!(find_contours(&edges).is_empty());
    }

    #[test]
    fn isolated_pixel_is_a_single_point_contour() {
        let mut edges = GrayImage::new(9, 9);
        edges.put_pixel(4, 4, Luma([255]));
        let found = find_contours(&edges);
        assert_eq!(found.len(), 1);
        assert_eq!(simplify(&found[0]), vec![Point::new(4, 4)]);
    }

    #[test]
    fn square_outline_has_outer_and_hole_borders() {
        let mut edges = GrayImage::new(30, 30);
        for i in 5..=25 {
            edges.put_pixel(i, 5, Luma([255]));
            edges.put_pixel(i, 25, Luma([255]));
            edges.put_pixel(5, i, Luma([255]));
            edges.put_pixel(25, i, Luma([255]));
        }
        let found = find_contours(&edges);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].parent, Some(0));
    }

    #[test]
    fn simplification_keeps_corners_of_a_square() {
        let mut edges = GrayImage::new(30, 30);
        for y in 5..=25 {
            for x in 5..=25 {
                edges.put_pixel(x, y, Luma([255]));
            }
        }
        let found = find_contours(&edges);
        let polygon = simplify(&found[0]);
        assert!(polygon.len() <= 5);
        for corner in [Point::new(5, 5), Point::new(25, 5), Point::new(25, 25), Point::new(5, 25)] {
            assert!(polygon.contains(&corner), "missing corner {corner:?} in {polygon:?}");
        }
    }
}
