use imageproc::contours::Contour;
use imageproc::point::Point;

use crate::detection::contours::simplify;
use crate::error::{MeasureError, Result};
use crate::models::{Candidate, EnclosingCircle};

/// Smallest circle containing every point (incremental Welzl).
///
/// A single point gives radius 0; collinear points give the circle spanning
/// the two extremes.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> EnclosingCircle {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let Some(&first) = pts.first() else {
        return EnclosingCircle::ZERO;
    };

    let mut circle = point_circle(first);
    for i in 1..pts.len() {
        if contains(&circle, pts[i]) {
            continue;
        }
        circle = point_circle(pts[i]);
        for j in 0..i {
            if contains(&circle, pts[j]) {
                continue;
            }
            circle = diameter_circle(pts[i], pts[j]);
            for k in 0..j {
                if !contains(&circle, pts[k]) {
                    circle = circumcircle(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    circle
}

fn contains(circle: &EnclosingCircle, p: (f64, f64)) -> bool {
    circle.contains(p.0, p.1)
}

fn point_circle(p: (f64, f64)) -> EnclosingCircle {
    EnclosingCircle {
        center_x: p.0,
        center_y: p.1,
        radius: 0.0,
    }
}

fn diameter_circle(a: (f64, f64), b: (f64, f64)) -> EnclosingCircle {
    let cx = (a.0 + b.0) / 2.0;
    let cy = (a.1 + b.1) / 2.0;
    EnclosingCircle {
        center_x: cx,
        center_y: cy,
        radius: (a.0 - cx).hypot(a.1 - cy),
    }
}

fn circumcircle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> EnclosingCircle {
    let bx = b.0 - a.0;
    let by = b.1 - a.1;
    let cx = c.0 - a.0;
    let cy = c.1 - a.1;
    let d = 2.0 * (bx * cy - by * cx);

    if d.abs() < 1e-12 {
        // Collinear: the widest pair spans the other point.
        return [diameter_circle(a, b), diameter_circle(a, c), diameter_circle(b, c)]
            .into_iter()
            .fold(EnclosingCircle::ZERO, |best, c| if c.radius > best.radius { c } else { best });
    }

    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    EnclosingCircle {
        center_x: a.0 + ux,
        center_y: a.1 + uy,
        radius: ux.hypot(uy),
    }
}

/// Simplify each contour and fit its enclosing circle, keeping extraction order.
pub fn fit_candidates(contours: &[Contour<i32>]) -> Vec<Candidate> {
    contours
        .iter()
        .map(|contour| {
            let polygon = simplify(contour);
            let circle = min_enclosing_circle(&polygon);
            Candidate { polygon, circle }
        })
        .collect()
}

/// Pick the candidate with the largest whole-pixel radius.
///
/// A later candidate only wins with a strictly larger radius, so the first
/// of several equal maxima is kept.
pub fn select_dominant(candidates: &[Candidate]) -> Result<&Candidate> {
    let (first, rest) = candidates.split_first().ok_or(MeasureError::NoContoursFound)?;

    let mut best = first;
    for candidate in rest {
        if candidate.radius_pixels() > best.radius_pixels() {
            best = candidate;
        }
    }

    if best.radius_pixels() > 0 {
        Ok(best)
    } else {
        Err(MeasureError::DegenerateCircle)
    }
}
