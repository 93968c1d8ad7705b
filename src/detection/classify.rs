use crate::models::Category;

/// Smallest diameter, in millimeters, that counts as [`Category::Medium`].
pub const MEDIUM_MIN_MM: u32 = 47;
/// Largest diameter, in millimeters, that counts as [`Category::Medium`].
pub const MEDIUM_MAX_MM: u32 = 64;

/// Physical diameter of a circle with the given whole-pixel radius.
///
/// Halves round to even.
pub fn diameter_mm(radius_pixels: u32, pixel_ratio: f64) -> u32 {
    let mm = (radius_pixels as f64 * pixel_ratio * 2.0).round_ties_even();
    if mm <= 0.0 { 0 } else { mm as u32 }
}

pub fn classify(diameter_mm: u32) -> Category {
    if diameter_mm < MEDIUM_MIN_MM {
        Category::Small
    } else if diameter_mm > MEDIUM_MAX_MM {
        Category::Large
    } else {
        Category::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_bounds_are_inclusive() {
        assert_eq!(classify(0), Category::Small);
        assert_eq!(classify(46), Category::Small);
        assert_eq!(classify(47), Category::Medium);
        assert_eq!(classify(55), Category::Medium);
        assert_eq!(classify(64), Category::Medium);
        assert_eq!(classify(65), Category::Large);
    }

    #[test]
    fn diameter_scales_truncated_radius() {
        assert_eq!(diameter_mm(50, 1.0), 100);
        assert_eq!(diameter_mm(37, 0.2645833), 20);
        assert_eq!(diameter_mm(100, 0.2645833), 53);
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(diameter_mm(5, 0.25), 2);
        assert_eq!(diameter_mm(3, 0.25), 2);
        assert_eq!(diameter_mm(7, 0.25), 4);
    }
}
