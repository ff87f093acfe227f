use glam::Vec3;
use scroll_showcase::math::AABB;
use scroll_showcase::scene::{normalize, TARGET_SIZE};

#[cfg(test)]
mod aabb_tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-4.0, 5.0, 0.5),
            Vec3::new(2.0, 0.0, -6.0),
        ];

        let aabb = AABB::from_points(&points).unwrap();

        assert_eq!(aabb.min, Vec3::new(-4.0, -2.0, -6.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 5.0, 3.0));
    }

    #[test]
    fn test_aabb_from_no_points() {
        assert!(AABB::from_points(&[]).is_none());
    }

    #[test]
    fn test_aabb_center_offset_box() {
        let aabb = AABB::new(Vec3::new(5.0, 10.0, 15.0), Vec3::new(15.0, 20.0, 25.0));
        assert_eq!(aabb.center(), Vec3::new(10.0, 15.0, 20.0));
    }

    #[test]
    fn test_aabb_max_dimension_picks_longest_axis() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::new(2.0, 3.0, 40.0));
        assert_eq!(aabb.size(), Vec3::new(2.0, 3.0, 40.0));
        assert_eq!(aabb.max_dimension(), 40.0);
    }

    #[test]
    fn test_normalized_box_is_centered_and_sized() {
        for (min, max) in [
            (Vec3::new(3.0, -7.0, 1.0), Vec3::new(13.0, 5.0, 9.0)),
            (Vec3::splat(-0.01), Vec3::splat(0.02)),
            (Vec3::new(100.0, 200.0, 300.0), Vec3::new(500.0, 210.0, 320.0)),
        ] {
            let aabb = AABB::new(min, max);
            let fit = normalize(&aabb);

            assert!((fit.base_scale - TARGET_SIZE / aabb.max_dimension()).abs() < 1e-3);

            let placed = aabb.scaled_then_translated(fit.base_scale, fit.position);
            assert!(placed.center().length() < 1e-3, "center {:?}", placed.center());
            assert!((placed.max_dimension() - TARGET_SIZE).abs() < 1e-3);
        }
    }

    #[test]
    fn test_flat_box_still_normalizes() {
        // Zero depth is fine as long as one axis has extent
        let aabb = AABB::new(Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));
        let fit = normalize(&aabb);
        assert_eq!(fit.base_scale, 2.0);
    }
}
