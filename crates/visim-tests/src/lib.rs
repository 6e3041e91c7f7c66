//! Integration tests for the visim crates.
//!
//! End-to-end scenarios that go through the byte boundary, the colorimetric
//! core and a transform together.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use visim_color::convert::{
        linear_rgb_to_lms, linear_to_rgba, lms_to_linear_rgb, lms_to_opponent, opponent_to_lms,
        rgba_to_linear,
    };
    use visim_core::{Error, RgbBuffer, RgbaImage};
    use visim_math::Vec3;
    use visim_ops::{
        AgePreset, DaltonizeParams, DeficiencyType, Dichromat, Settings, Wing,
        daltonize_and_simulate, daltonize_correct, simulate_deficiency, simulate_infant_vision,
        simulate_lms,
    };

    /// Scrambled bytes from a multiplicative hash of the sample index.
    fn scrambled_image(seed: u32, w: u32, h: u32) -> RgbaImage {
        let bytes = (0..w * h * 4)
            .map(|i| ((i ^ seed.wrapping_mul(0x9e37)).wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();
        RgbaImage::from_raw(w, h, bytes).unwrap()
    }

    #[test]
    fn test_normal_simulation_is_identity_through_bytes() {
        let img = scrambled_image(1, 17, 9);
        let linear = rgba_to_linear(&img);
        let seen = simulate_deficiency(&linear, DeficiencyType::Normal).unwrap();
        assert!(seen.max_abs_diff(&linear) <= 1e-6);
        assert_eq!(linear_to_rgba(&seen, &img.alpha()).unwrap(), img);
    }

    #[test]
    fn test_lms_roundtrip_within_tolerance() {
        let img = scrambled_image(2, 8, 8);
        for px in rgba_to_linear(&img).pixels() {
            let v = Vec3::from_f32(px);
            let back = lms_to_linear_rgb(linear_rgb_to_lms(v));
            assert!((back - v).abs().max_element() < 1e-6);
        }
    }

    #[test]
    fn test_opponent_inverse_scattered_triplets() {
        let img = scrambled_image(42, 40, 50);
        for px in img.pixels() {
            let lms = Vec3::new(px[0] as f64, px[1] as f64, px[2] as f64) / 255.0;
            let back = opponent_to_lms(lms_to_opponent(lms));
            assert!((back - lms).abs().max_element() < 1e-6);
        }
    }

    #[test]
    fn test_deuteranope_red_green_keeps_l_and_s() {
        let rgb = RgbBuffer::from_fn(2, 2, |x, _| if x == 0 { [1.0, 0.0, 0.0] } else { [0.0, 1.0, 0.0] });
        let lms = RgbBuffer::from_fn(2, 2, |x, y| {
            linear_rgb_to_lms(Vec3::from_f32(rgb.pixel((y * 2 + x) as usize))).to_f32()
        });

        let first = simulate_lms(&lms, DeficiencyType::Deuteranope).unwrap();
        for i in 0..4 {
            assert_eq!(first.pixel(i)[0], lms.pixel(i)[0]);
            assert_eq!(first.pixel(i)[2], lms.pixel(i)[2]);
        }
        // M actually moves for saturated primaries
        assert!(first.max_abs_diff(&lms) > 1e-3);

        let d = Dichromat::new(DeficiencyType::Deuteranope);
        for i in 0..4 {
            assert_eq!(d.project(Vec3::from_f32(lms.pixel(i))).wing, Wing::First);
        }
        for _ in 0..3 {
            assert_eq!(simulate_lms(&lms, DeficiencyType::Deuteranope).unwrap(), first);
            assert_eq!(
                simulate_deficiency(&rgb, DeficiencyType::Deuteranope).unwrap(),
                simulate_deficiency(&rgb, DeficiencyType::Deuteranope).unwrap()
            );
        }
    }

    #[test]
    fn test_daltonize_zero_strength_through_bytes() {
        let img = scrambled_image(3, 16, 12);
        let linear = rgba_to_linear(&img);
        let out = daltonize_correct(&linear, &DaltonizeParams::ZERO).unwrap();
        assert!(out.max_abs_diff(&linear) < 1e-5);
        assert_eq!(linear_to_rgba(&out, &img.alpha()).unwrap(), img);
    }

    #[test]
    fn test_daltonize_uniform_color_stays_finite() {
        let img = RgbaImage::filled(10, 10, [200, 40, 40, 255]);
        let linear = rgba_to_linear(&img);
        let out = daltonize_correct(&linear, &DaltonizeParams::new(1.0, 1.0, 1.0)).unwrap();
        assert!(out.data().iter().all(|v| v.is_finite()));
        assert_eq!(linear_to_rgba(&out, &img.alpha()).unwrap(), img);
    }

    #[test]
    fn test_daltonize_improves_deuteranope_separation() {
        // Red and green patches a deuteranope barely tells apart
        let rgb = RgbBuffer::from_fn(16, 16, |x, _| if x < 8 { [0.6, 0.25, 0.1] } else { [0.25, 0.4, 0.1] });
        let kind = DeficiencyType::Deuteranope;
        let separation = |b: &RgbBuffer| {
            let a = Vec3::from_f32(b.pixel(0));
            let c = Vec3::from_f32(b.pixel(15));
            let d = a - c;
            d.dot(d).sqrt()
        };

        let before = separation(&simulate_deficiency(&rgb, kind).unwrap());
        let (_, after) = daltonize_and_simulate(&rgb, &DaltonizeParams::new(1.0, 1.0, 1.0), kind).unwrap();
        assert!(separation(&after) > before);
    }

    #[test]
    fn test_infant_mid_gray_week0() {
        let gray = RgbaImage::filled(4, 4, [128, 128, 128, 255]);
        let out = simulate_infant_vision(&gray, AgePreset::Week0, 50.0, 50.0).unwrap();
        assert_eq!(out, gray);
    }

    #[test]
    fn test_infant_adult_at_distance_is_unchanged() {
        let img = scrambled_image(4, 16, 16);
        // tiny angular size: every sigma is far below 0.01 px
        let out = simulate_infant_vision(&img, AgePreset::Adult, 50.0, 5.0).unwrap();
        for (a, b) in img.as_raw().iter().zip(out.as_raw()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
        assert_eq!(out.alpha(), img.alpha());
    }

    #[test]
    fn test_infant_huge_blur_is_flat_mean() {
        let img = scrambled_image(5, 32, 32);
        let out = simulate_infant_vision(&img, AgePreset::Week0, 10.0, 2000.0).unwrap();
        let first = out.pixel(0);
        let n = img.pixel_count() as f64;
        for c in 0..3 {
            let mean = img.pixels().map(|p| p[c] as f64).sum::<f64>() / n;
            assert_abs_diff_eq!(first[c] as f64, mean, epsilon = 1.0);
        }
        assert!(out.pixels().all(|p| p[..3] == first[..3]));
        assert_eq!(out.alpha(), img.alpha());
    }

    #[test]
    fn test_infant_non_square_then_crop_retry() {
        let img = scrambled_image(6, 12, 8);
        let err = simulate_infant_vision(&img, AgePreset::Week8, 50.0, 60.0).unwrap_err();
        assert_eq!(err.as_core(), Some(&Error::NonSquareImage { width: 12, height: 8 }));
        let out = simulate_infant_vision(&img.center_square_crop(), AgePreset::Week8, 50.0, 60.0).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
    }

    #[test]
    fn test_selectors_from_settings_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "deficiency: protanope\nage: week12\ngeometry:\n  view_dist_cm: 40").unwrap();
        let s = Settings::from_file(file.path()).unwrap();
        assert_eq!(s.deficiency, DeficiencyType::Protanope);

        let img = scrambled_image(7, 8, 8);
        let a = s.infant_vision().simulate(&img).unwrap();
        let b = simulate_infant_vision(&img, AgePreset::Week12, 50.0, 40.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_selectors() {
        assert!("week5".parse::<AgePreset>().unwrap_err().is_selector_error());
        assert!("colorblind".parse::<DeficiencyType>().unwrap_err().is_selector_error());
    }

    #[test]
    fn test_empty_images_rejected_everywhere() {
        let empty = RgbBuffer::new(0, 4);
        assert!(simulate_deficiency(&empty, DeficiencyType::Protanope).is_err());
        assert!(daltonize_correct(&empty, &DaltonizeParams::default()).is_err());
        assert!(simulate_infant_vision(&RgbaImage::new(0, 0), AgePreset::Week4, 50.0, 60.0).is_err());
    }
}
