pub const EMU_PER_INCH: i64 = 914_400; // drawing sizes in document XML
pub const EMU_PER_PIXEL: i64 = 9_525; // at 96 dpi

/// Converts EMUs to CSS pixels, rounded to two decimals
pub fn emu_to_px(emu: i64) -> f64 {
    (emu as f64 / EMU_PER_PIXEL as f64 * 100.0).round() / 100.0
}

/// `w:sz` values are in half-points
pub fn half_points_to_pt(half_points: u32) -> f32 {
    half_points as f32 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_inch_is_ninety_six_pixels() {
        assert_eq!(emu_to_px(EMU_PER_INCH), 96.0)
    }

    #[test]
    fn emu_rounds_to_two_decimals() {
        assert_eq!(emu_to_px(3_147_060), 330.4);
        assert_eq!(emu_to_px(2_098_040), 220.27)
    }

    #[test]
    fn half_points() {
        assert_eq!(half_points_to_pt(24), 12.0);
        assert_eq!(half_points_to_pt(21), 10.5)
    }
}
