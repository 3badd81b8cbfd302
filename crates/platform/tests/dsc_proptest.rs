//! Property-based tests for DSC parameter derivation and display timing math.
//! Verifies invariants hold for ALL inputs, not just the panels we ship.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use platform::{DisplayMode, DscConfig, DscError, DSC_PPS_SIZE};

proptest::proptest! {
    /// for_picture never panics on geometry that tiles the picture, so the
    /// rate-control derivation itself is exercised.
    #[test]
    fn for_picture_never_panics(
        slice_width in 1u16..=8192,
        slice_height in 1u16..=4096,
        slice_count in 1u8..=8,
        rows in 1u16..=16,
    ) {
        let cfg = DscConfig::new((1, 1), slice_width, slice_height, slice_count, 8, 8 << 4, true);
        let pic_width = u32::from(slice_width) * u32::from(slice_count);
        let pic_height = u32::from(slice_height) * u32::from(rows);
        if let (Ok(w), Ok(h)) = (u16::try_from(pic_width), u16::try_from(pic_height)) {
            match cfg.for_picture(w, h) {
                Ok(full) => assert_eq!(full.pps_payload().as_bytes().len(), DSC_PPS_SIZE),
                Err(e) => assert_ne!(e, DscError::SliceGeometry, "{w}x{h} tiles exactly"),
            }
        }
    }

    /// A picture that is not exactly slice_count slices wide is rejected.
    #[test]
    fn mismatched_width_rejected(extra in 1u16..=64) {
        let cfg = DscConfig::new((1, 1), 762, 16, 2, 8, 8 << 4, true);
        assert_eq!(cfg.for_picture(1524 + extra, 2032), Err(DscError::SliceGeometry));
        assert_eq!(cfg.for_picture(1524 - extra, 2032), Err(DscError::SliceGeometry));
    }

    /// Any whole number of 16-line slices is accepted at 8bpc/8bpp and the
    /// PPS carries the picture size big-endian at bytes 6..10.
    #[test]
    fn whole_slice_heights_accepted(slices in 1u16..=200) {
        let cfg = DscConfig::new((1, 1), 762, 16, 2, 8, 8 << 4, true);
        let height = slices * 16;
        let full = cfg.for_picture(1524, height).unwrap();
        let pps = full.pps_payload();
        let bytes = pps.as_bytes();
        assert_eq!(bytes.len(), DSC_PPS_SIZE);
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), height);
        assert_eq!(u16::from_be_bytes([bytes[8], bytes[9]]), 1524);
    }

    /// vrefresh inverts from_timings to within rounding.
    #[test]
    fn vrefresh_round_trips(
        hdisplay in 320u16..=4096,
        vdisplay in 240u16..=4096,
        porch in 1u16..=400,
        hz in 24u32..=165,
    ) {
        let m = DisplayMode::from_timings(hdisplay, porch, 4, porch, vdisplay, porch, 2, porch, hz);
        let got = m.vrefresh();
        assert!(got + 1 >= hz && got <= hz + 1, "{hz} Hz came back as {got} Hz");
    }
}
