//! Display Stream Compression parameters and PPS packing
//!
//! A panel descriptor only carries the handful of parameters it actually
//! chooses (version, slice geometry, bpc, bpp, block prediction). Before the
//! links are attached those are completed into a full rate-control
//! configuration for the picture size in use ([`DscConfig::for_picture`]),
//! which is what both the DSI host and the 128-byte picture parameter set
//! ([`PpsPayload`]) are built from.
//!
//! Rate-control constants and the buffer model follow VESA DSC 1.1 (RGB
//! input, no native 4:2:x).

/// Size of a packed picture parameter set.
pub const DSC_PPS_SIZE: usize = 128;

/// Number of rate-control buffer thresholds.
pub const DSC_NUM_BUF_RANGES: usize = 15;

const RC_PIXELS_PER_GROUP: u32 = 3;
/// bpg offsets carry 11 fractional bits.
const BPG_OFFSET_SCALE: u32 = 1 << 11;
const SCALE_DECREMENT_INTERVAL_MAX: u16 = 4095;
const RC_MODEL_SIZE_CONST: u16 = 8192;
const RC_EDGE_FACTOR_CONST: u8 = 6;
const RC_TGT_OFFSET_HI_CONST: u8 = 3;
const RC_TGT_OFFSET_LO_CONST: u8 = 3;
/// Buffer-fullness thresholds, in bits; the PPS carries them >> 6.
const RC_BUF_THRESH: [u16; DSC_NUM_BUF_RANGES - 1] = [
    896, 1792, 2688, 3584, 4480, 5376, 6272, 6720, 7168, 7616, 7744, 7872, 8000, 8064,
];

/// One rate-control range: QP bounds and bits-per-group offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RcRangeParameters {
    /// Minimum quantisation parameter.
    pub range_min_qp: u8,
    /// Maximum quantisation parameter.
    pub range_max_qp: u8,
    /// Bits-per-group offset (6-bit two's complement on the wire).
    pub range_bpg_offset: i8,
}

impl RcRangeParameters {
    const fn new(range_min_qp: u8, range_max_qp: u8, range_bpg_offset: i8) -> Self {
        Self {
            range_min_qp,
            range_max_qp,
            range_bpg_offset,
        }
    }

    /// Wire encoding: min_qp[15:11] max_qp[10:6] bpg_offset[5:0].
    #[allow(clippy::arithmetic_side_effects)]
    fn encode(self) -> u16 {
        // Truncation to 6 bits is the wire format of the signed offset.
        #[allow(clippy::cast_sign_loss)]
        let offset = u16::from(self.range_bpg_offset as u8) & 0x3F;
        (u16::from(self.range_min_qp) << 11) | (u16::from(self.range_max_qp) << 6) | offset
    }
}

/// Per-rate rate-control profile.
struct RcProfile {
    bits_per_component: u8,
    bits_per_pixel: u16,
    initial_xmit_delay: u16,
    first_line_bpg_offset: u8,
    initial_offset: u16,
    flatness_min_qp: u8,
    flatness_max_qp: u8,
    rc_quant_incr_limit0: u8,
    rc_quant_incr_limit1: u8,
    ranges: [RcRangeParameters; DSC_NUM_BUF_RANGES],
}

const RC_PROFILES: &[RcProfile] = &[
    // 8 bpc, 8 bpp
    RcProfile {
        bits_per_component: 8,
        bits_per_pixel: 8 << 4,
        initial_xmit_delay: 512,
        first_line_bpg_offset: 12,
        initial_offset: 6144,
        flatness_min_qp: 3,
        flatness_max_qp: 12,
        rc_quant_incr_limit0: 11,
        rc_quant_incr_limit1: 11,
        ranges: [
            RcRangeParameters::new(0, 4, 2),
            RcRangeParameters::new(0, 4, 0),
            RcRangeParameters::new(1, 5, 0),
            RcRangeParameters::new(1, 6, -2),
            RcRangeParameters::new(3, 7, -4),
            RcRangeParameters::new(3, 7, -6),
            RcRangeParameters::new(3, 7, -8),
            RcRangeParameters::new(3, 8, -8),
            RcRangeParameters::new(3, 9, -8),
            RcRangeParameters::new(3, 10, -10),
            RcRangeParameters::new(5, 11, -10),
            RcRangeParameters::new(5, 12, -12),
            RcRangeParameters::new(5, 13, -12),
            RcRangeParameters::new(7, 13, -12),
            RcRangeParameters::new(13, 15, -12),
        ],
    },
];

/// DSC encoder/decoder configuration.
///
/// Field names and units match the PPS: `bits_per_pixel` is in 1/16 bpp,
/// offsets are in the fixed-point formats the standard defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
#[allow(clippy::struct_excessive_bools)]
pub struct DscConfig {
    pub dsc_version_major: u8,
    pub dsc_version_minor: u8,
    pub line_buf_depth: u8,
    pub bits_per_component: u8,
    pub convert_rgb: bool,
    pub slice_count: u8,
    pub slice_width: u16,
    pub slice_height: u16,
    pub simple_422: bool,
    pub pic_width: u16,
    pub pic_height: u16,
    pub rc_tgt_offset_high: u8,
    pub rc_tgt_offset_low: u8,
    pub bits_per_pixel: u16,
    pub rc_edge_factor: u8,
    pub rc_quant_incr_limit1: u8,
    pub rc_quant_incr_limit0: u8,
    pub initial_xmit_delay: u16,
    pub initial_dec_delay: u16,
    pub block_pred_enable: bool,
    pub first_line_bpg_offset: u8,
    pub initial_offset: u16,
    pub rc_buf_thresh: [u16; DSC_NUM_BUF_RANGES - 1],
    pub rc_range_params: [RcRangeParameters; DSC_NUM_BUF_RANGES],
    pub rc_model_size: u16,
    pub flatness_min_qp: u8,
    pub flatness_max_qp: u8,
    pub initial_scale_value: u8,
    pub scale_decrement_interval: u16,
    pub scale_increment_interval: u16,
    pub nfl_bpg_offset: u16,
    pub slice_bpg_offset: u16,
    pub final_offset: u16,
    pub vbr_enable: bool,
    pub mux_word_size: u8,
    pub slice_chunk_size: u16,
    pub rc_bits: u16,
    pub native_422: bool,
    pub native_420: bool,
    pub second_line_bpg_offset: u8,
    pub nsl_bpg_offset: u16,
    pub second_line_offset_adj: u16,
}

impl DscConfig {
    /// Panel-chosen parameters; everything derived is left zero until
    /// [`DscConfig::for_picture`] fills it in.
    pub const fn new(
        version: (u8, u8),
        slice_width: u16,
        slice_height: u16,
        slice_count: u8,
        bits_per_component: u8,
        bits_per_pixel: u16,
        block_pred_enable: bool,
    ) -> Self {
        Self {
            dsc_version_major: version.0,
            dsc_version_minor: version.1,
            line_buf_depth: 0,
            bits_per_component,
            convert_rgb: false,
            slice_count,
            slice_width,
            slice_height,
            simple_422: false,
            pic_width: 0,
            pic_height: 0,
            rc_tgt_offset_high: 0,
            rc_tgt_offset_low: 0,
            bits_per_pixel,
            rc_edge_factor: 0,
            rc_quant_incr_limit1: 0,
            rc_quant_incr_limit0: 0,
            initial_xmit_delay: 0,
            initial_dec_delay: 0,
            block_pred_enable,
            first_line_bpg_offset: 0,
            initial_offset: 0,
            rc_buf_thresh: [0; DSC_NUM_BUF_RANGES - 1],
            rc_range_params: [RcRangeParameters {
                range_min_qp: 0,
                range_max_qp: 0,
                range_bpg_offset: 0,
            }; DSC_NUM_BUF_RANGES],
            rc_model_size: 0,
            flatness_min_qp: 0,
            flatness_max_qp: 0,
            initial_scale_value: 0,
            scale_decrement_interval: 0,
            scale_increment_interval: 0,
            nfl_bpg_offset: 0,
            slice_bpg_offset: 0,
            final_offset: 0,
            vbr_enable: false,
            mux_word_size: 0,
            slice_chunk_size: 0,
            rc_bits: 0,
            native_422: false,
            native_420: false,
            second_line_bpg_offset: 0,
            nsl_bpg_offset: 0,
            second_line_offset_adj: 0,
        }
    }

    /// Complete this configuration for a `pic_width` × `pic_height` picture
    /// (per link).
    ///
    /// The picture must be exactly `slice_count` slices wide and a whole
    /// number of slices tall.
    pub fn for_picture(&self, pic_width: u16, pic_height: u16) -> Result<Self, DscError> {
        if self.slice_width == 0 || self.slice_height == 0 || self.slice_count == 0 {
            return Err(DscError::SliceGeometry);
        }
        let covered = u32::from(self.slice_width).checked_mul(u32::from(self.slice_count));
        let whole_rows = pic_height.checked_rem(self.slice_height) == Some(0);
        if covered != Some(u32::from(pic_width)) || !whole_rows {
            return Err(DscError::SliceGeometry);
        }

        let profile = RC_PROFILES
            .iter()
            .find(|p| {
                p.bits_per_component == self.bits_per_component
                    && p.bits_per_pixel == self.bits_per_pixel
            })
            .ok_or(DscError::UnsupportedRate)?;

        let mut cfg = *self;
        cfg.pic_width = pic_width;
        cfg.pic_height = pic_height;
        cfg.set_const_params();
        cfg.rc_buf_thresh = RC_BUF_THRESH;
        cfg.apply_profile(profile);
        cfg.compute_rc_parameters()?;
        Ok(cfg)
    }

    fn set_const_params(&mut self) {
        self.rc_model_size = RC_MODEL_SIZE_CONST;
        self.rc_edge_factor = RC_EDGE_FACTOR_CONST;
        self.rc_tgt_offset_high = RC_TGT_OFFSET_HI_CONST;
        self.rc_tgt_offset_low = RC_TGT_OFFSET_LO_CONST;
        self.convert_rgb = true;
        self.line_buf_depth = self.bits_per_component.saturating_add(1);
        self.mux_word_size = if self.bits_per_component <= 10 { 48 } else { 64 };
    }

    fn apply_profile(&mut self, profile: &RcProfile) {
        self.initial_xmit_delay = profile.initial_xmit_delay;
        self.first_line_bpg_offset = profile.first_line_bpg_offset;
        self.initial_offset = profile.initial_offset;
        self.flatness_min_qp = profile.flatness_min_qp;
        self.flatness_max_qp = profile.flatness_max_qp;
        self.rc_quant_incr_limit0 = profile.rc_quant_incr_limit0;
        self.rc_quant_incr_limit1 = profile.rc_quant_incr_limit1;
        self.rc_range_params = profile.ranges;
        // 8 * rc_model_size / (rc_model_size - initial_offset), integer.
        let model = u32::from(self.rc_model_size);
        let headroom = model.saturating_sub(u32::from(self.initial_offset)).max(1);
        self.initial_scale_value = model
            .checked_mul(8)
            .and_then(|m| m.checked_div(headroom))
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or(u8::MAX);
    }

    /// Derive the rate-control fields from geometry, bpp and the model.
    fn compute_rc_parameters(&mut self) -> Result<(), DscError> {
        let bpp = u32::from(self.bits_per_pixel);
        let bpc = u32::from(self.bits_per_component);
        let slice_width = u32::from(self.slice_width);
        let slice_height = u32::from(self.slice_height);
        let mux_word_size = u32::from(self.mux_word_size);
        let rc_model_size = u32::from(self.rc_model_size);
        let initial_offset = u32::from(self.initial_offset);
        let initial_xmit_delay = u32::from(self.initial_xmit_delay);
        let first_line_bpg_offset = u32::from(self.first_line_bpg_offset);

        let groups_per_line = slice_width.div_ceil(RC_PIXELS_PER_GROUP);
        let slice_chunk_size = rc(slice_width.checked_mul(bpp))?.div_ceil(8 * 16);
        self.slice_chunk_size = narrow(slice_chunk_size)?;

        // 3 * (mux_word_size + (4 * bpc + 4) - 2)
        let mut num_extra_mux_bits = rc(bpc
            .checked_mul(4)
            .and_then(|b| b.checked_add(4))
            .and_then(|b| b.checked_add(mux_word_size))
            .and_then(|b| b.checked_sub(2))
            .and_then(|b| b.checked_mul(3)))?;
        let slice_bits = rc(slice_chunk_size
            .checked_mul(8)
            .and_then(|b| b.checked_mul(slice_height)))?;
        // A slice smaller than the mux overhead has no valid budget.
        let mut payload_bits = rc(slice_bits.checked_sub(num_extra_mux_bits))?;
        while num_extra_mux_bits > 0 && payload_bits.checked_rem(mux_word_size) != Some(0) {
            num_extra_mux_bits = num_extra_mux_bits.saturating_sub(1);
            payload_bits = payload_bits.saturating_add(1);
        }

        let mut initial_scale_value = u32::from(self.initial_scale_value);
        if groups_per_line < initial_scale_value.saturating_sub(8) {
            initial_scale_value = rc(groups_per_line.checked_add(8))?;
            self.initial_scale_value = u8::try_from(initial_scale_value)
                .map_err(|_| DscError::RateControl)?;
        }

        self.scale_decrement_interval = match initial_scale_value.checked_sub(8) {
            Some(excess) if excess > 0 => narrow(rc(groups_per_line.checked_div(excess))?)?,
            _ => SCALE_DECREMENT_INTERVAL_MAX,
        };

        let xmit_bits = rc(initial_xmit_delay
            .checked_mul(bpp)
            .and_then(|b| b.checked_add(8))
            .and_then(|b| b.checked_div(16)))?;
        let final_offset =
            rc(rc_model_size.checked_add(num_extra_mux_bits))?.saturating_sub(xmit_bits);
        if final_offset >= rc_model_size {
            return Err(DscError::RateControl);
        }
        self.final_offset = narrow(final_offset)?;

        let final_scale = rc(rc_model_size
            .checked_sub(final_offset)
            .and_then(|headroom| rc_model_size.checked_mul(8)?.checked_div(headroom)))?;
        let nfl_bpg_offset = match slice_height.checked_sub(1) {
            Some(lines) if lines > 0 => {
                rc(first_line_bpg_offset.checked_mul(BPG_OFFSET_SCALE))?.div_ceil(lines)
            }
            _ => 0,
        };
        self.nfl_bpg_offset = narrow(nfl_bpg_offset)?;

        let groups_total = rc(groups_per_line.checked_mul(slice_height))?;
        if groups_total == 0 {
            return Err(DscError::SliceGeometry);
        }
        let slice_bpg_offset = rc(rc_model_size
            .checked_sub(initial_offset)
            .and_then(|b| b.checked_add(num_extra_mux_bits))
            .and_then(|b| b.checked_mul(BPG_OFFSET_SCALE)))?
            .div_ceil(groups_total);
        self.slice_bpg_offset = narrow(slice_bpg_offset)?;

        self.scale_increment_interval = match final_scale.checked_sub(9) {
            Some(steps) if steps > 0 => {
                let per_group = rc(nfl_bpg_offset
                    .checked_add(slice_bpg_offset)
                    .and_then(|o| o.checked_mul(steps)))?;
                let scaled = rc(final_offset.checked_mul(BPG_OFFSET_SCALE))?;
                narrow(rc(scaled.checked_div(per_group))?)?
            }
            _ => 0,
        };

        let rbs_min = rc(rc_model_size
            .checked_sub(initial_offset)
            .and_then(|b| b.checked_add(initial_xmit_delay.checked_mul(bpp)?.div_ceil(16)))
            .and_then(|b| b.checked_add(groups_per_line.checked_mul(first_line_bpg_offset)?)))?;
        let hrd_delay = rc(rbs_min.checked_mul(16))?.div_ceil(bpp);
        self.rc_bits = narrow(rc(hrd_delay.checked_mul(bpp).and_then(|b| b.checked_div(16)))?)?;
        self.initial_dec_delay = narrow(hrd_delay.saturating_sub(initial_xmit_delay))?;
        Ok(())
    }

    /// Pack this configuration into its wire-format PPS.
    pub fn pps_payload(&self) -> PpsPayload {
        PpsPayload::pack(self)
    }
}

fn rc(value: Option<u32>) -> Result<u32, DscError> {
    value.ok_or(DscError::RateControl)
}

fn narrow(value: u32) -> Result<u16, DscError> {
    u16::try_from(value).map_err(|_| DscError::RateControl)
}

/// Packed 128-byte DSC picture parameter set.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PpsPayload([u8; DSC_PPS_SIZE]);

impl PpsPayload {
    /// Serialise `cfg` into the standard PPS byte layout (big-endian fields).
    #[allow(clippy::arithmetic_side_effects)]
    pub fn pack(cfg: &DscConfig) -> Self {
        let mut w = PpsWriter::new();

        w.u8((cfg.dsc_version_major << 4) | (cfg.dsc_version_minor & 0x0F));
        w.u8(0); // pps_identifier
        w.skip(1);
        w.u8((cfg.bits_per_component << 4) | (cfg.line_buf_depth & 0x0F));
        w.u8(
            (u8::from(cfg.block_pred_enable) << 5)
                | (u8::from(cfg.convert_rgb) << 4)
                | (u8::from(cfg.simple_422) << 3)
                | (u8::from(cfg.vbr_enable) << 2)
                | (cfg.bits_per_pixel.to_be_bytes()[0] & 0x03),
        );
        w.u8(cfg.bits_per_pixel.to_be_bytes()[1]);
        w.be16(cfg.pic_height);
        w.be16(cfg.pic_width);
        w.be16(cfg.slice_height);
        w.be16(cfg.slice_width);
        w.be16(cfg.slice_chunk_size);
        w.be16(cfg.initial_xmit_delay & 0x03FF);
        w.be16(cfg.initial_dec_delay);
        w.skip(1);
        w.u8(cfg.initial_scale_value & 0x3F);
        w.be16(cfg.scale_increment_interval);
        w.be16(cfg.scale_decrement_interval & 0x0FFF);
        w.skip(1);
        w.u8(cfg.first_line_bpg_offset & 0x1F);
        w.be16(cfg.nfl_bpg_offset);
        w.be16(cfg.slice_bpg_offset);
        w.be16(cfg.initial_offset);
        w.be16(cfg.final_offset);
        w.u8(cfg.flatness_min_qp & 0x1F);
        w.u8(cfg.flatness_max_qp & 0x1F);
        w.be16(cfg.rc_model_size);
        w.u8(cfg.rc_edge_factor & 0x0F);
        w.u8(cfg.rc_quant_incr_limit0 & 0x1F);
        w.u8(cfg.rc_quant_incr_limit1 & 0x1F);
        w.u8((cfg.rc_tgt_offset_high << 4) | (cfg.rc_tgt_offset_low & 0x0F));
        for thresh in cfg.rc_buf_thresh {
            w.u8(thresh.to_be_bytes()[0] << 2 | thresh.to_be_bytes()[1] >> 6);
        }
        for range in cfg.rc_range_params {
            w.be16(range.encode());
        }
        w.u8(u8::from(cfg.native_422) | (u8::from(cfg.native_420) << 1));
        w.u8(cfg.second_line_bpg_offset & 0x1F);
        w.be16(cfg.nsl_bpg_offset);
        w.be16(cfg.second_line_offset_adj);
        // Bytes 94..128 are reserved.

        Self(w.finish())
    }

    /// Raw payload bytes.
    pub fn as_bytes(&self) -> &[u8; DSC_PPS_SIZE] {
        &self.0
    }
}

impl core::fmt::Debug for PpsPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("PpsPayload").field(&&self.0[..]).finish()
    }
}

/// Sequential big-endian writer over a zeroed PPS buffer.
struct PpsWriter {
    buf: [u8; DSC_PPS_SIZE],
    pos: usize,
}

impl PpsWriter {
    fn new() -> Self {
        Self {
            buf: [0; DSC_PPS_SIZE],
            pos: 0,
        }
    }

    fn u8(&mut self, value: u8) {
        if let Some(slot) = self.buf.get_mut(self.pos) {
            *slot = value;
        }
        self.pos = self.pos.saturating_add(1);
    }

    fn be16(&mut self, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.u8(hi);
        self.u8(lo);
    }

    fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    fn finish(self) -> [u8; DSC_PPS_SIZE] {
        self.buf
    }
}

/// DSC configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DscError {
    /// Slices do not tile the picture.
    SliceGeometry,
    /// No rate-control profile for this bpc/bpp pair.
    UnsupportedRate,
    /// Derived rate-control values are out of range.
    RateControl,
}

impl DscError {
    /// Negative errno-style code.
    pub const fn code(self) -> i32 {
        match self {
            Self::SliceGeometry | Self::UnsupportedRate => -22,
            Self::RateControl => -34,
        }
    }
}

impl core::fmt::Display for DscError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SliceGeometry => write!(f, "DSC slices do not tile the picture"),
            Self::UnsupportedRate => write!(f, "no DSC rate-control profile for bpc/bpp"),
            Self::RateControl => write!(f, "DSC rate-control parameters out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DscError {}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    /// 2 × 762-px slices, 16 lines, 8 bpc at 8 bpp, a tablet-class panel
    /// driven over two links.
    const BASE: DscConfig = DscConfig::new((1, 1), 762, 16, 2, 8, 8 << 4, true);

    #[test]
    fn test_rc_parameters_for_two_slice_picture() {
        let cfg = BASE.for_picture(1524, 2032).unwrap();

        assert_eq!(cfg.line_buf_depth, 9);
        assert_eq!(cfg.mux_word_size, 48);
        assert_eq!(cfg.initial_scale_value, 32);
        assert_eq!(cfg.slice_chunk_size, 762);
        assert_eq!(cfg.scale_decrement_interval, 10);
        assert_eq!(cfg.final_offset, 4336);
        assert_eq!(cfg.nfl_bpg_offset, 1639);
        assert_eq!(cfg.slice_bpg_offset, 1154);
        assert_eq!(cfg.scale_increment_interval, 454);
        assert_eq!(cfg.rc_bits, 9192);
        assert_eq!(cfg.initial_dec_delay, 637);
    }

    #[test]
    fn test_slices_must_tile_picture() {
        assert_eq!(
            BASE.for_picture(3048, 2032),
            Err(DscError::SliceGeometry),
            "two 762-px slices cannot cover 3048 px"
        );
        assert_eq!(BASE.for_picture(1524, 2033), Err(DscError::SliceGeometry));
    }

    #[test]
    fn test_unsupported_rate() {
        let cfg = DscConfig::new((1, 1), 762, 16, 2, 10, 8 << 4, true);
        assert_eq!(cfg.for_picture(1524, 2032), Err(DscError::UnsupportedRate));
    }

    #[test]
    fn test_slice_smaller_than_mux_overhead_rejected() {
        // 10x2 slice: 160 bits against 246 bits of mux overhead.
        let cfg = DscConfig::new((1, 1), 10, 2, 1, 8, 8 << 4, true);
        assert_eq!(cfg.for_picture(10, 2), Err(DscError::RateControl));
    }

    #[test]
    fn test_oversized_slice_rejected() {
        let cfg = DscConfig::new((1, 1), 60000, 60000, 1, 8, 8 << 4, true);
        assert_eq!(cfg.for_picture(60000, 60000), Err(DscError::RateControl));
    }

    #[test]
    fn test_pps_header_layout() {
        let cfg = BASE.for_picture(1524, 2032).unwrap();
        let pps = cfg.pps_payload();
        let b = pps.as_bytes();

        assert_eq!(b[0], 0x11, "DSC 1.1");
        assert_eq!(b[1], 0x00, "pps_identifier");
        assert_eq!(b[3], 0x89, "bpc 8, line buffer depth 9");
        assert_eq!(b[4], 0x30, "block prediction + convert_rgb, bpp high bits 0");
        assert_eq!(b[5], 0x80, "bpp low byte: 8 << 4");
        assert_eq!(&b[6..8], &2032u16.to_be_bytes());
        assert_eq!(&b[8..10], &1524u16.to_be_bytes());
        assert_eq!(&b[10..12], &16u16.to_be_bytes());
        assert_eq!(&b[12..14], &762u16.to_be_bytes());
        assert_eq!(&b[14..16], &762u16.to_be_bytes(), "chunk size");
        assert_eq!(&b[16..18], &512u16.to_be_bytes(), "initial xmit delay");
        assert_eq!(&b[18..20], &637u16.to_be_bytes(), "initial dec delay");
        assert_eq!(b[21], 32);
        assert_eq!(&b[24..26], &10u16.to_be_bytes());
        assert_eq!(b[27], 12);
        assert_eq!(&b[30..32], &1154u16.to_be_bytes());
        assert_eq!(&b[38..40], &8192u16.to_be_bytes());
        assert_eq!(b[43], 0x33, "rc target offsets hi/lo");
    }

    #[test]
    fn test_pps_rate_control_tables() {
        let cfg = BASE.for_picture(1524, 2032).unwrap();
        let pps = cfg.pps_payload();
        let b = pps.as_bytes();

        // Thresholds are sent >> 6.
        assert_eq!(b[44], (896u16 >> 6) as u8);
        assert_eq!(b[57], (8064u16 >> 6) as u8);

        // First range: min 0, max 4, offset +2.
        assert_eq!(u16::from_be_bytes([b[58], b[59]]), (4 << 6) | 2);
        // Fourth range: min 1, max 6, offset -2 (6-bit two's complement).
        assert_eq!(u16::from_be_bytes([b[64], b[65]]), (1 << 11) | (6 << 6) | 0x3E);

        assert!(b[94..].iter().all(|&x| x == 0), "reserved tail must be zero");
    }
}
