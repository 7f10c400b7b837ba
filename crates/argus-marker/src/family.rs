use crate::errors::MarkerError;

/// Code words of the Tag16H5 family.
const TAG16_H5_CODES: [u64; 30] = [
    0x27c8, 0x31b6, 0x3859, 0x569c, 0x6c76, 0x7ddb, 0xaf09, 0xf5a1, 0xfb8b, 0x1cb9, 0x28ca,
    0xe8dc, 0x1426, 0x5770, 0x9253, 0xb702, 0x063a, 0x8f34, 0xb4c0, 0x51ec, 0xe6f0, 0x5fa4,
    0xdd43, 0x1aaa, 0xe62f, 0x6dbc, 0xb6eb, 0xde10, 0x154d, 0xb57a,
];

/// Horizontal cell coordinates of the Tag16H5 payload bits.
const TAG16_H5_BIT_X: [u8; 16] = [1, 2, 3, 2, 4, 4, 4, 3, 4, 3, 2, 3, 1, 1, 1, 2];

/// Vertical cell coordinates of the Tag16H5 payload bits.
const TAG16_H5_BIT_Y: [u8; 16] = [1, 1, 1, 2, 1, 2, 3, 2, 4, 4, 4, 3, 4, 3, 2, 3];

/// A square fiducial tag family.
///
/// Cell coordinates are expressed in the border frame: the detected quad
/// spans `[0, width_at_border]` on both axes with `y` growing downward,
/// the outermost cell ring of that square is the black border, and the
/// payload cells sit inside it at `(bit_x[i], bit_y[i])`. Bit `i` of a
/// code word is stored at bit position `nbits - 1 - i`, and a set bit
/// means a white cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFamily {
    /// Human-readable family name.
    pub name: &'static str,
    /// The width of the tag including the border, in cells.
    pub width_at_border: usize,
    /// The total width of the tag including the quiet zone, in cells.
    pub total_width: usize,
    /// Whether the border is reversed (white inside, black outside).
    pub reversed_border: bool,
    /// Number of payload bits.
    pub nbits: usize,
    /// Horizontal cell coordinate of each payload bit.
    pub bit_x: &'static [u8],
    /// Vertical cell coordinate of each payload bit.
    pub bit_y: &'static [u8],
    /// Dictionary of valid code words, indexed by marker id.
    pub codes: &'static [u64],
}

/// A successful dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadMatch {
    /// Marker id (index into the family dictionary).
    pub id: usize,
    /// Number of corrected bit errors.
    pub hamming: u32,
    /// Number of 90-degree rotations applied before the match (0..4).
    pub rotation: u8,
}

impl TagFamily {
    /// The Tag16H5 family: 4x4 payload, 30 codes, minimum hamming
    /// distance 5 between code words.
    pub const fn tag16_h5() -> Self {
        Self {
            name: "tag16h5",
            width_at_border: 6,
            total_width: 8,
            reversed_border: false,
            nbits: 16,
            bit_x: &TAG16_H5_BIT_X,
            bit_y: &TAG16_H5_BIT_Y,
            codes: &TAG16_H5_CODES,
        }
    }

    /// The code word for a marker id.
    pub fn code_for_id(&self, id: usize) -> Result<u64, MarkerError> {
        self.codes
            .get(id)
            .copied()
            .ok_or(MarkerError::UnknownMarkerId {
                id,
                family: self.name,
                count: self.codes.len(),
            })
    }

    /// Whether bit `i` of `code` is set (a white cell).
    #[inline]
    pub fn bit_is_white(&self, code: u64, i: usize) -> bool {
        (code >> (self.nbits - 1 - i)) & 1 == 1
    }

    /// Rotate a code word by 90 degrees.
    ///
    /// Each payload cell `(x, y)` moves to `(width_at_border - 1 - y, x)`.
    pub fn rotate90(&self, code: u64) -> u64 {
        let wab = self.width_at_border as u8;
        let mut out = 0u64;
        for i in 0..self.nbits {
            if !self.bit_is_white(code, i) {
                continue;
            }
            let xr = wab - 1 - self.bit_y[i];
            let yr = self.bit_x[i];
            let j = self
                .bit_x
                .iter()
                .zip(self.bit_y.iter())
                .position(|(&bx, &by)| bx == xr && by == yr)
                .unwrap_or(i);
            out |= 1 << (self.nbits - 1 - j);
        }
        out
    }

    /// Match sampled payload bits against the dictionary.
    ///
    /// Tries all four rotations of the sampled code and returns the best
    /// match with at most `max_hamming` bit errors, preferring lower
    /// hamming distance.
    pub fn decode(&self, sampled: u64, max_hamming: u32) -> Option<PayloadMatch> {
        let mut best: Option<PayloadMatch> = None;
        let mut code = sampled;
        for rotation in 0..4u8 {
            for (id, &word) in self.codes.iter().enumerate() {
                let hamming = (code ^ word).count_ones();
                if hamming <= max_hamming && best.map_or(true, |b| hamming < b.hamming) {
                    best = Some(PayloadMatch {
                        id,
                        hamming,
                        rotation,
                    });
                    if hamming == 0 {
                        return best;
                    }
                }
            }
            code = self.rotate90(code);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout_is_consistent() {
        let family = TagFamily::tag16_h5();
        assert_eq!(family.bit_x.len(), family.nbits);
        assert_eq!(family.bit_y.len(), family.nbits);
        // payload cells sit strictly inside the border ring
        for i in 0..family.nbits {
            assert!(family.bit_x[i] >= 1 && (family.bit_x[i] as usize) < family.width_at_border - 1);
            assert!(family.bit_y[i] >= 1 && (family.bit_y[i] as usize) < family.width_at_border - 1);
        }
    }

    #[test]
    fn rotation_has_period_four() {
        let family = TagFamily::tag16_h5();
        for &code in family.codes {
            let mut rotated = code;
            for _ in 0..4 {
                rotated = family.rotate90(rotated);
            }
            assert_eq!(rotated, code);
        }
    }

    #[test]
    fn exact_codes_decode_to_their_id() {
        let family = TagFamily::tag16_h5();
        for (id, &code) in family.codes.iter().enumerate() {
            let matched = family.decode(code, 0).unwrap();
            assert_eq!(matched.id, id);
            assert_eq!(matched.hamming, 0);
            assert_eq!(matched.rotation, 0);
        }
    }

    #[test]
    fn rotated_codes_report_their_rotation() {
        let family = TagFamily::tag16_h5();
        let code = family.code_for_id(7).unwrap();
        // decode() rotates the sample forward, so a sample that is the
        // code rotated three times matches after one more rotation
        let sample = family.rotate90(family.rotate90(family.rotate90(code)));
        let matched = family.decode(sample, 0).unwrap();
        assert_eq!(matched.id, 7);
        assert_eq!(matched.rotation, 1);
    }

    #[test]
    fn single_bit_error_is_corrected() {
        let family = TagFamily::tag16_h5();
        let code = family.code_for_id(3).unwrap();
        let corrupted = code ^ (1 << 9);
        let matched = family.decode(corrupted, 1).unwrap();
        assert_eq!(matched.id, 3);
        assert_eq!(matched.hamming, 1);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let family = TagFamily::tag16_h5();
        assert!(matches!(
            family.code_for_id(30),
            Err(MarkerError::UnknownMarkerId { id: 30, .. })
        ));
    }
}
