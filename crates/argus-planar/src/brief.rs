use argus_image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fast::Corner;

/// Number of bits in a descriptor.
pub const DESCRIPTOR_BITS: usize = 256;

/// Half-width of the square patch a descriptor is computed over.
pub const PATCH_RADIUS: i32 = 15;

/// Half-width of the box window used to smooth point samples.
const SMOOTH_RADIUS: i32 = 2;

/// Seed of the sampling pattern. Fixed so descriptors are comparable
/// across runs and across registered targets.
const PATTERN_SEED: u64 = 0x5143_9df2;

/// A 256-bit binary patch descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor(pub [u8; DESCRIPTOR_BITS / 8]);

impl Descriptor {
    /// Hamming distance to another descriptor.
    #[inline]
    pub fn distance(&self, other: &Descriptor) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// The point-pair sampling pattern shared by all descriptors.
pub struct DescriptorPattern {
    pairs: Vec<[i32; 4]>,
}

impl Default for DescriptorPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorPattern {
    /// Generate the pattern from the fixed seed.
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let pairs = (0..DESCRIPTOR_BITS)
            .map(|_| {
                [
                    rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS),
                    rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS),
                    rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS),
                    rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS),
                ]
            })
            .collect();
        Self { pairs }
    }

    /// Compute descriptors for corners whose patch fits in the image.
    ///
    /// Corners too close to the border are dropped; the returned corner
    /// list is parallel to the descriptor list.
    pub fn describe(&self, src: &GrayImage, corners: &[Corner]) -> (Vec<Corner>, Vec<Descriptor>) {
        let margin = PATCH_RADIUS + SMOOTH_RADIUS;
        let cols = src.cols() as i32;
        let rows = src.rows() as i32;

        let mut kept = Vec::new();
        let mut descriptors = Vec::new();
        for &corner in corners {
            if corner.x < margin
                || corner.y < margin
                || corner.x >= cols - margin
                || corner.y >= rows - margin
            {
                continue;
            }
            descriptors.push(self.describe_patch(src, corner.x, corner.y));
            kept.push(corner);
        }
        (kept, descriptors)
    }

    fn describe_patch(&self, src: &GrayImage, cx: i32, cy: i32) -> Descriptor {
        let mut bytes = [0u8; DESCRIPTOR_BITS / 8];
        for (bit, pair) in self.pairs.iter().enumerate() {
            let a = smoothed(src, cx + pair[0], cy + pair[1]);
            let b = smoothed(src, cx + pair[2], cy + pair[3]);
            if a < b {
                bytes[bit / 8] |= 1 << (bit % 8);
            }
        }
        Descriptor(bytes)
    }
}

/// Box-filtered intensity around a point. The caller guarantees the
/// window stays inside the image.
#[inline]
fn smoothed(src: &GrayImage, x: i32, y: i32) -> u32 {
    let cols = src.cols() as i32;
    let data = src.as_slice();
    let mut sum = 0u32;
    for dy in -SMOOTH_RADIUS..=SMOOTH_RADIUS {
        let row = (y + dy) * cols;
        for dx in -SMOOTH_RADIUS..=SMOOTH_RADIUS {
            sum += data[(row + x + dx) as usize] as u32;
        }
    }
    sum
}
