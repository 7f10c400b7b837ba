use std::cmp::Ordering;
use std::collections::BinaryHeap;

use argus_image::GrayImage;
use rayon::prelude::*;

/// A detected corner with its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    /// Column in pixels.
    pub x: i32,
    /// Row in pixels.
    pub y: i32,
    /// Sum-of-absolute-differences corner score.
    pub score: i32,
}

impl Ord for Corner {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| (self.y, self.x).cmp(&(other.y, other.x)))
    }
}

impl PartialOrd for Corner {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Flat-index offsets of the 16-pixel Bresenham circle of radius 3.
fn circle_offsets(cols: i32) -> [i32; 16] {
    [
        -3 * cols,
        -3 * cols + 1,
        -2 * cols + 2,
        -cols + 3,
        3,
        cols + 3,
        2 * cols + 2,
        3 * cols + 1,
        3 * cols,
        3 * cols - 1,
        2 * cols - 2,
        cols - 3,
        -3,
        -cols - 3,
        -2 * cols - 2,
        -3 * cols - 1,
    ]
}

/// Detect FAST corners with non-maximum suppression.
///
/// A pixel is a corner when `arc_length` consecutive pixels on its
/// Bresenham circle are all brighter or all darker than the center by
/// more than `threshold`. Corners within one pixel of a stronger corner
/// are suppressed, strongest first.
pub fn detect_corners(src: &GrayImage, threshold: u8, arc_length: u8) -> Vec<Corner> {
    let (cols, rows) = (src.cols() as i32, src.rows() as i32);
    if cols < 7 || rows < 7 {
        return Vec::new();
    }

    let offsets = circle_offsets(cols);
    let data = src.as_slice();

    let corners: Vec<Corner> = (3..rows - 3)
        .into_par_iter()
        .flat_map(|y| {
            let mut row_corners = Vec::new();
            for x in 3..cols - 3 {
                let idx = y * cols + x;
                if let Some(score) = corner_score(data, idx, &offsets, threshold, arc_length) {
                    row_corners.push(Corner { x, y, score });
                }
            }
            row_corners
        })
        .collect();

    suppress_non_maxima(corners, cols, rows)
}

/// Score a candidate pixel, or `None` if it is not a corner.
fn corner_score(
    data: &[u8],
    idx: i32,
    offsets: &[i32; 16],
    threshold: u8,
    arc_length: u8,
) -> Option<i32> {
    let center = data[idx as usize];
    let lower = center.saturating_sub(threshold);
    let upper = center.saturating_add(threshold);

    let at = |i: usize| data[(idx + offsets[i]) as usize];

    // high-speed rejection on the four compass points
    let compass = [at(0), at(4), at(8), at(12)];
    let darker = compass.iter().filter(|&&p| p < lower).count();
    let brighter = compass.iter().filter(|&&p| p > upper).count();
    if darker < 3 && brighter < 3 {
        return None;
    }

    let mut ring = [0u8; 16];
    for (i, slot) in ring.iter_mut().enumerate() {
        *slot = at(i);
    }

    // walk the ring twice to handle wrap-around segments
    let mut run_brighter = 0u8;
    let mut run_darker = 0u8;
    let mut is_corner = false;
    for i in 0..32 {
        let px = ring[i % 16];
        if px > upper {
            run_brighter += 1;
            run_darker = 0;
        } else if px < lower {
            run_darker += 1;
            run_brighter = 0;
        } else {
            run_brighter = 0;
            run_darker = 0;
        }
        if run_brighter >= arc_length || run_darker >= arc_length {
            is_corner = true;
            break;
        }
    }
    if !is_corner {
        return None;
    }

    // sum of absolute differences beyond the threshold
    let score = ring
        .iter()
        .map(|&px| (center.abs_diff(px) as i32 - threshold as i32).max(0))
        .sum();
    Some(score)
}

/// Keep only corners that are the strongest within their 8-neighborhood.
fn suppress_non_maxima(corners: Vec<Corner>, cols: i32, rows: i32) -> Vec<Corner> {
    let mut heap = BinaryHeap::from(corners);
    let mut suppressed = vec![false; (cols * rows) as usize];
    let mut kept = Vec::new();

    while let Some(corner) = heap.pop() {
        let idx = (corner.y * cols + corner.x) as usize;
        if suppressed[idx] {
            continue;
        }
        kept.push(corner);

        for dy in -1..=1i32 {
            for dx in -1..=1i32 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = corner.x + dx;
                let ny = corner.y + dy;
                if nx >= 0 && nx < cols && ny >= 0 && ny < rows {
                    suppressed[(ny * cols + nx) as usize] = true;
                }
            }
        }
    }
    kept
}
