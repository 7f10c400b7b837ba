use std::collections::HashMap;

use argus_image::GrayImage;

use crate::threshold::BLACK;
use crate::union_find::UnionFind;

/// A connected component of dark pixels, summarized for quad fitting.
///
/// Besides the bounding box, the four diagonal extreme pixels are
/// tracked: the pixels minimizing/maximizing `x + y` and `x - y`. For a
/// quadrilateral blob these are its corners.
#[derive(Debug, Clone, Copy)]
pub struct Cluster {
    /// Number of pixels in the component.
    pub count: usize,
    /// Bounding box, inclusive.
    pub min_x: usize,
    /// Bounding box, inclusive.
    pub min_y: usize,
    /// Bounding box, inclusive.
    pub max_x: usize,
    /// Bounding box, inclusive.
    pub max_y: usize,
    /// Pixel minimizing `x + y`.
    pub top_left: (usize, usize),
    /// Pixel maximizing `x - y`.
    pub top_right: (usize, usize),
    /// Pixel maximizing `x + y`.
    pub bottom_right: (usize, usize),
    /// Pixel minimizing `x - y`.
    pub bottom_left: (usize, usize),
}

impl Cluster {
    fn seed(x: usize, y: usize) -> Self {
        Self {
            count: 1,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            top_left: (x, y),
            top_right: (x, y),
            bottom_right: (x, y),
            bottom_left: (x, y),
        }
    }

    fn absorb(&mut self, x: usize, y: usize) {
        self.count += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);

        let sum = (x + y) as isize;
        let diff = x as isize - y as isize;
        if sum < (self.top_left.0 + self.top_left.1) as isize {
            self.top_left = (x, y);
        }
        if sum > (self.bottom_right.0 + self.bottom_right.1) as isize {
            self.bottom_right = (x, y);
        }
        if diff > self.top_right.0 as isize - self.top_right.1 as isize {
            self.top_right = (x, y);
        }
        if diff < self.bottom_left.0 as isize - self.bottom_left.1 as isize {
            self.bottom_left = (x, y);
        }
    }
}

/// Group 4-connected dark pixels of a binarized image into clusters.
///
/// Components smaller than `min_pixels` are discarded.
pub fn find_dark_clusters(bin: &GrayImage, min_pixels: usize) -> Vec<Cluster> {
    let width = bin.cols();
    let height = bin.rows();
    let data = bin.as_slice();

    let mut uf = UnionFind::new(data.len());

    for (i, &px) in data.iter().enumerate() {
        if px != BLACK {
            continue;
        }
        let x = i % width;
        let y = i / width;

        if x + 1 < width && data[i + 1] == BLACK {
            uf.union(i, i + 1);
        }
        if y + 1 < height && data[i + width] == BLACK {
            uf.union(i, i + width);
        }
    }

    let mut clusters: HashMap<usize, Cluster> = HashMap::new();
    for (i, &px) in data.iter().enumerate() {
        if px != BLACK {
            continue;
        }
        let root = uf.find(i);
        let x = i % width;
        let y = i / width;
        clusters
            .entry(root)
            .and_modify(|c| c.absorb(x, y))
            .or_insert_with(|| Cluster::seed(x, y));
    }

    let mut out: Vec<Cluster> = clusters
        .into_values()
        .filter(|c| c.count >= min_pixels)
        .collect();
    // deterministic order for downstream consumers
    out.sort_by_key(|c| (c.min_y, c.min_x));
    out
}
