use argus_image::ImageSize;

use crate::segmentation::Cluster;

/// A candidate marker boundary in pixel coordinates.
///
/// Corners are ordered top-left, top-right, bottom-right, bottom-left in
/// image coordinates (`y` down), on the outer edge of the dark border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corner positions in pixels.
    pub corners: [[f32; 2]; 4],
}

impl Quad {
    /// Centroid of the four corners.
    pub fn center(&self) -> [f32; 2] {
        let mut cx = 0.0;
        let mut cy = 0.0;
        for c in &self.corners {
            cx += c[0];
            cy += c[1];
        }
        [cx / 4.0, cy / 4.0]
    }
}

/// Fit a quad to a dark cluster, or reject the cluster.
///
/// The diagonal extreme pixels of the cluster become the corners, pushed
/// out by one pixel on the right and bottom edges so an axis-aligned
/// square of side `n` yields corners exactly `n` apart. Rejects clusters
/// touching the frame edge, concave corner layouts and quads with any
/// side shorter than `min_side` pixels.
pub fn fit_quad(cluster: &Cluster, frame: ImageSize, min_side: f32) -> Option<Quad> {
    // a cluster cut off by the frame edge has unreliable corners
    if cluster.min_x == 0
        || cluster.min_y == 0
        || cluster.max_x + 1 >= frame.width
        || cluster.max_y + 1 >= frame.height
    {
        return None;
    }

    let (tlx, tly) = cluster.top_left;
    let (trx, try_) = cluster.top_right;
    let (brx, bry) = cluster.bottom_right;
    let (blx, bly) = cluster.bottom_left;

    let corners = [
        [tlx as f32, tly as f32],
        [trx as f32 + 1.0, try_ as f32],
        [brx as f32 + 1.0, bry as f32 + 1.0],
        [blx as f32, bly as f32 + 1.0],
    ];

    let quad = Quad { corners };
    if !is_convex(&quad.corners) || shortest_side(&quad.corners) < min_side {
        return None;
    }
    Some(quad)
}

/// Whether the corners form a convex polygon traversed in screen order.
fn is_convex(corners: &[[f32; 2]; 4]) -> bool {
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let c = corners[(i + 2) % 4];
        let cross = (b[0] - a[0]) * (c[1] - b[1]) - (b[1] - a[1]) * (c[0] - b[0]);
        if cross <= 0.0 {
            return false;
        }
    }
    true
}

fn shortest_side(corners: &[[f32; 2]; 4]) -> f32 {
    let mut min = f32::INFINITY;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
        min = min.min(len);
    }
    min
}
