use crate::Image;

/// Set a pixel color, silently ignoring out-of-bounds coordinates.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draw a line in place using Bresenham's algorithm.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw a closed polygon outline by connecting consecutive vertices.
pub fn draw_polygon<const C: usize>(img: &mut Image<u8, C>, points: &[[f32; 2]], color: [u8; C]) {
    if points.len() < 2 {
        return;
    }
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line(
            img,
            (a[0].round() as i64, a[1].round() as i64),
            (b[0].round() as i64, b[1].round() as i64),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line() {
        let mut img = Image::<u8, 1>::from_size_val([5, 3].into(), 0);
        draw_line(&mut img, (0, 1), (4, 1), [255]);
        for x in 0..5 {
            assert_eq!(img.get_pixel(x, 1, 0).unwrap(), 255);
        }
        assert_eq!(img.get_pixel(2, 0, 0).unwrap(), 0);
    }

    #[test]
    fn out_of_bounds_clipped() {
        let mut img = Image::<u8, 1>::from_size_val([4, 4].into(), 0);
        draw_line(&mut img, (-2, -2), (6, 6), [255]);
        assert_eq!(img.get_pixel(0, 0, 0).unwrap(), 255);
        assert_eq!(img.get_pixel(3, 3, 0).unwrap(), 255);
    }
}
