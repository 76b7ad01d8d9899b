// src/geometry.rs

//! Pixel geometry: ink extraction, convex hulls and scanline interpolation.
//!
//! Everything here works in surface pixel coordinates with `y` growing
//! downwards, the way the rasterizer hands pixels back.

use crate::error::{KerningError, Result};

/// Immutable RGBA8 pixel buffer, row-major, 4 bytes per pixel.
///
/// Only the alpha channel is ever consulted. Any non-zero alpha counts as ink,
/// including the faintest anti-aliased fringe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl PixelImage {
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self> {
        if rgba.len() != width * height * 4 {
            return Err(KerningError::InvalidImage {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Fully transparent image.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Alpha of the pixel at (x, y). Panics when out of bounds.
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.rgba[(y * self.width + x) * 4 + 3]
    }

    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.alpha(x, y) != 0
    }

    /// Copies the horizontal band `top..top + height` into a new image.
    /// Rows past the bottom edge are clipped.
    pub fn crop_rows(&self, top: usize, height: usize) -> PixelImage {
        let top = top.min(self.height);
        let bottom = (top + height).min(self.height);
        let stride = self.width * 4;
        PixelImage {
            width: self.width,
            height: bottom - top,
            rgba: self.rgba[top * stride..bottom * stride].to_vec(),
        }
    }
}

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A boundary sample after interpolation: `y` is always a whole scanline,
/// `x` may fall between pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullSample {
    pub x: f64,
    pub y: i64,
}

impl From<Point> for HullSample {
    fn from(p: Point) -> Self {
        HullSample {
            x: p.x as f64,
            y: p.y,
        }
    }
}

/// Coordinates of every ink pixel, in row-major scan order.
pub fn ink_points(image: &PixelImage) -> Vec<Point> {
    let mut points = Vec::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            if image.is_ink(x, y) {
                points.push(Point::new(x as i64, y as i64));
            }
        }
    }
    points
}

/// Z component of `(a - o) x (b - o)`; positive for a counter-clockwise turn.
fn cross(o: Point, a: Point, b: Point) -> i64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn push_chain(chain: &mut Vec<Point>, p: Point) {
    while chain.len() >= 2 && cross(chain[chain.len() - 2], chain[chain.len() - 1], p) <= 0 {
        chain.pop();
    }
    chain.push(p);
}

/// Convex hull of all ink pixels (Andrew's monotone chain).
///
/// With fewer than three ink pixels the hull is undefined and the raw points
/// are returned as found.
pub fn convex_hull(image: &PixelImage) -> Vec<Point> {
    let mut points = ink_points(image);
    if points.len() < 3 {
        return points;
    }

    points.sort_unstable();

    let mut lower = Vec::new();
    for &p in &points {
        push_chain(&mut lower, p);
    }
    let mut upper = Vec::new();
    for &p in points.iter().rev() {
        push_chain(&mut upper, p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Walks the closed hull and inserts a sample on every whole scanline an edge
/// crosses strictly between its endpoints. Vertices are emitted once each, in
/// hull order.
pub fn interpolate_integer_y(hull: &[Point]) -> Vec<HullSample> {
    let mut samples = Vec::with_capacity(hull.len() * 2);

    for (i, &p0) in hull.iter().enumerate() {
        let p1 = hull[(i + 1) % hull.len()];
        samples.push(HullSample::from(p0));

        if p0.y == p1.y {
            continue;
        }

        let dy = (p1.y - p0.y) as f64;
        let dx = (p1.x - p0.x) as f64;
        for y in p0.y.min(p1.y)..=p0.y.max(p1.y) {
            if y == p0.y || y == p1.y {
                continue;
            }
            let t = (y - p0.y) as f64 / dy;
            samples.push(HullSample {
                x: p0.x as f64 + dx * t,
                y,
            });
        }
    }

    samples
}
