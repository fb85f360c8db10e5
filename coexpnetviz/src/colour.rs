//! Perceptually distinct colours for node partitions.
//!
//! Candidates are laid out on a regular grid inside a sub-cube of Y'UV
//! space, mapped to RGB with the HDTV (BT.709) matrix, and the ones that
//! fall outside the RGB cube are thrown away. Luma is kept away from both
//! ends so that no partition ends up black or white (white is reserved
//! for bait nodes).

use matrix_util::utils::sample_indices;
use rand::Rng;
use serde::{Serialize, Serializer};

const Y_RANGE: (f64, f64) = (0.4, 0.8);
const U_RANGE: (f64, f64) = (-0.436, 0.436);
const V_RANGE: (f64, f64) = (-0.615, 0.615);

/// Fraction of the sub-cube that maps to legal RGB, roughly
const LEGAL_FRACTION: f64 = 0.2357;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From channels in `[0, 1]`
    pub fn from_unit(rgb: [f64; 3]) -> Self {
        let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2]))
    }

    /// `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// HDTV Y'UV to R'G'B'
fn yuv_to_rgb(y: f64, u: f64, v: f64) -> [f64; 3] {
    [
        y + 1.28033 * v,
        y - 0.21482 * u - 0.38059 * v,
        y + 2.12798 * u,
    ]
}

fn linspace(range: (f64, f64), k: usize) -> Vec<f64> {
    let (lb, ub) = range;
    if k < 2 {
        return vec![lb];
    }
    (0..k)
        .map(|i| lb + (ub - lb) * i as f64 / (k - 1) as f64)
        .collect()
}

/// All grid points that map inside the RGB cube
fn legal_grid_points(y_side: usize, uv_side: usize) -> Vec<[f64; 3]> {
    let ys = linspace(Y_RANGE, y_side);
    let us = linspace(U_RANGE, uv_side);
    let vs = linspace(V_RANGE, uv_side);

    let mut ret = vec![];
    for &y in ys.iter() {
        for &u in us.iter() {
            for &v in vs.iter() {
                let rgb = yuv_to_rgb(y, u, v);
                if rgb.iter().all(|c| (0.0..=1.0).contains(c)) {
                    ret.push(rgb);
                }
            }
        }
    }
    ret
}

/// Pick `n` distinct colours
///
/// * `n` - number of colours
/// * `rng` - random source choosing among the grid points; a seeded
///   one makes the palette reproducible
pub fn distinct_colours<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Rgb> {
    if n == 0 {
        return vec![];
    }

    let y_side = ((n as f64).sqrt().floor() as usize).saturating_sub(1).max(2);

    let yuv_volume = (Y_RANGE.1 - Y_RANGE.0) * (U_RANGE.1 - U_RANGE.0) * (V_RANGE.1 - V_RANGE.0);
    let mut uv_side = ((n as f64 / LEGAL_FRACTION * yuv_volume).cbrt().ceil() as usize).max(2);

    let candidates = loop {
        let points = legal_grid_points(y_side, uv_side);
        if points.len() >= n {
            break points;
        }
        uv_side += 1;
    };

    sample_indices(rng, candidates.len(), n)
        .into_iter()
        .map(|i| Rgb::from_unit(candidates[i]))
        .collect()
}
