use crate::traits::*;
use fnv::FnvHashMap as HashMap;
use nalgebra::{DMatrix, DVector};

impl RowStatOps for DMatrix<f64> {
    type Mat = DMatrix<f64>;
    type DVec = DVector<f64>;

    fn row_std_devs(&self) -> Self::DVec {
        let n = self.ncols();
        DVector::from_iterator(
            self.nrows(),
            self.row_iter().map(|row| {
                if n < 2 || is_constant(row.iter()) {
                    return 0.0;
                }
                let mu = row.sum() / n as f64;
                let ss: f64 = row.iter().map(|&x| (x - mu) * (x - mu)).sum();
                (ss / (n - 1) as f64).sqrt()
            }),
        )
    }

    fn centre_unit_rows(&self) -> Self::Mat {
        let n = self.ncols().max(1) as f64;
        let mut ret = self.clone();
        for mut row in ret.row_iter_mut() {
            // exact constants would otherwise leave rounding noise
            if is_constant(row.iter()) {
                row.fill(f64::NAN);
                continue;
            }
            let mu = row.sum() / n;
            row.add_scalar_mut(-mu);
            let norm = row.norm();
            if norm > 0.0 && norm.is_finite() {
                row /= norm;
            } else {
                row.fill(f64::NAN);
            }
        }
        ret
    }

    fn select_row_indices(&self, indices: &[usize]) -> Self::Mat {
        self.select_rows(indices)
    }
}

fn is_constant<'a>(mut values: impl Iterator<Item = &'a f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|x| x == first),
        None => true,
    }
}

impl RowSimilarityOps for DMatrix<f64> {
    type Mat = DMatrix<f64>;

    fn pearson_rows(&self, other: &Self::Mat) -> anyhow::Result<Self::Mat> {
        if self.ncols() != other.ncols() {
            return Err(anyhow::anyhow!(
                "column mismatch: {} vs {}",
                self.ncols(),
                other.ncols()
            ));
        }

        let xx = self.centre_unit_rows();
        let yy = other.centre_unit_rows();

        let mut ret = xx * yy.transpose();
        ret.apply(|r| {
            if !r.is_nan() {
                *r = r.clamp(-1.0, 1.0);
            }
        });
        Ok(ret)
    }

    fn mutual_info_rows(&self, other: &Self::Mat) -> anyhow::Result<Self::Mat> {
        if self.ncols() != other.ncols() {
            return Err(anyhow::anyhow!(
                "column mismatch: {} vs {}",
                self.ncols(),
                other.ncols()
            ));
        }

        let xx: Vec<Vec<usize>> = self.row_iter().map(|r| category_codes(r.iter())).collect();
        let yy: Vec<Vec<usize>> = other.row_iter().map(|r| category_codes(r.iter())).collect();

        let mut ret = DMatrix::<f64>::zeros(self.nrows(), other.nrows());
        for (i, x) in xx.iter().enumerate() {
            for (j, y) in yy.iter().enumerate() {
                ret[(i, j)] = discrete_mutual_info(x, y);
            }
        }
        Ok(ret)
    }
}

/// Map each value to a category index, one category per distinct value
fn category_codes<'a>(values: impl Iterator<Item = &'a f64>) -> Vec<usize> {
    let mut codes: HashMap<u64, usize> = HashMap::default();
    values
        .map(|&x| {
            // +0.0 and -0.0 are one category
            let key = if x == 0.0 { 0u64 } else { x.to_bits() };
            let next = codes.len();
            *codes.entry(key).or_insert(next)
        })
        .collect()
}

/// Plug-in estimate of the mutual information (nats) of two
/// categorical vectors of equal length
fn discrete_mutual_info(x: &[usize], y: &[usize]) -> f64 {
    let n = x.len();
    if n == 0 {
        return 0.0;
    }

    let mut n_x: HashMap<usize, usize> = HashMap::default();
    let mut n_y: HashMap<usize, usize> = HashMap::default();
    let mut n_xy: HashMap<(usize, usize), usize> = HashMap::default();

    for (&a, &b) in x.iter().zip(y.iter()) {
        *n_x.entry(a).or_default() += 1;
        *n_y.entry(b).or_default() += 1;
        *n_xy.entry((a, b)).or_default() += 1;
    }

    let nn = n as f64;
    let mi: f64 = n_xy
        .iter()
        .map(|(&(a, b), &c)| {
            let c = c as f64;
            let ca = n_x[&a] as f64;
            let cb = n_y[&b] as f64;
            (c / nn) * (nn * c / (ca * cb)).ln()
        })
        .sum();

    mi.max(0.0)
}

/// Entries strictly above the diagonal, row by row
pub fn upper_triangle(mat: &DMatrix<f64>) -> Vec<f64> {
    let n = mat.nrows().min(mat.ncols());
    let mut ret = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..mat.nrows() {
        for j in (i + 1)..mat.ncols() {
            ret.push(mat[(i, j)]);
        }
    }
    ret
}

/// Percentile with linear interpolation between the closest ranks
///
/// * `values` - data points (need not be sorted; must not contain NaN)
/// * `q` - percentile rank in `[0, 100]`
///
/// Returns `None` for empty input.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
