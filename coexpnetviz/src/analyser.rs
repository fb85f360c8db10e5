//! Per-matrix analysis: cleaning, cutoff estimation, bait correlations
//! and thresholding.

use crate::common::*;
use crate::correlation::CorrelationMethod;
use crate::error::{user_error, value_error};
use crate::expression::ExpressionMatrix;
use matrix_util::dmatrix_stat::{percentile, upper_triangle};
use matrix_util::traits::RowStatOps;
use matrix_util::utils::sample_indices;
use rand::Rng;
use serde::Serialize;

/// Maximum number of rows used to estimate the cutoffs
pub const SAMPLE_SIZE: usize = 800;

/// Warn when more than this fraction of sample correlations is NaN
const MAX_NAN_FRACTION: f64 = 0.1;

/// Percentile ranks of the sample correlation distribution that become
/// the lower and upper cutoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileRanks {
    pub lower: f64,
    pub upper: f64,
}

impl PercentileRanks {
    pub fn new(lower: f64, upper: f64) -> anyhow::Result<Self> {
        let in_bounds = |x: f64| (0.0..=100.0).contains(&x);
        if !in_bounds(lower) || !in_bounds(upper) {
            return Err(user_error(format!(
                "Percentile ranks must lie in [0, 100], got lower={} and upper={}",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(user_error(format!(
                "Lower percentile rank ({}) must not exceed the upper percentile rank ({})",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }
}

/// Correlation values at or beyond which a correlation is significant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cutoffs {
    pub lower: f64,
    pub upper: f64,
}

impl Cutoffs {
    pub fn is_significant(&self, correlation: f64) -> bool {
        correlation <= self.lower || correlation >= self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificantCorrelation {
    pub bait: GeneId,
    pub gene: GeneId,
    pub correlation: f64,
}

/// Diagnostics kept for each expression matrix
#[derive(Debug, Clone)]
pub struct MatrixInfo {
    /// the matrix after dropping zero-variance rows
    pub matrix: ExpressionMatrix,
    /// sample rows x sample rows, sorted by gene
    pub sample_correlations: NamedMat,
    pub cutoffs: Cutoffs,
    /// every row x present baits
    pub correlations: NamedMat,
}

impl MatrixInfo {
    /// Non-NaN values of the strict upper triangle of the sample
    /// correlation matrix
    pub fn sample_correlation_values(&self) -> Vec<f64> {
        upper_triangle(&self.sample_correlations.mat)
            .into_iter()
            .filter(|x| !x.is_nan())
            .collect()
    }
}

pub struct MatrixAnalyser {
    pub method: CorrelationMethod,
    pub percentile_ranks: PercentileRanks,
}

impl MatrixAnalyser {
    pub fn new(method: CorrelationMethod, percentile_ranks: PercentileRanks) -> Self {
        Self {
            method,
            percentile_ranks,
        }
    }

    /// Remove rows whose standard deviation is (numerically) zero;
    /// correlation with a constant profile is undefined.
    pub fn drop_zero_variance(&self, matrix: &ExpressionMatrix) -> anyhow::Result<ExpressionMatrix> {
        let sd = matrix.data.row_std_devs();
        let keep: Vec<usize> = sd
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s >= f64::MIN_POSITIVE)
            .map(|(i, _)| i)
            .collect();

        if keep.is_empty() {
            return Err(value_error(format!(
                "Expression matrix {} has no rows with non-zero variance",
                matrix.name
            )));
        }

        let ndropped = matrix.num_genes() - keep.len();
        if ndropped > 0 {
            warn!(
                "Dropped {} of {} rows with zero variance from expression matrix {}. \
                 Correlation is undefined for constant rows; consider removing them from the input.",
                ndropped,
                matrix.num_genes(),
                matrix.name
            );
            Ok(matrix.select_rows(&keep))
        } else {
            Ok(matrix.clone())
        }
    }

    /// Estimate the cutoffs from a random sample of at most
    /// [`SAMPLE_SIZE`] rows
    ///
    /// Returns the correlation matrix of the sample (sorted by gene) and
    /// the cutoffs at the percentile ranks of its upper triangle.
    pub fn estimate_cutoffs<R: Rng + ?Sized>(
        &self,
        matrix: &ExpressionMatrix,
        rng: &mut R,
    ) -> anyhow::Result<(NamedMat, Cutoffs)> {
        let sample = matrix
            .select_rows(&sample_indices(rng, matrix.num_genes(), SAMPLE_SIZE))
            .sorted_by_gene();

        let cor = self.method.correlate(&sample.data, &sample.data)?;

        let values = upper_triangle(&cor);
        let nnan = values.iter().filter(|x| x.is_nan()).count();
        if nnan as f64 > MAX_NAN_FRACTION * values.len() as f64 {
            warn!(
                "Sample correlation matrix of {} has {} NaN values out of {} (more than {}%)",
                matrix.name,
                nnan,
                values.len(),
                MAX_NAN_FRACTION * 100.0
            );
        }

        let values: Vec<f64> = values.into_iter().filter(|x| !x.is_nan()).collect();

        let ranks = &self.percentile_ranks;
        let (lower, upper) = match (
            percentile(&values, ranks.lower),
            percentile(&values, ranks.upper),
        ) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => {
                return Err(value_error(format!(
                    "Cannot estimate cutoffs for expression matrix {}: \
                     it needs at least 2 rows with a defined correlation",
                    matrix.name
                )));
            }
        };

        info!(
            "Cutoffs of {} ({} sample rows): lower={} upper={}",
            matrix.name,
            sample.num_genes(),
            lower,
            upper
        );

        let sample_correlations = MatWithNames {
            rows: sample.genes.clone(),
            cols: sample.genes,
            mat: cor,
        };
        Ok((sample_correlations, Cutoffs { lower, upper }))
    }

    /// Correlation of every row with every bait present in the matrix
    ///
    /// Rows keep the matrix order; columns follow the order of `baits`.
    pub fn correlate_vs_baits(
        &self,
        matrix: &ExpressionMatrix,
        baits: &[GeneId],
    ) -> anyhow::Result<NamedMat> {
        let index = matrix.gene_index();
        let (present, bait_rows): (Vec<GeneId>, Vec<usize>) = baits
            .iter()
            .filter_map(|b| index.get(&**b).map(|&i| (b.clone(), i)))
            .unzip();

        let bait_data = matrix.data.select_row_indices(&bait_rows);
        let mat = self.method.correlate(&matrix.data, &bait_data)?;

        Ok(MatWithNames {
            rows: matrix.genes.clone(),
            cols: present,
            mat,
        })
    }

    /// Long form of the significant entries, row by row; NaN entries
    /// are dropped
    pub fn threshold(correlations: &NamedMat, cutoffs: &Cutoffs) -> Vec<SignificantCorrelation> {
        let mut ret = vec![];
        for (i, gene) in correlations.rows.iter().enumerate() {
            for (j, bait) in correlations.cols.iter().enumerate() {
                let c = correlations.mat[(i, j)];
                if !c.is_nan() && cutoffs.is_significant(c) {
                    ret.push(SignificantCorrelation {
                        bait: bait.clone(),
                        gene: gene.clone(),
                        correlation: c,
                    });
                }
            }
        }
        ret
    }

    /// All of the above for one matrix
    pub fn process<R: Rng + ?Sized>(
        &self,
        matrix: &ExpressionMatrix,
        baits: &[GeneId],
        rng: &mut R,
    ) -> anyhow::Result<(Vec<SignificantCorrelation>, MatrixInfo)> {
        info!("Processing expression matrix {}", matrix.name);

        let matrix = self.drop_zero_variance(matrix)?;
        let (sample_correlations, cutoffs) = self.estimate_cutoffs(&matrix, rng)?;
        let correlations = self.correlate_vs_baits(&matrix, baits)?;
        let significant = Self::threshold(&correlations, &cutoffs);

        info!(
            "{} significant correlations in {}",
            significant.len(),
            matrix.name
        );

        Ok((
            significant,
            MatrixInfo {
                matrix,
                sample_correlations,
                cutoffs,
                correlations,
            },
        ))
    }
}
