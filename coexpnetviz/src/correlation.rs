use crate::common::*;
use matrix_util::traits::RowSimilarityOps;
use serde::{Deserialize, Serialize};

/// Similarity measure used to relate expression profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMethod {
    /// Pearson correlation coefficient
    #[default]
    Pearson,
    /// Mutual information (nats) of the discretised profiles
    MutualInformation,
}

impl CorrelationMethod {
    /// `out[(i, j)]` relates row `i` of `xx` to row `j` of `yy`; constant
    /// rows give `NaN` under Pearson
    pub fn correlate(&self, xx: &Mat, yy: &Mat) -> anyhow::Result<Mat> {
        match self {
            CorrelationMethod::Pearson => xx.pearson_rows(yy),
            CorrelationMethod::MutualInformation => xx.mutual_info_rows(yy),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::MutualInformation => "mutual_information",
        }
    }
}

impl std::fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
