use crate::common_io::Delimiter;

/// A matrix together with its row and column names
#[derive(Debug, Clone, PartialEq)]
pub struct MatWithNames<T> {
    pub rows: Vec<Box<str>>,
    pub cols: Vec<Box<str>>,
    pub mat: T,
}

/// Read and write matrices from and to files
pub trait IoOps {
    type Scalar;
    type Mat;

    /// Read a delimited file whose first column holds row names and
    /// whose header line holds column names.
    ///
    /// * `file_path` - file name--either gzipped or not
    /// * `delim` - delimiter
    /// * `skip` - number of lines before the header line
    fn read_data_with_names(
        file_path: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<MatWithNames<Self::Mat>>;

    fn from_tsv_with_names(tsv_file: &str) -> anyhow::Result<MatWithNames<Self::Mat>> {
        Self::read_data_with_names(tsv_file, "\t", None)
    }

    /// Write the matrix with a header line of column names and one row
    /// name in front of every row.
    ///
    /// * `corner` - the header entry above the row names
    fn write_data_with_names(
        &self,
        file_path: &str,
        delim: &str,
        rows: &[Box<str>],
        cols: &[Box<str>],
        corner: &str,
    ) -> anyhow::Result<()>;

    fn to_tsv_with_names(
        &self,
        tsv_file: &str,
        rows: &[Box<str>],
        cols: &[Box<str>],
        corner: &str,
    ) -> anyhow::Result<()> {
        self.write_data_with_names(tsv_file, "\t", rows, cols, corner)
    }
}

/// Per-row summary statistics
pub trait RowStatOps {
    type Mat;
    type DVec;

    /// Sample standard deviation (n - 1 in the denominator) of each row
    fn row_std_devs(&self) -> Self::DVec;

    /// Centre each row and scale it to unit Euclidean norm. A row with
    /// zero norm becomes all `NaN`.
    fn centre_unit_rows(&self) -> Self::Mat;

    /// Keep the rows at the given indices, in that order
    fn select_row_indices(&self, indices: &[usize]) -> Self::Mat;
}

/// Row-by-row similarity between two matrices with the same number of
/// columns
pub trait RowSimilarityOps {
    type Mat;

    /// Pearson correlation between every row of `self` and every row of
    /// `other`; `out[(i, j)] = cor(self[i, :], other[j, :])`
    fn pearson_rows(&self, other: &Self::Mat) -> anyhow::Result<Self::Mat>;

    /// Discrete mutual information (nats) between every row of `self`
    /// and every row of `other`, treating each distinct value as a
    /// category
    fn mutual_info_rows(&self, other: &Self::Mat) -> anyhow::Result<Self::Mat>;
}
