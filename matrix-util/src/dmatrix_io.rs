use crate::common_io::{read_lines_of_words_delim, write_lines, Delimiter, ReadLinesOut};
use crate::traits::*;
pub use nalgebra::{DMatrix, DVector};

use std::fmt::Display;
use std::str::FromStr;

impl<T> IoOps for DMatrix<T>
where
    T: nalgebra::Scalar + FromStr + Display + Copy,
    <T as FromStr>::Err: Display,
{
    type Scalar = T;
    type Mat = Self;

    fn read_data_with_names(
        file_path: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<MatWithNames<Self::Mat>> {
        let hdr_line = skip.unwrap_or(0) as i64;

        let ReadLinesOut { lines, header } =
            read_lines_of_words_delim(file_path, delim, hdr_line)?;

        if header.is_empty() {
            return Err(anyhow::anyhow!("missing header line in {}", file_path));
        }

        // the first header entry names the row-name column
        let cols: Vec<Box<str>> = header[1..].to_vec();
        let ncols = cols.len();

        let mut rows = Vec::with_capacity(lines.len());
        let mut data = Vec::with_capacity(lines.len() * ncols);

        for (i, words) in lines.into_iter().enumerate() {
            if words.len() != ncols + 1 {
                return Err(anyhow::anyhow!(
                    "{}: data line {} has {} fields, but the header has {}",
                    file_path,
                    i + 1,
                    words.len(),
                    ncols + 1
                ));
            }
            let mut words = words.into_iter();
            let name = words.next().unwrap_or_default();
            for w in words {
                let x = w.trim().parse::<T>().map_err(|e| {
                    anyhow::anyhow!("{}: failed to parse {:?} in row {}: {}", file_path, w, name, e)
                })?;
                data.push(x);
            }
            rows.push(name);
        }

        let nrows = rows.len();
        Ok(MatWithNames {
            rows,
            cols,
            mat: DMatrix::<T>::from_row_iterator(nrows, ncols, data),
        })
    }

    fn write_data_with_names(
        &self,
        file_path: &str,
        delim: &str,
        rows: &[Box<str>],
        cols: &[Box<str>],
        corner: &str,
    ) -> anyhow::Result<()> {
        if rows.len() != self.nrows() || cols.len() != self.ncols() {
            return Err(anyhow::anyhow!(
                "names ({} x {}) don't match the matrix ({} x {})",
                rows.len(),
                cols.len(),
                self.nrows(),
                self.ncols()
            ));
        }

        let mut lines: Vec<Box<str>> = Vec::with_capacity(self.nrows() + 1);

        let header = std::iter::once(corner)
            .chain(cols.iter().map(|c| c.as_ref()))
            .collect::<Vec<_>>()
            .join(delim);
        lines.push(header.into_boxed_str());

        for (name, row) in rows.iter().zip(self.row_iter()) {
            let line = std::iter::once(name.to_string())
                .chain(row.iter().map(|x| format!("{}", *x)))
                .collect::<Vec<String>>()
                .join(delim);
            lines.push(line.into_boxed_str());
        }

        write_lines(&lines, file_path)?;
        Ok(())
    }
}
