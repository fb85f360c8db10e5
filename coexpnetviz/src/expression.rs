use crate::common::*;
use crate::error::user_error;
use matrix_util::common_io::basename;
use matrix_util::traits::{IoOps, RowStatOps};

/// Gene expression matrix: one row per gene, one column per condition
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    pub name: Box<str>,
    pub genes: Vec<GeneId>,
    pub conditions: Vec<Box<str>>,
    pub data: Mat,
}

impl ExpressionMatrix {
    /// Check the shape and contents of a named matrix
    ///
    /// Requires non-empty unique row labels, at least one row, at least
    /// two conditions and finite values.
    pub fn new(
        name: Box<str>,
        genes: Vec<GeneId>,
        conditions: Vec<Box<str>>,
        data: Mat,
    ) -> anyhow::Result<Self> {
        if data.nrows() != genes.len() || data.ncols() != conditions.len() {
            return Err(user_error(format!(
                "Expression matrix {}: {} x {} values for {} genes and {} conditions",
                name,
                data.nrows(),
                data.ncols(),
                genes.len(),
                conditions.len()
            )));
        }

        if genes.is_empty() {
            return Err(user_error(format!(
                "Expression matrix {} has no rows",
                name
            )));
        }

        if conditions.len() < 2 {
            return Err(user_error(format!(
                "Expression matrix {} must have at least 2 conditions (columns), found {}",
                name,
                conditions.len()
            )));
        }

        if let Some(i) = genes.iter().position(|g| g.is_empty()) {
            return Err(user_error(format!(
                "Expression matrix {} has an empty gene id on data row {}",
                name,
                i + 1
            )));
        }

        let mut seen: HashSet<&str> = HashSet::default();
        let mut duplicates: Vec<&str> = vec![];
        for g in genes.iter() {
            if !seen.insert(g) {
                duplicates.push(g);
            }
        }
        if !duplicates.is_empty() {
            duplicates.sort_unstable();
            duplicates.dedup();
            return Err(user_error(format!(
                "Expression matrix {} has duplicate gene ids: {}",
                name,
                duplicates.join(", ")
            )));
        }

        for (i, row) in data.row_iter().enumerate() {
            if let Some(x) = row.iter().find(|x| !x.is_finite()) {
                return Err(user_error(format!(
                    "Expression matrix {} has a non-finite value ({}) for gene {}",
                    name, x, genes[i]
                )));
            }
        }

        Ok(Self {
            name,
            genes,
            conditions,
            data,
        })
    }

    /// Build a matrix from `(gene, values)` rows; conditions are named
    /// `c1, c2, ...`
    pub fn from_named_rows(name: &str, rows: &[(&str, Vec<f64>)]) -> anyhow::Result<Self> {
        let ncols = rows.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((gene, v)) = rows.iter().find(|(_, v)| v.len() != ncols) {
            return Err(user_error(format!(
                "Expression matrix {}: gene {} has {} values, expected {}",
                name,
                gene,
                v.len(),
                ncols
            )));
        }

        let genes: Vec<GeneId> = rows.iter().map(|(g, _)| (*g).into()).collect();
        let conditions: Vec<Box<str>> = (1..=ncols).map(|j| format!("c{}", j).into()).collect();
        let data = Mat::from_row_iterator(
            rows.len(),
            ncols,
            rows.iter().flat_map(|(_, v)| v.iter().copied()),
        );
        Self::new(name.into(), genes, conditions, data)
    }

    /// Read a tab-separated matrix. The first column holds gene ids,
    /// the first line holds condition names. The matrix is named after
    /// the file.
    pub fn from_tsv(file_path: &str) -> anyhow::Result<Self> {
        let name = basename(file_path)?;
        let MatWithNames { rows, cols, mat } = Mat::from_tsv_with_names(file_path)
            .map_err(|e| user_error(format!("Failed to read expression matrix: {:#}", e)))?;
        info!(
            "Read expression matrix {}: {} genes x {} conditions",
            name,
            rows.len(),
            cols.len()
        );
        Self::new(name, rows, cols, mat)
    }

    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    /// gene -> row index
    pub fn gene_index(&self) -> HashMap<&str, usize> {
        self.genes
            .iter()
            .enumerate()
            .map(|(i, g)| (&**g, i))
            .collect()
    }

    /// Keep the rows at the given indices, in that order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            genes: indices.iter().map(|&i| self.genes[i].clone()).collect(),
            conditions: self.conditions.clone(),
            data: self.data.select_row_indices(indices),
        }
    }

    /// Rows reordered by gene id
    pub fn sorted_by_gene(&self) -> Self {
        let mut order: Vec<usize> = (0..self.num_genes()).collect();
        order.sort_by(|&a, &b| self.genes[a].cmp(&self.genes[b]));
        self.select_rows(&order)
    }
}
