use crate::analyser::PercentileRanks;
use crate::common::*;
use crate::correlation::CorrelationMethod;
use crate::error::user_error;
use crate::expression::ExpressionMatrix;
use crate::families::GeneFamilies;
use matrix_util::common_io::read_lines_of_words_delim;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// Baits are given inline or as a file of ids
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum BaitsArg {
    List(Vec<Box<str>>),
    File(Box<str>),
}

fn default_lower_percentile_rank() -> f64 {
    5.0
}

fn default_upper_percentile_rank() -> f64 {
    95.0
}

/// The JSON document describing one run
#[derive(Deserialize, Debug, Clone)]
pub struct InvocationArgs {
    /// directory receiving every artefact; must exist
    pub output_dir: Box<str>,

    /// bait gene ids, or a file listing them
    pub baits: BaitsArg,

    /// tab-separated expression matrices, one gene per row
    pub expression_matrices: Vec<Box<str>>,

    /// YAML file mapping each family to its genes
    #[serde(default)]
    pub gene_families: Option<Box<str>>,

    #[serde(default = "default_lower_percentile_rank")]
    pub lower_percentile_rank: f64,

    #[serde(default = "default_upper_percentile_rank")]
    pub upper_percentile_rank: f64,

    #[serde(default)]
    pub correlation_method: CorrelationMethod,
}

impl InvocationArgs {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).map_err(|e| user_error(format!("Invalid JSON input: {}", e)))
    }

    pub fn from_json_reader(mut reader: impl Read) -> anyhow::Result<Self> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json)
    }

    /// The output directory, checked to exist and be a directory
    pub fn output_dir(&self) -> anyhow::Result<PathBuf> {
        let dir = PathBuf::from(&*self.output_dir);
        if !dir.is_dir() {
            return Err(user_error(format!(
                "Output directory does not exist or is not a directory: {}",
                dir.display()
            )));
        }
        let readonly = std::fs::metadata(&dir)?.permissions().readonly();
        if readonly {
            return Err(user_error(format!(
                "Output directory is not writable: {}",
                dir.display()
            )));
        }
        Ok(dir)
    }

    pub fn read_baits(&self) -> anyhow::Result<Vec<GeneId>> {
        match &self.baits {
            BaitsArg::List(baits) => Ok(baits.clone()),
            BaitsArg::File(file) => read_baits_file(file),
        }
    }

    pub fn read_expression_matrices(&self) -> anyhow::Result<Vec<ExpressionMatrix>> {
        self.expression_matrices
            .iter()
            .map(|file| ExpressionMatrix::from_tsv(file))
            .collect()
    }

    pub fn read_gene_families(&self) -> anyhow::Result<GeneFamilies> {
        match &self.gene_families {
            Some(file) => GeneFamilies::from_yaml_file(file),
            None => Ok(GeneFamilies::empty()),
        }
    }

    pub fn percentile_ranks(&self) -> anyhow::Result<PercentileRanks> {
        PercentileRanks::new(self.lower_percentile_rank, self.upper_percentile_rank)
    }
}

/// Bait ids separated by whitespace or commas
pub fn read_baits_file(file_path: &str) -> anyhow::Result<Vec<GeneId>> {
    let out = read_lines_of_words_delim(file_path, &[' ', '\t', ','], -1)
        .map_err(|e| user_error(format!("Failed to read baits file: {:#}", e)))?;

    let baits: Vec<GeneId> = out
        .lines
        .into_iter()
        .flatten()
        .filter(|w| !w.is_empty())
        .collect();

    info!("Read {} baits from {}", baits.len(), file_path);
    Ok(baits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_with_defaults() -> anyhow::Result<()> {
        let args = InvocationArgs::from_json_str(
            r#"{
                "output_dir": "out",
                "baits": ["gene1", "gene2"],
                "expression_matrices": ["m1.tsv"]
            }"#,
        )?;
        assert_eq!(args.baits, BaitsArg::List(vec!["gene1".into(), "gene2".into()]));
        assert_eq!(args.gene_families, None);
        assert_eq!(args.lower_percentile_rank, 5.0);
        assert_eq!(args.upper_percentile_rank, 95.0);
        assert_eq!(args.correlation_method, CorrelationMethod::Pearson);
        Ok(())
    }

    #[test]
    fn test_json_baits_file_and_method() -> anyhow::Result<()> {
        let args = InvocationArgs::from_json_str(
            r#"{
                "output_dir": "out",
                "baits": "baits.txt",
                "expression_matrices": [],
                "gene_families": "families.yaml",
                "lower_percentile_rank": 10,
                "upper_percentile_rank": 90.5,
                "correlation_method": "mutual_information"
            }"#,
        )?;
        assert_eq!(args.baits, BaitsArg::File("baits.txt".into()));
        assert_eq!(args.lower_percentile_rank, 10.0);
        assert_eq!(args.correlation_method, CorrelationMethod::MutualInformation);
        Ok(())
    }

    #[test]
    fn test_invalid_json_is_user_error() {
        let err = InvocationArgs::from_json_str("{").unwrap_err();
        assert!(crate::error::as_cenv_error(&err).is_some());
    }

    #[test]
    fn test_baits_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt")?;
        writeln!(file, "gene1, gene2")?;
        writeln!(file, "gene3\tgene4 gene5")?;
        file.flush()?;

        let baits = read_baits_file(file.path().to_str().unwrap())?;
        let expected: Vec<GeneId> = ["gene1", "gene2", "gene3", "gene4", "gene5"]
            .iter()
            .map(|&g| g.into())
            .collect();
        assert_eq!(baits, expected);
        Ok(())
    }
}
