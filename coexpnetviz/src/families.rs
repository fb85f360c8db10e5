use crate::common::*;
use crate::error::user_error;
use matrix_util::common_io::open_buf_reader;

/// Partial partition of genes into named (homology) families
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneFamilies {
    gene_to_family: HashMap<GeneId, Box<str>>,
}

impl GeneFamilies {
    /// No gene has a family
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(family, genes)` pairs
    ///
    /// A gene listed under two different families is a user error.
    pub fn from_families<F, G, I>(families: impl IntoIterator<Item = (F, I)>) -> anyhow::Result<Self>
    where
        F: AsRef<str>,
        G: AsRef<str>,
        I: IntoIterator<Item = G>,
    {
        let mut gene_to_family: HashMap<GeneId, Box<str>> = HashMap::default();
        let mut conflicts: BTreeMap<GeneId, BTreeSet<Box<str>>> = BTreeMap::new();

        for (family, genes) in families {
            let family: Box<str> = family.as_ref().into();
            for gene in genes {
                let gene: GeneId = gene.as_ref().into();
                match gene_to_family.get(&gene) {
                    Some(other) if *other != family => {
                        let entry = conflicts.entry(gene.clone()).or_default();
                        entry.insert(other.clone());
                        entry.insert(family.clone());
                    }
                    Some(_) => {}
                    None => {
                        gene_to_family.insert(gene, family.clone());
                    }
                }
            }
        }

        if !conflicts.is_empty() {
            let mut msg = String::from(
                "Each gene may belong to at most one gene family. These genes are listed under multiple families:\n\ngene\tfamilies\n",
            );
            for (gene, families) in conflicts.iter() {
                let families: Vec<&str> = families.iter().map(|f| &**f).collect();
                msg.push_str(&format!("{}\t{}\n", gene, families.join(", ")));
            }
            return Err(user_error(msg));
        }

        Ok(Self { gene_to_family })
    }

    /// Read a YAML mapping of family name to a list of gene ids
    pub fn from_yaml_file(file_path: &str) -> anyhow::Result<Self> {
        let reader = open_buf_reader(file_path)?;
        let families: BTreeMap<String, Vec<String>> = serde_yaml::from_reader(reader)
            .map_err(|e| user_error(format!("Failed to read gene families {}: {}", file_path, e)))?;

        let ret = Self::from_families(families)?;
        info!(
            "Read {} gene family assignments from {}",
            ret.len(),
            file_path
        );
        Ok(ret)
    }

    pub fn family_of(&self, gene: &str) -> Option<&str> {
        self.gene_to_family.get(gene).map(|f| &**f)
    }

    /// number of genes with a family
    pub fn len(&self) -> usize {
        self.gene_to_family.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_to_family.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup() -> anyhow::Result<()> {
        let fams = GeneFamilies::from_families([("fam1", ["a", "b"]), ("fam2", ["c", "c"])])?;
        assert_eq!(fams.family_of("a"), Some("fam1"));
        assert_eq!(fams.family_of("c"), Some("fam2"));
        assert_eq!(fams.family_of("z"), None);
        assert_eq!(fams.len(), 3);
        Ok(())
    }

    #[test]
    fn test_gene_in_two_families() {
        let res = GeneFamilies::from_families([("fam1", vec!["a"]), ("fam2", vec!["a", "b"])]);
        let msg = format!("{}", res.unwrap_err());
        assert!(msg.contains("a\tfam1, fam2"));
    }

    #[test]
    fn test_yaml() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml")?;
        writeln!(file, "fam1: [bait1, bait2]")?;
        writeln!(file, "fam2:")?;
        writeln!(file, "  - gene1")?;
        writeln!(file, "  - gene2")?;
        file.flush()?;

        let fams = GeneFamilies::from_yaml_file(file.path().to_str().unwrap())?;
        assert_eq!(fams.family_of("bait2"), Some("fam1"));
        assert_eq!(fams.family_of("gene1"), Some("fam2"));
        Ok(())
    }
}
