use crate::common::*;
use crate::error::user_error;
use crate::expression::ExpressionMatrix;

/// Check the cross-constraints between baits and expression matrices
///
/// * every bait is unique and present in exactly one matrix
/// * matrix names are unique and every matrix contains a bait
/// * no gene appears in more than one matrix
/// * there are at least two baits
pub fn validate_input(baits: &[GeneId], matrices: &[ExpressionMatrix]) -> anyhow::Result<()> {
    if baits.is_empty() {
        return Err(user_error("Baits list is empty. At least 2 baits are required."));
    }

    let duplicate_baits = duplicates(baits.iter().map(|b| &**b));
    if !duplicate_baits.is_empty() {
        return Err(user_error(format!(
            "Baits must be unique. Duplicate baits: {}",
            duplicate_baits.join(", ")
        )));
    }

    if matrices.is_empty() {
        return Err(user_error("At least one expression matrix is required."));
    }

    let duplicate_names = duplicates(matrices.iter().map(|m| &*m.name));
    if !duplicate_names.is_empty() {
        return Err(user_error(format!(
            "Expression matrix names must be unique (a matrix is named after its file). Duplicate names: {}",
            duplicate_names.join(", ")
        )));
    }

    let gene_sets: Vec<HashSet<&str>> = matrices
        .iter()
        .map(|m| m.genes.iter().map(|g| &**g).collect())
        .collect();

    validate_bait_coverage(baits, matrices, &gene_sets)?;
    validate_baitless_matrices(baits, matrices, &gene_sets)?;
    validate_disjoint_genes(matrices)?;

    if baits.len() < 2 {
        return Err(user_error(format!(
            "At least 2 baits are required, got {}.",
            baits.len()
        )));
    }

    Ok(())
}

/// Values seen more than once, sorted
fn duplicates<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = HashSet::default();
    let mut ret: BTreeSet<&str> = BTreeSet::new();
    for x in items {
        if !seen.insert(x) {
            ret.insert(x);
        }
    }
    ret.into_iter().collect()
}

fn validate_bait_coverage(
    baits: &[GeneId],
    matrices: &[ExpressionMatrix],
    gene_sets: &[HashSet<&str>],
) -> anyhow::Result<()> {
    let mut bad_rows = vec![];
    for bait in baits {
        let containing: Vec<&str> = matrices
            .iter()
            .zip(gene_sets)
            .filter(|(_, genes)| genes.contains(&**bait))
            .map(|(m, _)| &*m.name)
            .collect();
        if containing.len() != 1 {
            let found_in = if containing.is_empty() {
                "(none)".to_string()
            } else {
                containing.join(", ")
            };
            bad_rows.push(format!("{}\t{}", bait, found_in));
        }
    }

    if bad_rows.is_empty() {
        return Ok(());
    }

    Err(user_error(format!(
        "Each bait must be present in exactly one expression matrix. \
         Each bait listed below is either missing from all or present in multiple \
         expression matrices:\n\nbait\tfound in matrices\n{}",
        bad_rows.join("\n")
    )))
}

fn validate_baitless_matrices(
    baits: &[GeneId],
    matrices: &[ExpressionMatrix],
    gene_sets: &[HashSet<&str>],
) -> anyhow::Result<()> {
    let baitless: Vec<&str> = matrices
        .iter()
        .zip(gene_sets)
        .filter(|(_, genes)| !baits.iter().any(|b| genes.contains(&**b)))
        .map(|(m, _)| &*m.name)
        .collect();

    if baitless.is_empty() {
        return Ok(());
    }

    Err(user_error(format!(
        "Each expression matrix must contain at least one bait. \
         These matrices contain no bait:\n\n{}",
        baitless.join("\n")
    )))
}

fn validate_disjoint_genes(matrices: &[ExpressionMatrix]) -> anyhow::Result<()> {
    let mut gene_to_matrices: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for m in matrices {
        for g in m.genes.iter() {
            gene_to_matrices.entry(&**g).or_default().push(&*m.name);
        }
    }

    let overlap: Vec<String> = gene_to_matrices
        .iter()
        .filter(|(_, found)| found.len() > 1)
        .map(|(gene, found)| format!("{}\t{}", gene, found.join(", ")))
        .collect();

    if overlap.is_empty() {
        return Ok(());
    }

    Err(user_error(format!(
        "A gene may appear in at most one expression matrix. \
         These genes appear in multiple matrices:\n\ngene\tmatrices\n{}",
        overlap.join("\n")
    )))
}
