use coexpnetviz::error::{as_cenv_error, CenvError};
use coexpnetviz::input::InvocationArgs;
use coexpnetviz::run::run_coexpnetviz;
use std::io::Write;
use std::path::Path;

fn write_file(path: &Path, content: &str) -> anyhow::Result<String> {
    std::fs::write(path, content)?;
    Ok(path.to_str().unwrap().to_string())
}

fn write_gz(path: &Path, content: &str) -> anyhow::Result<String> {
    let file = std::fs::File::create(path)?;
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(content.as_bytes())?;
    encoder.finish()?;
    Ok(path.to_str().unwrap().to_string())
}

fn read(dir: &Path, file: &str) -> anyhow::Result<Vec<String>> {
    Ok(std::fs::read_to_string(dir.join(file))?
        .lines()
        .map(|l| l.to_string())
        .collect())
}

const FAMILY_MATRIX: &str = "gene\tc1\tc2\tc3
bait1\t1\t2\t3
bait2\t2\t4\t5
gene1\t1\t3\t2
gene2\t2\t1\t4
gene3\t4\t1\t2
gene4\t2\t3\t1
";

const FAMILIES: &str = "fam1: [bait1, bait2]
fam2: [gene1, gene2]
fam3: [gene3, gene4]
";

#[test]
fn run_writes_all_artefacts() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;

    let matrix = write_file(&input.path().join("leaf.tsv"), FAMILY_MATRIX)?;
    let families = write_file(&input.path().join("families.yaml"), FAMILIES)?;
    let baits = write_file(&input.path().join("baits.txt"), "bait1,\nbait2\n")?;

    let json = serde_json::json!({
        "output_dir": out.path().to_str().unwrap(),
        "baits": baits,
        "expression_matrices": [matrix],
        "gene_families": families,
        "lower_percentile_rank": 50,
        "upper_percentile_rank": 50,
    });
    let args = InvocationArgs::from_json_str(&json.to_string())?;
    let network = run_coexpnetviz(&args, "leafnet")?;
    assert_eq!(network.nodes.len(), 4);

    let dir = out.path();
    for file in [
        "leaf.sample_matrix.txt",
        "leaf.correlation_matrix.txt",
        "leaf.sample_histogram.svg",
        "leaf.sample_cdf.svg",
    ] {
        assert!(dir.join(file).exists(), "missing {}", file);
    }

    let percentiles = read(dir, "percentile_values.txt")?;
    assert_eq!(percentiles.len(), 2);
    assert_eq!(percentiles[0], "expression_matrix\tlower\tupper");
    assert!(percentiles[1].starts_with("leaf\t"));

    let cors = read(dir, "significant_correlations.txt")?;
    assert_eq!(cors[0], "bait\tgene\tcorrelation");
    assert_eq!(cors.len(), 1 + network.significant_correlations.len());

    let cor_matrix = read(dir, "leaf.correlation_matrix.txt")?;
    assert_eq!(cor_matrix[0], "gene\tbait1\tbait2");
    assert_eq!(cor_matrix.len(), 7);

    let sif = read(dir, "leafnet.sif")?;
    assert_eq!(sif.len(), 6);
    assert_eq!(sif[0], "n2\tcor\tn0");
    assert_eq!(sif[5], "n2\thm\tn3");

    let nodes = read(dir, "leafnet.node.attr")?;
    assert_eq!(nodes.len(), 5);
    assert!(nodes[0].starts_with("id\tlabel\tcolour\ttype"));
    let fam2: Vec<&str> = nodes[1].split('\t').collect();
    assert_eq!(&fam2[..4], &["n0", "fam2", fam2[2], "family node"]);
    assert_eq!(fam2[5], "leaf");
    assert_eq!(fam2[6], "fam1");
    assert_eq!(fam2[8], "gene1, gene2");
    let bait1: Vec<&str> = nodes[3].split('\t').collect();
    assert_eq!(&bait1[1..5], &["bait1", "#FFFFFF", "bait node", "bait1"]);

    let edges = read(dir, "leafnet.edge.attr")?;
    assert_eq!(edges[0], "edge\tmax_correlation");
    assert!(edges[1].starts_with("n2 (cor) n0\t"));
    Ok(())
}

#[test]
fn run_reads_gzipped_matrices() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;

    let m1 = write_gz(
        &input.path().join("m1.tsv.gz"),
        "gene\ta\tb\tc\ngene1\t1\t2\t3\ngene2\t3\t2\t1\ngene3\t1\t2\t1\ngene4\t8\t3\t5\n",
    )?;
    let m2 = write_file(
        &input.path().join("m2.tsv"),
        "gene\ta\tb\tc\td\ngeneB1\t1\t2\t3\t4\ngeneB2\t4\t3\t2\t1\n",
    )?;

    let json = serde_json::json!({
        "output_dir": out.path().to_str().unwrap(),
        "baits": ["gene1", "gene2", "geneB1"],
        "expression_matrices": [m1, m2],
    });
    let args = InvocationArgs::from_json_str(&json.to_string())?;
    let network = run_coexpnetviz(&args, "network")?;

    assert_eq!(network.significant_correlations.len(), 3);
    let percentiles = read(out.path(), "percentile_values.txt")?;
    assert_eq!(percentiles.len(), 3);
    assert!(percentiles[1].starts_with("m1\t"));
    assert!(percentiles[2].starts_with("m2\t"));

    // every bait correlates with some gene
    let sif = read(out.path(), "network.sif")?;
    assert!(sif.iter().all(|l| l.contains("\tcor\t")));
    Ok(())
}

#[test]
fn lone_bait_is_listed_in_sif() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;

    // bait2 correlates weakly with everything, so only bait1 gets edges
    let m = write_file(
        &input.path().join("m.tsv"),
        "gene\ta\tb\tc\td\nbait1\t1\t2\t3\t4\ngene1\t1\t2\t3\t5\ngene2\t4\t3\t2\t1\nbait2\t1\t-1\t-1\t1\n",
    )?;

    let json = serde_json::json!({
        "output_dir": out.path().to_str().unwrap(),
        "baits": ["bait1", "bait2"],
        "expression_matrices": [m],
        "lower_percentile_rank": 0,
        "upper_percentile_rank": 100,
    });
    let args = InvocationArgs::from_json_str(&json.to_string())?;
    run_coexpnetviz(&args, "network")?;

    let sif = read(out.path(), "network.sif")?;
    assert_eq!(sif, vec!["n2\tcor\tn0", "n2\tcor\tn1", "n3"]);
    Ok(())
}

#[test]
fn missing_output_dir_is_a_user_error() -> anyhow::Result<()> {
    let out = tempfile::tempdir()?;
    let json = serde_json::json!({
        "output_dir": out.path().join("absent").to_str().unwrap(),
        "baits": ["a", "b"],
        "expression_matrices": [],
    });
    let args = InvocationArgs::from_json_str(&json.to_string())?;
    let err = run_coexpnetviz(&args, "network").unwrap_err();
    assert!(matches!(as_cenv_error(&err), Some(CenvError::User(_))));
    Ok(())
}

#[test]
fn unreadable_matrix_is_a_user_error() -> anyhow::Result<()> {
    let out = tempfile::tempdir()?;
    let json = serde_json::json!({
        "output_dir": out.path().to_str().unwrap(),
        "baits": ["a", "b"],
        "expression_matrices": [out.path().join("nope.tsv").to_str().unwrap()],
    });
    let args = InvocationArgs::from_json_str(&json.to_string())?;
    let err = run_coexpnetviz(&args, "network").unwrap_err();
    assert!(matches!(as_cenv_error(&err), Some(CenvError::User(_))));
    Ok(())
}
