use crate::analyser::MatrixInfo;
use crate::common::*;
use crate::edges::{CorrelationEdge, HomologyEdge};
use crate::network::Network;
use crate::nodes::Node;
use matrix_util::common_io::write_lines;
use matrix_util::traits::IoOps;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const PERCENTILE_VALUES_FILE: &str = "percentile_values.txt";
pub const SIGNIFICANT_CORRELATIONS_FILE: &str = "significant_correlations.txt";

/// `dir/file` as a string path
pub fn output_file(dir: &Path, file: &str) -> anyhow::Result<String> {
    dir.join(file)
        .to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 output path under {}", dir.display()))
}

/// The sample and full correlation matrices of every expression matrix
pub fn write_correlation_matrices(dir: &Path, infos: &[MatrixInfo]) -> anyhow::Result<()> {
    for info in infos {
        let name = &info.matrix.name;

        let sample_file = output_file(dir, &format!("{}.sample_matrix.txt", name))?;
        let sample = &info.sample_correlations;
        sample
            .mat
            .to_tsv_with_names(&sample_file, &sample.rows, &sample.cols, "gene")?;

        let cor_file = output_file(dir, &format!("{}.correlation_matrix.txt", name))?;
        let cor = &info.correlations;
        cor.mat
            .to_tsv_with_names(&cor_file, &cor.rows, &cor.cols, "gene")?;

        info!("Wrote {} and {}", sample_file, cor_file);
    }
    Ok(())
}

pub fn write_percentile_values(dir: &Path, infos: &[MatrixInfo]) -> anyhow::Result<()> {
    let mut lines: Vec<Box<str>> = Vec::with_capacity(infos.len() + 1);
    lines.push("expression_matrix\tlower\tupper".into());
    for info in infos {
        lines.push(
            format!(
                "{}\t{}\t{}",
                info.matrix.name, info.cutoffs.lower, info.cutoffs.upper
            )
            .into_boxed_str(),
        );
    }
    write_lines(&lines, &output_file(dir, PERCENTILE_VALUES_FILE)?)
}

pub fn write_significant_correlations(dir: &Path, network: &Network) -> anyhow::Result<()> {
    let cors = &network.significant_correlations;
    let mut lines: Vec<Box<str>> = Vec::with_capacity(cors.len() + 1);
    lines.push("bait\tgene\tcorrelation".into());
    lines.extend(
        cors.iter()
            .map(|c| format!("{}\t{}\t{}", c.bait, c.gene, c.correlation).into_boxed_str()),
    );
    write_lines(&lines, &output_file(dir, SIGNIFICANT_CORRELATIONS_FILE)?)
}

#[derive(Serialize)]
struct NetworkJson<'a> {
    nodes: &'a [Node],
    homology_edges: &'a [HomologyEdge],
    cor_edges: &'a [CorrelationEdge],
}

/// Nodes and edges as one JSON object
pub fn network_json(network: &Network) -> anyhow::Result<String> {
    Ok(serde_json::to_string(&NetworkJson {
        nodes: &network.nodes,
        homology_edges: &network.homology_edges,
        cor_edges: &network.correlation_edges,
    })?)
}

/// Write [`network_json`] followed by a newline; a closed pipe surfaces
/// as an `std::io::Error`
pub fn write_network_json(writer: &mut impl Write, network: &Network) -> anyhow::Result<()> {
    let json = network_json(network)?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}
