//! Cytoscape import files: a simple interaction format (`.sif`) network
//! with node and edge attribute tables.

use crate::common::*;
use crate::network::Network;
use crate::nodes::{Node, NodeType};
use crate::output::output_file;
use matrix_util::common_io::write_lines;
use std::path::Path;

const NODE_ATTR_HEADER: &str = "id\tlabel\tcolour\ttype\tbait_gene\tspecies\tfamilies\tfamily\tcorrelating_genes_in_family\tpartition_id";

fn node_name(id: usize) -> String {
    format!("n{}", id)
}

/// Write `<name>.sif`, `<name>.node.attr` and `<name>.edge.attr`
pub fn write_cytoscape(dir: &Path, network_name: &str, network: &Network) -> anyhow::Result<()> {
    let sif_file = output_file(dir, &format!("{}.sif", network_name))?;
    write_lines(&sif_lines(network), &sif_file)?;

    let node_file = output_file(dir, &format!("{}.node.attr", network_name))?;
    write_lines(&node_attr_lines(network), &node_file)?;

    let edge_file = output_file(dir, &format!("{}.edge.attr", network_name))?;
    write_lines(&edge_attr_lines(network), &edge_file)?;

    info!(
        "Wrote Cytoscape network:\n{}\n{}\n{}",
        sif_file, node_file, edge_file
    );
    Ok(())
}

/// Correlation edges, homology edges, then bait nodes that have no edge
pub fn sif_lines(network: &Network) -> Vec<Box<str>> {
    let mut lines: Vec<Box<str>> = vec![];
    let mut connected: HashSet<usize> = HashSet::default();

    for e in &network.correlation_edges {
        lines.push(format!("{}\tcor\t{}", node_name(e.bait_node), node_name(e.node)).into());
        connected.insert(e.bait_node);
        connected.insert(e.node);
    }

    for e in &network.homology_edges {
        lines.push(format!("{}\thm\t{}", node_name(e.bait_node1), node_name(e.bait_node2)).into());
        connected.insert(e.bait_node1);
        connected.insert(e.bait_node2);
    }

    for node in network.nodes.iter().filter(|n| n.is_bait()) {
        if !connected.contains(&node.id) {
            lines.push(node_name(node.id).into());
        }
    }
    lines
}

pub fn node_attr_lines(network: &Network) -> Vec<Box<str>> {
    let gene_to_matrix: HashMap<&str, &str> = network
        .matrix_infos
        .iter()
        .flat_map(|info| {
            let name = &*info.matrix.name;
            info.matrix.genes.iter().map(move |g| (&**g, name))
        })
        .collect();

    let bait_family: HashMap<&str, &str> = network
        .nodes
        .iter()
        .filter(|n| n.is_bait())
        .filter_map(|n| Some((&*n.label, n.family.as_deref()?)))
        .collect();

    let mut lines: Vec<Box<str>> = Vec::with_capacity(network.nodes.len() + 1);
    lines.push(NODE_ATTR_HEADER.into());
    for node in &network.nodes {
        lines.push(node_attr_line(node, &gene_to_matrix, &bait_family).into());
    }
    lines
}

fn node_attr_line(
    node: &Node,
    gene_to_matrix: &HashMap<&str, &str>,
    bait_family: &HashMap<&str, &str>,
) -> String {
    let species: BTreeSet<&str> = node
        .genes
        .iter()
        .filter_map(|g| gene_to_matrix.get(&**g).copied())
        .collect();

    let families: BTreeSet<&str> = if node.is_bait() {
        node.family.as_deref().into_iter().collect()
    } else {
        node.baits
            .iter()
            .filter_map(|b| bait_family.get(&**b).copied())
            .collect()
    };

    let bait_gene = if node.is_bait() { &*node.label } else { "" };

    let correlating_genes = match node.node_type {
        NodeType::Family => node
            .genes
            .iter()
            .map(|g| &**g)
            .collect::<Vec<&str>>()
            .join(", "),
        _ => String::new(),
    };

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        node_name(node.id),
        node.label,
        node.colour,
        node.node_type.description(),
        bait_gene,
        species.into_iter().collect::<Vec<_>>().join(", "),
        families.into_iter().collect::<Vec<_>>().join(", "),
        node.family.as_deref().unwrap_or(""),
        correlating_genes,
        node.partition_id
    )
}

pub fn edge_attr_lines(network: &Network) -> Vec<Box<str>> {
    let mut lines: Vec<Box<str>> = Vec::with_capacity(network.correlation_edges.len() + 1);
    lines.push("edge\tmax_correlation".into());
    for e in &network.correlation_edges {
        lines.push(
            format!(
                "{} (cor) {}\t{}",
                node_name(e.bait_node),
                node_name(e.node),
                e.max_correlation
            )
            .into(),
        );
    }
    lines
}
