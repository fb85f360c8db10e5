use crate::analyser::SignificantCorrelation;
use crate::common::*;
use crate::nodes::Node;
use serde::Serialize;

/// Two bait nodes in the same gene family, `bait_node1 < bait_node2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct HomologyEdge {
    pub bait_node1: usize,
    pub bait_node2: usize,
}

/// Strongest significant correlation between a bait and the genes of a
/// node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationEdge {
    pub bait_node: usize,
    pub node: usize,
    pub max_correlation: f64,
}

pub fn homology_edges(nodes: &[Node]) -> Vec<HomologyEdge> {
    let mut by_family: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for node in nodes.iter().filter(|n| n.is_bait()) {
        if let Some(family) = node.family.as_deref() {
            by_family.entry(family).or_default().push(node.id);
        }
    }

    let mut edges = vec![];
    for ids in by_family.values() {
        for (k, &a) in ids.iter().enumerate() {
            for &b in &ids[(k + 1)..] {
                edges.push(HomologyEdge {
                    bait_node1: a.min(b),
                    bait_node2: a.max(b),
                });
            }
        }
    }
    edges.sort();
    edges
}

/// Aggregate significant correlations per `(bait node, node)`
///
/// The correlation with the greatest magnitude is kept; on a tie the
/// first one encountered wins. Edges are sorted by `(bait_node, node)`.
pub fn correlation_edges(
    nodes: &[Node],
    significant_cors: &[SignificantCorrelation],
) -> anyhow::Result<Vec<CorrelationEdge>> {
    if significant_cors.is_empty() {
        return Ok(vec![]);
    }

    let gene_to_node: HashMap<&str, usize> = nodes
        .iter()
        .flat_map(|n| n.genes.iter().map(move |g| (&**g, n.id)))
        .collect();

    let node_of = |gene: &str| -> anyhow::Result<usize> {
        gene_to_node
            .get(gene)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("gene {} is not part of any node", gene))
    };

    let mut best: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for cor in significant_cors {
        let key = (node_of(&*cor.bait)?, node_of(&*cor.gene)?);
        best.entry(key)
            .and_modify(|c| {
                if cor.correlation.abs() > c.abs() {
                    *c = cor.correlation;
                }
            })
            .or_insert(cor.correlation);
    }

    Ok(best
        .into_iter()
        .map(|((bait_node, node), max_correlation)| CorrelationEdge {
            bait_node,
            node,
            max_correlation,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Rgb;
    use crate::nodes::NodeType;

    fn node(id: usize, node_type: NodeType, genes: &[&str], family: Option<&str>) -> Node {
        Node {
            id,
            label: genes[0].into(),
            node_type,
            genes: genes.iter().map(|&g| g.into()).collect(),
            family: family.map(|f| f.into()),
            baits: BTreeSet::new(),
            colour: Rgb::WHITE,
            partition_id: 0,
        }
    }

    fn cor(bait: &str, gene: &str, correlation: f64) -> SignificantCorrelation {
        SignificantCorrelation {
            bait: bait.into(),
            gene: gene.into(),
            correlation,
        }
    }

    #[test]
    fn test_homology_edges() {
        let nodes = vec![
            node(0, NodeType::Family, &["g1"], Some("f1")),
            node(1, NodeType::Bait, &["b1"], Some("f1")),
            node(2, NodeType::Bait, &["b2"], None),
            node(3, NodeType::Bait, &["b3"], Some("f1")),
            node(4, NodeType::Bait, &["b4"], Some("f2")),
        ];
        let edges = homology_edges(&nodes);
        assert_eq!(
            edges,
            vec![HomologyEdge {
                bait_node1: 1,
                bait_node2: 3
            }]
        );
    }

    #[test]
    fn test_max_abs_correlation() -> anyhow::Result<()> {
        let nodes = vec![
            node(0, NodeType::Family, &["g1", "g2"], Some("f")),
            node(1, NodeType::Bait, &["b1"], None),
            node(2, NodeType::Bait, &["b2"], None),
        ];
        let cors = vec![
            cor("b2", "g1", 0.5),
            cor("b1", "g1", 0.6),
            cor("b1", "g2", -0.7),
            cor("b1", "b2", 0.9),
            cor("b2", "g2", -0.5),
        ];
        let edges = correlation_edges(&nodes, &cors)?;
        assert_eq!(
            edges,
            vec![
                CorrelationEdge {
                    bait_node: 1,
                    node: 0,
                    max_correlation: -0.7
                },
                CorrelationEdge {
                    bait_node: 1,
                    node: 2,
                    max_correlation: 0.9
                },
                CorrelationEdge {
                    bait_node: 2,
                    node: 0,
                    max_correlation: 0.5
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_empty_and_unknown_genes() -> anyhow::Result<()> {
        let nodes = vec![node(0, NodeType::Bait, &["b1"], None)];
        assert!(correlation_edges(&nodes, &[])?.is_empty());
        assert!(correlation_edges(&nodes, &[cor("b1", "ghost", 0.9)]).is_err());
        Ok(())
    }
}
