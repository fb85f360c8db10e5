use crate::analyser::SignificantCorrelation;
use crate::colour::{distinct_colours, Rgb};
use crate::common::*;
use crate::families::GeneFamilies;
use matrix_util::utils::partition_by_membership;
use rand::Rng;
use serde::Serialize;
use std::hash::Hasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Bait,
    Family,
    Gene,
}

impl NodeType {
    /// Cytoscape attribute value
    pub fn description(&self) -> &'static str {
        match self {
            NodeType::Bait => "bait node",
            NodeType::Family => "family node",
            NodeType::Gene => "gene node",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: usize,
    pub label: Box<str>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub genes: BTreeSet<GeneId>,
    pub family: Option<Box<str>>,
    /// baits correlating with any of `genes`; empty for bait nodes
    pub baits: BTreeSet<GeneId>,
    pub colour: Rgb,
    pub partition_id: u64,
}

impl Node {
    pub fn is_bait(&self) -> bool {
        self.node_type == NodeType::Bait
    }
}

/// FNV-1a over the sorted bait ids, each terminated by `0xff`
///
/// Stable across runs and processes. Equal sets give equal ids; the
/// empty set is the partition of the bait nodes.
pub fn partition_hash<'a>(baits: impl IntoIterator<Item = &'a GeneId>) -> u64 {
    let mut sorted: Vec<&str> = baits.into_iter().map(|b| &**b).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut hasher = fnv::FnvHasher::default();
    for b in sorted {
        hasher.write(b.as_bytes());
        hasher.write_u8(0xff);
    }
    hasher.finish()
}

/// Build the bait, family and gene nodes of the network
///
/// * `baits` - bait ids in input order
/// * `significant_cors` - deduplicated significant correlations
/// * `families` - gene to family lookup
/// * `rng` - picks the partition colours
///
/// Ids are assigned to family nodes (by family name), then gene nodes
/// (by gene id), then bait nodes (input order).
pub fn assemble_nodes<R: Rng + ?Sized>(
    baits: &[GeneId],
    significant_cors: &[SignificantCorrelation],
    families: &GeneFamilies,
    rng: &mut R,
) -> Vec<Node> {
    let bait_set: HashSet<&str> = baits.iter().map(|b| &**b).collect();

    // family -> (genes, baits) and gene -> baits
    let mut family_groups: BTreeMap<Box<str>, (BTreeSet<GeneId>, BTreeSet<GeneId>)> =
        BTreeMap::new();
    let mut gene_groups: BTreeMap<GeneId, BTreeSet<GeneId>> = BTreeMap::new();

    for cor in significant_cors
        .iter()
        .filter(|c| !bait_set.contains(&*c.gene))
    {
        match families.family_of(&cor.gene) {
            Some(family) => {
                let (genes, group_baits) = family_groups.entry(family.into()).or_default();
                genes.insert(cor.gene.clone());
                group_baits.insert(cor.bait.clone());
            }
            None => {
                gene_groups
                    .entry(cor.gene.clone())
                    .or_default()
                    .insert(cor.bait.clone());
            }
        }
    }

    let family_nodes = family_groups
        .into_iter()
        .map(|(family, (genes, group_baits))| Node {
            id: 0,
            label: family.clone(),
            node_type: NodeType::Family,
            genes,
            family: Some(family),
            partition_id: partition_hash(&group_baits),
            baits: group_baits,
            colour: Rgb::WHITE,
        });

    let gene_nodes = gene_groups.into_iter().map(|(gene, gene_baits)| Node {
        id: 0,
        label: gene.clone(),
        node_type: NodeType::Gene,
        genes: BTreeSet::from([gene]),
        family: None,
        partition_id: partition_hash(&gene_baits),
        baits: gene_baits,
        colour: Rgb::WHITE,
    });

    let mut nodes: Vec<Node> = family_nodes.chain(gene_nodes).collect();
    assign_partition_colours(&mut nodes, rng);

    let empty_partition = partition_hash(&BTreeSet::<GeneId>::new());
    nodes.extend(baits.iter().map(|bait| Node {
        id: 0,
        label: bait.clone(),
        node_type: NodeType::Bait,
        genes: BTreeSet::from([bait.clone()]),
        family: families.family_of(bait).map(|f| f.into()),
        baits: BTreeSet::new(),
        colour: Rgb::WHITE,
        partition_id: empty_partition,
    }));

    for (id, node) in nodes.iter_mut().enumerate() {
        node.id = id;
    }

    info!(
        "Assembled {} nodes ({} baits)",
        nodes.len(),
        baits.len()
    );
    nodes
}

/// One distinct colour per partition, partitions taken in ascending id
fn assign_partition_colours<R: Rng + ?Sized>(nodes: &mut [Node], rng: &mut R) {
    let partition_ids: Vec<u64> = nodes.iter().map(|n| n.partition_id).collect();
    let mut partitions: Vec<(u64, Vec<usize>)> =
        partition_by_membership(&partition_ids).into_iter().collect();
    partitions.sort_by_key(|(pid, _)| *pid);

    let colours = distinct_colours(partitions.len(), rng);
    for ((_, members), colour) in partitions.iter().zip(colours) {
        for &i in members {
            nodes[i].colour = colour;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cor(bait: &str, gene: &str, correlation: f64) -> SignificantCorrelation {
        SignificantCorrelation {
            bait: bait.into(),
            gene: gene.into(),
            correlation,
        }
    }

    fn ids(xs: &[&str]) -> Vec<GeneId> {
        xs.iter().map(|&x| x.into()).collect()
    }

    fn set(xs: &[&str]) -> BTreeSet<GeneId> {
        xs.iter().map(|&x| x.into()).collect()
    }

    #[test]
    fn test_partition_hash_is_a_set_hash() {
        let a = ids(&["b1", "b2"]);
        let b = ids(&["b2", "b1", "b2"]);
        assert_eq!(partition_hash(&a), partition_hash(&b));
        assert_ne!(partition_hash(&a), partition_hash(&ids(&["b1"])));
        assert_ne!(partition_hash(&ids(&["ab", "c"])), partition_hash(&ids(&["a", "bc"])));
        assert_eq!(partition_hash(&ids(&[])), 0xcbf29ce484222325);
    }

    #[test]
    fn test_nodes_without_families() {
        let baits = ids(&["b1", "b2"]);
        let cors = vec![
            cor("b1", "b2", 0.9),
            cor("b1", "g1", 0.8),
            cor("b2", "g1", -0.7),
            cor("b2", "g2", 0.95),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let nodes = assemble_nodes(&baits, &cors, &GeneFamilies::empty(), &mut rng);

        let labels: Vec<&str> = nodes.iter().map(|n| &*n.label).collect();
        assert_eq!(labels, vec!["g1", "g2", "b1", "b2"]);
        assert!(nodes.iter().enumerate().all(|(i, n)| n.id == i));

        assert_eq!(nodes[0].node_type, NodeType::Gene);
        assert_eq!(nodes[0].baits, set(&["b1", "b2"]));
        assert_eq!(nodes[1].baits, set(&["b2"]));
        assert_ne!(nodes[0].partition_id, nodes[1].partition_id);
        assert_ne!(nodes[0].colour, nodes[1].colour);

        for bait in &nodes[2..] {
            assert!(bait.is_bait());
            assert_eq!(bait.colour, Rgb::WHITE);
            assert_eq!(bait.family, None);
            assert_eq!(bait.partition_id, partition_hash(&BTreeSet::<GeneId>::new()));
        }
    }

    #[test]
    fn test_family_nodes_group_genes() {
        let baits = ids(&["b1", "b2"]);
        let families = GeneFamilies::from_families([
            ("famB", vec!["b1", "b2"]),
            ("famX", vec!["g1", "g2"]),
        ])
        .unwrap();
        let cors = vec![cor("b1", "g1", 0.8), cor("b2", "g2", 0.7), cor("b1", "g3", 0.6)];
        let mut rng = StdRng::seed_from_u64(42);
        let nodes = assemble_nodes(&baits, &cors, &families, &mut rng);

        assert_eq!(nodes.len(), 4);
        let fam = &nodes[0];
        assert_eq!(fam.node_type, NodeType::Family);
        assert_eq!(&*fam.label, "famX");
        assert_eq!(fam.genes, set(&["g1", "g2"]));
        assert_eq!(fam.baits, set(&["b1", "b2"]));

        let gene = &nodes[1];
        assert_eq!(gene.node_type, NodeType::Gene);
        assert_eq!(gene.family, None);

        assert_eq!(nodes[2].family.as_deref(), Some("famB"));
        assert_eq!(nodes[3].family.as_deref(), Some("famB"));
    }

    #[test]
    fn test_shared_bait_set_shares_colour() {
        let baits = ids(&["b1", "b2"]);
        let cors = vec![cor("b1", "g1", 0.8), cor("b1", "g2", 0.7), cor("b2", "g3", 0.9)];
        let mut rng = StdRng::seed_from_u64(7);
        let nodes = assemble_nodes(&baits, &cors, &GeneFamilies::empty(), &mut rng);
        assert_eq!(nodes[0].partition_id, nodes[1].partition_id);
        assert_eq!(nodes[0].colour, nodes[1].colour);
        assert_ne!(nodes[0].colour, nodes[2].colour);
    }
}
