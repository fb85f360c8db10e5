use crate::analyser::{MatrixAnalyser, MatrixInfo, PercentileRanks, SignificantCorrelation};
use crate::common::*;
use crate::correlation::CorrelationMethod;
use crate::edges::{correlation_edges, homology_edges, CorrelationEdge, HomologyEdge};
use crate::expression::ExpressionMatrix;
use crate::families::GeneFamilies;
use crate::nodes::{assemble_nodes, Node};
use crate::validate::validate_input;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed of the random source used when none is given
pub const DEFAULT_RSEED: u64 = 42;

pub struct NetworkArgs<'a> {
    /// bait ids, in input order
    pub baits: &'a [GeneId],
    pub expression_matrices: &'a [ExpressionMatrix],
    pub gene_families: &'a GeneFamilies,
    pub percentile_ranks: PercentileRanks,
    pub correlation_method: CorrelationMethod,
    /// seeds row sampling and partition colours
    pub rseed: u64,
}

impl<'a> NetworkArgs<'a> {
    /// Pearson correlation, percentile ranks (5, 95) and the default seed
    pub fn new(
        baits: &'a [GeneId],
        expression_matrices: &'a [ExpressionMatrix],
        gene_families: &'a GeneFamilies,
    ) -> Self {
        Self {
            baits,
            expression_matrices,
            gene_families,
            percentile_ranks: PercentileRanks {
                lower: 5.0,
                upper: 95.0,
            },
            correlation_method: CorrelationMethod::default(),
            rseed: DEFAULT_RSEED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    pub significant_correlations: Vec<SignificantCorrelation>,
    pub nodes: Vec<Node>,
    pub homology_edges: Vec<HomologyEdge>,
    pub correlation_edges: Vec<CorrelationEdge>,
    /// one per expression matrix, in input order
    pub matrix_infos: Vec<MatrixInfo>,
}

/// Build the comparative co-expression network
pub fn create_network(args: &NetworkArgs) -> anyhow::Result<Network> {
    validate_input(args.baits, args.expression_matrices)?;

    let mut rng = StdRng::seed_from_u64(args.rseed);
    let analyser = MatrixAnalyser::new(args.correlation_method, args.percentile_ranks);

    let mut significant = vec![];
    let mut matrix_infos = Vec::with_capacity(args.expression_matrices.len());
    for matrix in args.expression_matrices {
        let (cors, info) = analyser.process(matrix, args.baits, &mut rng)?;
        significant.extend(cors);
        matrix_infos.push(info);
    }

    let significant = remove_self_and_swapped(significant, args.baits);
    info!("{} significant correlations in total", significant.len());

    let nodes = assemble_nodes(args.baits, &significant, args.gene_families, &mut rng);
    let homology_edges = homology_edges(&nodes);
    let correlation_edges = correlation_edges(&nodes, &significant)?;

    info!(
        "Network: {} nodes, {} homology edges, {} correlation edges",
        nodes.len(),
        homology_edges.len(),
        correlation_edges.len()
    );

    Ok(Network {
        significant_correlations: significant,
        nodes,
        homology_edges,
        correlation_edges,
        matrix_infos,
    })
}

/// Drop a bait's correlation with itself, and keep one of the two rows
/// relating a pair of baits (the one with `bait < gene`)
///
/// The `bait < gene` order is only enforced when `gene` is itself a bait.
/// A bait-to-non-bait row is kept whatever the order of the two ids, so
/// `(zeta, alpha)` survives when `alpha` is not a bait.
pub fn remove_self_and_swapped(
    cors: Vec<SignificantCorrelation>,
    baits: &[GeneId],
) -> Vec<SignificantCorrelation> {
    let bait_set: HashSet<&str> = baits.iter().map(|b| &**b).collect();
    cors.into_iter()
        .filter(|c| {
            if c.bait == c.gene {
                return false;
            }
            !(bait_set.contains(&*c.gene) && c.gene < c.bait)
        })
        .collect()
}
