use crate::common::*;
use crate::cytoscape::write_cytoscape;
use crate::families::GeneFamilies;
use crate::input::InvocationArgs;
use crate::network::{create_network, Network, NetworkArgs, DEFAULT_RSEED};
use crate::output::*;
use crate::plot::write_sample_plots;

/// Read the inputs named in `args`, build the network and write every
/// artefact under the output directory
pub fn run_coexpnetviz(args: &InvocationArgs, network_name: &str) -> anyhow::Result<Network> {
    let output_dir = args.output_dir()?;

    let percentile_ranks = args.percentile_ranks()?;
    let baits = args.read_baits()?;
    let expression_matrices = args.read_expression_matrices()?;
    let gene_families: GeneFamilies = args.read_gene_families()?;

    info!(
        "{} baits, {} expression matrices, {} genes with a family, {} correlation",
        baits.len(),
        expression_matrices.len(),
        gene_families.len(),
        args.correlation_method
    );

    let network = create_network(&NetworkArgs {
        baits: &baits,
        expression_matrices: &expression_matrices,
        gene_families: &gene_families,
        percentile_ranks,
        correlation_method: args.correlation_method,
        rseed: DEFAULT_RSEED,
    })?;

    write_correlation_matrices(&output_dir, &network.matrix_infos)?;
    write_percentile_values(&output_dir, &network.matrix_infos)?;
    write_significant_correlations(&output_dir, &network)?;
    write_sample_plots(
        &output_dir,
        &network.matrix_infos,
        args.correlation_method.name(),
    )?;
    write_cytoscape(&output_dir, network_name, &network)?;

    Ok(network)
}
