use crate::analyser::{Cutoffs, MatrixInfo};
use crate::common::*;
use crate::output::output_file;
use plotters::prelude::*;
use std::path::Path;

const PLOT_SIZE: (u32, u32) = (800, 600);
const NUM_BINS: usize = 50;

/// Histogram and empirical CDF of the sample correlations of every
/// matrix, with the cutoffs marked
pub fn write_sample_plots(dir: &Path, infos: &[MatrixInfo], method_name: &str) -> anyhow::Result<()> {
    for info in infos {
        let values = info.sample_correlation_values();
        if values.is_empty() {
            warn!("No sample correlations to plot for {}", info.matrix.name);
            continue;
        }

        let hist_file = output_file(dir, &format!("{}.sample_histogram.svg", info.matrix.name))?;
        plot_histogram(
            &hist_file,
            &format!("Sample {} of {}", method_name, info.matrix.name),
            method_name,
            &values,
            &info.cutoffs,
        )?;

        let cdf_file = output_file(dir, &format!("{}.sample_cdf.svg", info.matrix.name))?;
        plot_cdf(
            &cdf_file,
            &format!("Sample {} CDF of {}", method_name, info.matrix.name),
            method_name,
            &values,
            &info.cutoffs,
        )?;
    }
    Ok(())
}

/// x range covering the values and both cutoffs, never empty
fn value_range(values: &[f64], cutoffs: &Cutoffs) -> (f64, f64) {
    let lo = values.iter().copied().fold(cutoffs.lower, f64::min);
    let hi = values.iter().copied().fold(cutoffs.upper, f64::max);
    if hi - lo < 1e-8 {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

fn bin_counts(values: &[f64], lo: f64, width: f64) -> Vec<usize> {
    let mut counts = vec![0usize; NUM_BINS];
    for &x in values {
        let b = (((x - lo) / width).floor().max(0.0) as usize).min(NUM_BINS - 1);
        counts[b] += 1;
    }
    counts
}

pub fn plot_histogram(
    file: &str,
    title: &str,
    x_desc: &str,
    values: &[f64],
    cutoffs: &Cutoffs,
) -> anyhow::Result<()> {
    let (lo, hi) = value_range(values, cutoffs);
    let width = (hi - lo) / NUM_BINS as f64;
    let counts = bin_counts(values, lo, width);
    let ymax = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

    let root = SVGBackend::new(file, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0f64..ymax)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc("count")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &c)| {
        let x0 = lo + i as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, c as f64)], BLUE.mix(0.6).filled())
    }))?;

    for cut in [cutoffs.lower, cutoffs.upper] {
        chart.draw_series(LineSeries::new(vec![(cut, 0.0), (cut, ymax)], &RED))?;
    }

    root.present()?;
    info!("Wrote {}", file);
    Ok(())
}

pub fn plot_cdf(
    file: &str,
    title: &str,
    x_desc: &str,
    values: &[f64],
    cutoffs: &Cutoffs,
) -> anyhow::Result<()> {
    let (lo, hi) = value_range(values, cutoffs);

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len() as f64;

    let root = SVGBackend::new(file, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0f64..1f64)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("cumulative fraction")
        .draw()?;

    chart.draw_series(LineSeries::new(
        sorted
            .iter()
            .enumerate()
            .map(|(i, &x)| (x, (i + 1) as f64 / n)),
        &BLUE,
    ))?;

    for cut in [cutoffs.lower, cutoffs.upper] {
        chart.draw_series(LineSeries::new(vec![(cut, 0.0), (cut, 1.0)], &RED))?;
    }

    root.present()?;
    info!("Wrote {}", file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_counts_cover_range() {
        let values = [0.0, 0.5, 1.0, 1.0];
        let counts = bin_counts(&values, 0.0, 1.0 / NUM_BINS as f64);
        assert_eq!(counts.iter().sum::<usize>(), 4);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[NUM_BINS - 1], 2);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let cutoffs = Cutoffs {
            lower: -1.0,
            upper: -1.0,
        };
        assert_eq!(value_range(&[-1.0], &cutoffs), (-1.5, -0.5));
    }

    #[test]
    fn test_svg_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cutoffs = Cutoffs {
            lower: -0.5,
            upper: 0.5,
        };
        let values = [-0.9, -0.3, 0.0, 0.2, 0.7];

        let hist = dir.path().join("h.svg");
        let cdf = dir.path().join("c.svg");
        plot_histogram(hist.to_str().unwrap(), "h", "pearson", &values, &cutoffs)?;
        plot_cdf(cdf.to_str().unwrap(), "c", "pearson", &values, &cutoffs)?;

        assert!(std::fs::read_to_string(&hist)?.contains("<svg"));
        assert!(std::fs::read_to_string(&cdf)?.contains("<svg"));
        Ok(())
    }
}
