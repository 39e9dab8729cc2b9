#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]

//! Measures how evenly the chained table spreads keys over its buckets and
//! plots chain lengths across load factor thresholds.

use chainmap::{BucketStats, HashTable};
use log::{LevelFilter, info};
use plotters::prelude::*;
use rand::Rng;

const NUM_KEYS: usize = 200_000;
// Thresholds from 0.25 to 1.0
const NUM_THRESHOLDS: usize = 10;

// Key sets to compare
const KEY_SETS: [&str; 2] = ["Random", "Sequential"];

fn build_keys(kind: &str, rng: &mut impl Rng) -> Vec<u64> {
    match kind {
        "Random" => (0..NUM_KEYS).map(|_| rng.random()).collect(),
        _ => (0..NUM_KEYS as u64).collect(),
    }
}

fn measure(keys: &[u64], threshold: f64) -> Result<BucketStats, chainmap::HashTableError> {
    let mut table = HashTable::with_capacity_and_load_factor(1, threshold)?;
    for &key in keys {
        table.insert(key, ())?;
    }
    Ok(table.bucket_stats())
}

fn draw_metric(
    path: &str,
    caption: &str,
    y_desc: &str,
    thresholds: &[f64],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50),  // Bright red
        RGBColor(50, 90, 220),  // Bright blue
    ];

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series
        .iter()
        .flat_map(|v| v.iter())
        .fold(0.0, |max: f64, &x| max.max(x)) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.2..1.05, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor Threshold")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (set_idx, &name) in KEY_SETS.iter().enumerate() {
        let color = &colors[set_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(2);
        let points: Vec<(f64, f64)> =
            thresholds.iter().copied().zip(series[set_idx].iter().copied()).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new().filter_level(LevelFilter::Info).parse_default_env().init();

    let thresholds: Vec<f64> = (0..NUM_THRESHOLDS)
        .map(|i| 0.25 + (1.0 - 0.25) * (i as f64) / ((NUM_THRESHOLDS - 1) as f64))
        .collect();
    info!("Load factor thresholds: {thresholds:?}");

    let mut rng = rand::rng();
    let mut longest_chain: Vec<Vec<f64>> = vec![Vec::new(); KEY_SETS.len()];
    let mut mean_chain: Vec<Vec<f64>> = vec![Vec::new(); KEY_SETS.len()];
    let mut occupancy: Vec<Vec<f64>> = vec![Vec::new(); KEY_SETS.len()];

    for (set_idx, &kind) in KEY_SETS.iter().enumerate() {
        let keys = build_keys(kind, &mut rng);
        info!("Testing {} keys of kind {kind}", keys.len());

        for &threshold in &thresholds {
            let stats = measure(&keys, threshold)?;
            info!("  threshold {threshold:.2}: {stats}");

            longest_chain[set_idx].push(stats.longest_chain as f64);
            mean_chain[set_idx].push(stats.mean_chain());
            occupancy[set_idx].push(stats.occupancy());
        }
    }

    draw_metric(
        "longest_chain.png",
        "Longest Bucket Chain",
        "Entries in the longest chain",
        &thresholds,
        &longest_chain,
    )?;
    draw_metric(
        "mean_chain.png",
        "Average Chain Length of Occupied Buckets",
        "Entries per occupied bucket",
        &thresholds,
        &mean_chain,
    )?;
    draw_metric(
        "bucket_occupancy.png",
        "Fraction of Buckets in Use",
        "Occupied buckets / capacity",
        &thresholds,
        &occupancy,
    )?;

    info!("Generated plot images: longest_chain.png, mean_chain.png, bucket_occupancy.png");

    Ok(())
}
