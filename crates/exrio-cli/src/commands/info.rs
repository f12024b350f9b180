//! File info command.
//!
//! Prints the data window, channel list, layer names and compression of each
//! input. With `--stats` every unit-sampled channel is decoded and its
//! min/max reported. Inputs are inspected in parallel; output keeps the
//! argument order.

use crate::InfoArgs;
use anyhow::{Context, Result};
use exrio_io::ExrInputFile;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    size_bytes: u64,
    /// `[min_x, min_y, max_x, max_y]`, inclusive
    data_window: [i32; 4],
    width: usize,
    height: usize,
    compression: String,
    tiled: bool,
    parts: usize,
    channels: Vec<ChannelReport>,
    layers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChannelReport {
    name: String,
    sample_type: String,
    sampling: (usize, usize),
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<ChannelStats>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct ChannelStats {
    min: f32,
    max: f32,
    mean: f64,
    /// NaN and infinite samples, excluded from min/max/mean
    non_finite: usize,
}

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    trace!(inputs = args.input.len(), stats = args.stats, "info::run");

    let reports: Vec<FileReport> = args
        .input
        .par_iter()
        .map(|path| inspect(path, args.stats))
        .collect::<Result<_>>()?;

    if args.json {
        let out = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        println!("{}", out);
        return Ok(());
    }

    for (idx, report) in reports.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        print_text(report, verbose);
    }
    Ok(())
}

fn inspect(path: &Path, with_stats: bool) -> Result<FileReport> {
    let size_bytes = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat: {}", path.display()))?
        .len();
    let file = super::open_file(path)?;
    let header = file.header();
    let window = file.data_window();

    let stats = if with_stats {
        channel_stats(&file).with_context(|| format!("Failed to read: {}", path.display()))?
    } else {
        Vec::new()
    };

    let channels = header
        .channels
        .iter()
        .map(|ch| ChannelReport {
            name: ch.name.clone(),
            sample_type: format!("{:?}", ch.sample_type),
            sampling: ch.sampling,
            stats: stats
                .iter()
                .find(|(name, _)| *name == ch.name)
                .map(|(_, s)| *s),
        })
        .collect();

    debug!(path = %path.display(), window = %window, "inspected");

    Ok(FileReport {
        file: path.display().to_string(),
        size_bytes,
        data_window: [window.min_x(), window.min_y(), window.max_x(), window.max_y()],
        width: window.width(),
        height: window.height(),
        compression: header.compression.clone(),
        tiled: header.tiled,
        parts: header.parts,
        channels,
        layers: file.layers(),
    })
}

/// Decodes all unit-sampled channels in one pass.
fn channel_stats(file: &ExrInputFile) -> Result<Vec<(String, ChannelStats)>> {
    if file.header().deep {
        return Ok(Vec::new());
    }
    let names: Vec<&str> = file
        .header()
        .channels
        .iter()
        .filter(|ch| ch.sampling == (1, 1))
        .map(|ch| ch.name.as_str())
        .collect();
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let buffer = file.get_channels(&names)?;
    let planes = buffer.to_planes(names.len());
    Ok(names
        .iter()
        .zip(planes.iter())
        .map(|(name, plane)| (name.to_string(), compute_stats(plane)))
        .collect())
}

fn compute_stats(samples: &[f32]) -> ChannelStats {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut finite = 0usize;
    for &v in samples {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            finite += 1;
        }
    }
    if finite == 0 {
        min = f32::NAN;
        max = f32::NAN;
    }
    ChannelStats {
        min,
        max,
        mean: if finite > 0 { sum / finite as f64 } else { f64::NAN },
        non_finite: samples.len() - finite,
    }
}

fn print_text(report: &FileReport, verbose: u8) {
    let [min_x, min_y, max_x, max_y] = report.data_window;
    println!("{}", report.file);
    println!("  Resolution: {}x{}", report.width, report.height);
    println!("  Window:     ({}, {}) - ({}, {})", min_x, min_y, max_x, max_y);
    println!("  Channels:   {}", report.channels.len());
    println!("  File size:  {}", super::format_size(report.size_bytes));
    println!("  Compression: {}", report.compression);
    if !report.layers.is_empty() {
        println!("  Layers:     {}", report.layers.join(", "));
    }
    if verbose > 0 {
        println!("  Tiled:      {}", report.tiled);
        println!("  Parts:      {}", report.parts);
    }

    for ch in &report.channels {
        let mut line = format!("    {} ({})", ch.name, ch.sample_type);
        if ch.sampling != (1, 1) {
            line.push_str(&format!(" sampling {}x{}", ch.sampling.0, ch.sampling.1));
        }
        if let Some(s) = ch.stats {
            line.push_str(&format!(" min {:.6} max {:.6} avg {:.6}", s.min, s.max, s.mean));
            if s.non_finite > 0 {
                line.push_str(&format!(" non-finite {}", s.non_finite));
            }
        }
        println!("{}", line);
    }
}
