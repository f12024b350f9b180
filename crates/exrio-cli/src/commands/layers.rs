//! Layer listing command.

use crate::LayersArgs;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tracing::trace;

#[derive(Debug, Serialize)]
struct LayerReport {
    name: String,
    channels: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FileLayers {
    file: String,
    layers: Vec<LayerReport>,
    /// Channels without a layer prefix
    ungrouped: Vec<String>,
}

/// Lists layers and their member channels for each input.
pub fn run(args: LayersArgs, verbose: u8) -> Result<()> {
    let mut all = Vec::with_capacity(args.input.len());
    for path in &args.input {
        trace!(path = %path.display(), "layers::run");
        all.push(collect(path)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    for (idx, file) in all.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{}", file.file);
        println!("  Layers: {}", file.layers.len());
        for layer in &file.layers {
            if verbose > 0 {
                println!("    {}", layer.name);
                for ch in &layer.channels {
                    println!("      {}", ch);
                }
            } else {
                println!("    {} [{}]", layer.name, layer.channels.join(", "));
            }
        }
        if !file.ungrouped.is_empty() {
            println!("  Channels: {}", file.ungrouped.join(", "));
        }
    }
    Ok(())
}

fn collect(path: &Path) -> Result<FileLayers> {
    let file = super::open_file(path)?;
    let catalog = file.catalog();

    let layers = catalog
        .layers()
        .map(|name| LayerReport {
            name: name.to_string(),
            channels: catalog.channels_in_layer(name).to_vec(),
        })
        .collect();
    let ungrouped = catalog
        .channels()
        .iter()
        .filter(|ch| exrio_core::catalog::layer_of(ch).is_none())
        .cloned()
        .collect();

    Ok(FileLayers {
        file: path.display().to_string(),
        layers,
        ungrouped,
    })
}
