//! Channel catalog and layer grouping.
//!
//! OpenEXR stores flat scalar channels. Layers are purely a naming
//! convention: a channel named `diffuse.R` belongs to the layer `diffuse`,
//! a channel named `R` belongs to no layer. Nested names such as
//! `light.key.R` belong to the layer `light.key` only.
//!
//! The grouping is computed by [`group_layers`], which works on plain
//! strings so it can be tested without a container file.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Separator between a layer prefix and the final channel component.
pub const LAYER_SEPARATOR: char = '.';

/// Channels selected when the caller does not name any.
pub const DEFAULT_CHANNELS: [&str; 3] = ["R", "G", "B"];

/// Returns the layer prefix of a channel name, if it has one.
///
/// Names that start or end with the separator (`.R`, `R.`) have no layer.
///
/// ```rust
/// use exrio_core::catalog::layer_of;
///
/// assert_eq!(layer_of("diffuse.R"), Some("diffuse"));
/// assert_eq!(layer_of("light.key.R"), Some("light.key"));
/// assert_eq!(layer_of("R"), None);
/// ```
pub fn layer_of(channel: &str) -> Option<&str> {
    match channel.rfind(LAYER_SEPARATOR) {
        Some(pos) if pos > 0 && pos + 1 < channel.len() => Some(&channel[..pos]),
        _ => None,
    }
}

/// Groups channel names into layers by their prefix.
///
/// Within each layer, channels keep the order in which they were given.
pub fn group_layers<I, S>(channels: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut layers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in channels {
        let name = name.as_ref();
        if let Some(layer) = layer_of(name) {
            layers
                .entry(layer.to_string())
                .or_default()
                .push(name.to_string());
        }
    }
    layers
}

/// The channels and layers declared by one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelCatalog {
    channels: Vec<String>,
    layers: BTreeMap<String, Vec<String>>,
}

impl ChannelCatalog {
    /// Builds a catalog from channel names in container-declared order.
    pub fn new<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channels: Vec<String> = channels.into_iter().map(Into::into).collect();
        let layers = group_layers(&channels);
        Self { channels, layers }
    }

    /// All channel names, in declaration order.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Layer names, sorted.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// Number of declared channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if the container declares no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// True if a channel with exactly this name exists.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c == name)
    }

    /// True if at least one channel belongs to this layer.
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Channels of a layer in declaration order; empty for unknown layers.
    pub fn channels_in_layer(&self, layer: &str) -> &[String] {
        self.layers.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Checks that every name exists, reporting the first missing one.
    pub fn require<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        match names.iter().find(|n| !self.has_channel(n.as_ref())) {
            Some(missing) => Err(Error::not_found(missing.as_ref())),
            None => Ok(()),
        }
    }

    /// Resolves a caller request into an ordered channel selection.
    ///
    /// - `None` selects `R`, `G`, `B`
    /// - a layer name selects that layer's channels (layers win over channels)
    /// - a channel name selects just that channel
    ///
    /// Anything else fails with [`Error::NotFound`].
    pub fn resolve(&self, name: Option<&str>) -> Result<Vec<String>> {
        let Some(name) = name else {
            return Ok(DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect());
        };
        if let Some(members) = self.layers.get(name) {
            return Ok(members.clone());
        }
        if self.has_channel(name) {
            return Ok(vec![name.to_string()]);
        }
        Err(Error::not_found(name))
    }
}
