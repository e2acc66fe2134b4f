use serde::{Deserialize, Serialize};

/// Which optional passes ring perception runs.
///
/// The default finds small rings only: no aromaticity and no ring sizes for
/// atoms that are only part of rings larger than seven atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RingMode {
    pub aromaticity: bool,
    pub large_rings: bool,
}

impl RingMode {
    pub fn with_aromaticity(mut self, aromaticity: bool) -> Self {
        self.aromaticity = aromaticity;
        self
    }

    pub fn with_large_rings(mut self, large_rings: bool) -> Self {
        self.large_rings = large_rings;
        self
    }
}

/// Settings for encoding and decoding idcodes.
///
/// ```
/// use molkey::PerceptionOptions;
///
/// let options: PerceptionOptions = serde_json::from_str(r#"{"kekulize_decoded": false}"#).unwrap();
/// assert!(options.ring_mode.aromaticity);
/// assert!(!options.kekulize_decoded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionOptions {
    /// Ring perception used for ranking and for emitting delocalized bonds.
    pub ring_mode: RingMode,
    /// Resolve delocalized bonds of decoded molecules into a Kekulé
    /// structure.
    pub kekulize_decoded: bool,
}

impl Default for PerceptionOptions {
    fn default() -> Self {
        Self {
            ring_mode: RingMode::default().with_aromaticity(true),
            kekulize_decoded: true,
        }
    }
}

impl PerceptionOptions {
    pub fn with_ring_mode(mut self, ring_mode: RingMode) -> Self {
        self.ring_mode = ring_mode;
        self
    }

    pub fn with_kekulize_decoded(mut self, kekulize_decoded: bool) -> Self {
        self.kekulize_decoded = kekulize_decoded;
        self
    }
}
