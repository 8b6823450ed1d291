//! Color result types and named-color lookup.
//!
//! - [`ColorEntry`]: one dominant color with its pixel share and hex code
//! - [`ColorNameTable`]: nearest-neighbour lookup of human-readable names
//! - [`FamilyNormalizer`]: pluggable merging of shade variants into families

mod entry;
mod names;

pub(crate) use entry::quantize_channel;
pub use entry::{to_hex, ColorEntry};
pub use names::{ColorNameTable, ExactName, FamilyNormalizer, NamedColor, ShadeModifierStripper};
