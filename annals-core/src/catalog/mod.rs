//! Era catalog - the fixed gallery of historical periods
//!
//! The catalog is compiled into the binary and never changes while the
//! process runs. It is the only source of eras the front-end can select.

mod eras;

use serde::Serialize;

pub use eras::BUILTIN_ERAS;

/// One historical period shown as a card in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Era {
    /// Stable identifier, unique within the catalog
    pub id: &'static str,
    /// Display name (e.g. "Tang Dynasty")
    pub name: &'static str,
    /// Name in the display language (e.g. "唐朝")
    pub localized_name: &'static str,
    /// Human-readable date range
    pub period: &'static str,
    /// Short description for the gallery card
    pub summary: &'static str,
    /// External image; may be unreachable, callers render a placeholder
    pub image_url: &'static str,
}

/// Read-only view over an ordered list of eras
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    eras: &'static [Era],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in gallery, in chronological order
    pub fn builtin() -> Self {
        Self { eras: BUILTIN_ERAS }
    }

    /// All eras in gallery order
    pub fn list(&self) -> &'static [Era] {
        self.eras
    }

    /// Look up an era by its identifier
    pub fn get(&self, id: &str) -> Option<&'static Era> {
        self.eras.iter().find(|era| era.id == id)
    }

    pub fn len(&self) -> usize {
        self.eras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}
