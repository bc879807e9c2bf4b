//! Classification of raw molecule identifiers.

use std::fmt;
use std::path::Path;

use crate::geometry::Geometry;
use crate::store::StoreFormat;

/// Extensions recognised as precomputed Hamiltonian files.
pub const HAMILTONIAN_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// What a raw molecule identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// A known canonical molecule label.
    Name,
    /// A literal atomic geometry.
    Geometry,
    /// A path to an integral store.
    Store,
    /// A path to a precomputed Hamiltonian file.
    Hamiltonian,
    /// Nothing recognisable.
    Error,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdentifierKind::Name => "name",
            IdentifierKind::Geometry => "geometry",
            IdentifierKind::Store => "h5",
            IdentifierKind::Hamiltonian => "hamiltonian",
            IdentifierKind::Error => "error",
        };
        f.write_str(s)
    }
}

fn looks_like_path(raw: &str) -> bool {
    let path = Path::new(raw);
    raw.contains('/') || raw.contains('\\') || (path.extension().is_some() && path.is_file())
}

fn extension_of(raw: &str) -> Option<String> {
    Path::new(raw)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Classify `raw`.
///
/// Paths are recognised first (by extension, separator or an existing file),
/// then names accepted by `is_known_name`, then geometry literals.
pub fn classify(raw: &str, is_known_name: impl Fn(&str) -> bool) -> IdentifierKind {
    let raw = raw.trim();
    if raw.is_empty() {
        return IdentifierKind::Error;
    }

    let ext = extension_of(raw);
    let ext = ext.as_deref();
    if ext.is_some_and(|e| StoreFormat::EXTENSIONS.contains(&e)) {
        return IdentifierKind::Store;
    }
    if ext.is_some_and(|e| HAMILTONIAN_EXTENSIONS.contains(&e)) {
        return IdentifierKind::Hamiltonian;
    }
    if looks_like_path(raw) {
        return IdentifierKind::Error;
    }

    if is_known_name(raw) {
        return IdentifierKind::Name;
    }
    if Geometry::parse(raw).is_ok() {
        return IdentifierKind::Geometry;
    }
    IdentifierKind::Error
}
