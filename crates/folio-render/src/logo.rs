//! # Logo Resolution
//!
//! Finds and decodes the optional logo. Any failure simply means "no logo":
//! the rest of the document never depends on it.
//!
//! ```text
//! footer.logoUrl = "/uploads/brand.png"
//!        │
//!        ▼
//! uploads_dir/brand.png ── must stay inside uploads_dir after canonicalising
//!        │ missing / undecodable
//!        ▼
//! fallback_logo ── missing / undecodable ──▶ None
//! ```

use printpdf::image_crate::{self, DynamicImage};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const UPLOADS_PREFIX: &str = "/uploads/";

/// A decoded logo ready for embedding.
#[derive(Debug, Clone)]
pub struct Logo {
    pub image: DynamicImage,
    pub width_px: u32,
    pub height_px: u32,
}

/// Maps a `/uploads/...` URL onto a file inside `uploads_dir`.
///
/// Returns `None` for other URLs, for paths that climb out of the directory
/// (`..`, absolute segments, symlinks pointing elsewhere) and for files that
/// do not exist.
pub fn resolve_upload(logo_url: &str, uploads_dir: &Path) -> Option<PathBuf> {
    let relative = Path::new(logo_url.trim().strip_prefix(UPLOADS_PREFIX)?);
    if relative.as_os_str().is_empty()
        || relative.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let root = uploads_dir.canonicalize().ok()?;
    let resolved = root.join(relative).canonicalize().ok()?;
    resolved.starts_with(&root).then_some(resolved)
}

/// Resolves and decodes the logo, trying the uploaded file first.
pub fn load_logo(
    logo_url: Option<&str>,
    uploads_dir: Option<&Path>,
    fallback: Option<&Path>,
) -> Option<Logo> {
    let uploaded = logo_url
        .zip(uploads_dir)
        .and_then(|(url, dir)| resolve_upload(url, dir));

    uploaded
        .as_deref()
        .into_iter()
        .chain(fallback)
        .find_map(decode_file)
}

fn decode_file(path: &Path) -> Option<Logo> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Logo not readable");
            return None;
        }
    };

    match image_crate::load_from_memory(&bytes) {
        Ok(image) => {
            let rgb = image.to_rgb8();
            let (width_px, height_px) = rgb.dimensions();
            Some(Logo {
                image: DynamicImage::ImageRgb8(rgb),
                width_px,
                height_px,
            })
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Logo could not be decoded, omitting");
            None
        }
    }
}
