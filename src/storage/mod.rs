//! Raster export/import and the re-editable document container.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::{CanvasError, CanvasModel, Drawable, DrawableCounters};

const DOCUMENT_MAGIC: &[u8; 5] = b"EASEL";
const DOCUMENT_VERSION: u8 = 1;
const HEADER_LEN: usize = DOCUMENT_MAGIC.len() + 1 + 4;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("document manifest error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// On-disk representations a canvas can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Png,
    Jpg,
    Gif,
    /// Baseline raster plus the drawable history, reopenable for editing.
    Document,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "gif" => Some(Self::Gif),
            "easel" => Some(Self::Document),
            _ => None,
        }
    }

    /// Format implied by the file extension; PNG when there is none or it
    /// is not recognised.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(Self::Png)
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
            Self::Document => "easel",
        }
    }

    const fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::Png => Some(ImageFormat::Png),
            Self::Jpg => Some(ImageFormat::Jpeg),
            Self::Gif => Some(ImageFormat::Gif),
            Self::Document => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentManifest {
    opaque_background: bool,
    #[serde(default)]
    counters: DrawableCounters,
    drawables: Vec<Drawable>,
}

/// Serialises the baseline and committed history of `model`.
pub fn encode_document(model: &CanvasModel) -> StorageResult<Vec<u8>> {
    let baseline = DynamicImage::ImageRgba8(model.baseline().clone());
    let baseline = encode_raster(&baseline, ImageFormat::Png)?;
    let baseline_len = u32::try_from(baseline.len()).map_err(|_| {
        StorageError::MalformedDocument("baseline raster exceeds 4 GiB".to_string())
    })?;
    let manifest = DocumentManifest {
        opaque_background: model.has_opaque_background(),
        counters: *model.counters(),
        drawables: model.history().to_vec(),
    };

    let mut bytes = Vec::with_capacity(HEADER_LEN + baseline.len());
    bytes.extend_from_slice(DOCUMENT_MAGIC);
    bytes.push(DOCUMENT_VERSION);
    bytes.extend_from_slice(&baseline_len.to_be_bytes());
    bytes.extend_from_slice(&baseline);
    serde_json::to_writer(&mut bytes, &manifest)?;
    Ok(bytes)
}

/// Rebuilds a model from container bytes, replaying its history over the
/// stored baseline.
pub fn decode_document(bytes: &[u8]) -> StorageResult<CanvasModel> {
    if bytes.len() < HEADER_LEN {
        return Err(malformed("truncated header"));
    }
    let (magic, rest) = bytes.split_at(DOCUMENT_MAGIC.len());
    if magic != DOCUMENT_MAGIC {
        return Err(malformed("missing EASEL signature"));
    }
    let (version, rest) = rest.split_at(1);
    if version[0] != DOCUMENT_VERSION {
        return Err(StorageError::MalformedDocument(format!(
            "unsupported version {}",
            version[0]
        )));
    }
    let (length, rest) = rest.split_at(4);
    let baseline_len = u32::from_be_bytes([length[0], length[1], length[2], length[3]]) as usize;
    if baseline_len > rest.len() {
        return Err(malformed("baseline length exceeds document size"));
    }
    let (baseline, manifest) = rest.split_at(baseline_len);

    let baseline = image::load_from_memory_with_format(baseline, ImageFormat::Png)
        .map_err(|err| StorageError::MalformedDocument(format!("baseline raster: {err}")))?
        .to_rgba8();
    let manifest: DocumentManifest = serde_json::from_slice(manifest)
        .map_err(|err| StorageError::MalformedDocument(format!("manifest: {err}")))?;

    tracing::debug!(
        width = baseline.width(),
        height = baseline.height(),
        drawables = manifest.drawables.len(),
        "document decoded"
    );
    CanvasModel::from_parts(
        baseline,
        manifest.drawables,
        manifest.counters,
        manifest.opaque_background,
    )
    .map_err(|err| match err {
        CanvasError::UncommittedDrawable { .. } => {
            StorageError::MalformedDocument(format!("manifest: {err}"))
        }
        other => StorageError::Canvas(other),
    })
}

/// Writes `model` in `format`, appending the format's extension to `path`
/// when it is missing. On success the model takes the file's name and is no
/// longer dirty.
pub fn save_document(
    model: &mut CanvasModel,
    path: &Path,
    format: DocumentFormat,
) -> StorageResult<PathBuf> {
    let target = path_with_extension(path, format);
    let bytes = match format.image_format() {
        Some(image_format) => {
            let mut raster = DynamicImage::ImageRgba8(model.pixels().clone());
            if image_format == ImageFormat::Jpeg {
                raster = DynamicImage::ImageRgb8(raster.to_rgb8());
            }
            encode_raster(&raster, image_format)?
        }
        None => encode_document(model)?,
    };

    if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, bytes)?;

    tracing::info!(path = %target.display(), ?format, "document saved");
    model.mark_saved(target.clone());
    Ok(target)
}

/// Saves using the format implied by the path.
pub fn save_as(model: &mut CanvasModel, path: &Path) -> StorageResult<PathBuf> {
    save_document(model, path, DocumentFormat::from_path(path))
}

/// Opens a document container or a plain raster. Rasters become the baseline
/// of a fresh, opaque canvas with empty history.
pub fn load_document(path: &Path) -> StorageResult<CanvasModel> {
    let bytes = fs::read(path)?;
    let mut model = match DocumentFormat::from_path(path) {
        DocumentFormat::Document => decode_document(&bytes)?,
        _ => CanvasModel::from_raster(image::load_from_memory(&bytes)?.to_rgba8())?,
    };
    tracing::info!(path = %path.display(), "document loaded");
    model.mark_loaded(path.to_path_buf());
    Ok(model)
}

fn encode_raster(raster: &DynamicImage, format: ImageFormat) -> StorageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

fn path_with_extension(path: &Path, format: DocumentFormat) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(DocumentFormat::from_extension)
        == Some(format);
    if has_extension {
        return path.to_path_buf();
    }
    let mut target = OsString::from(path.as_os_str());
    target.push(".");
    target.push(format.extension());
    PathBuf::from(target)
}

fn malformed(reason: &str) -> StorageError {
    StorageError::MalformedDocument(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::drawable::{FillRegionElement, LineElement, ShapeElement};
    use crate::editor::{recording_listener, DrawableKind, ModelChange, ShapeStyle};
    use crate::geometry::{Color, ToolBounds, ToolPoint};
    use crate::testing::with_temp_root;

    fn sketch() -> CanvasModel {
        let mut model = CanvasModel::new(24, 16, true).expect("canvas should build");
        model.finalize(Drawable::Rectangle(ShapeElement {
            bounds: ToolBounds::new(2, 2, 10, 8),
            style: ShapeStyle {
                border: Color::BLACK,
                fill: Color::BLACK,
                filled: false,
            },
            label: None,
        }));
        model.finalize(Drawable::FillRegion(FillRegionElement {
            seed: ToolPoint::new(5, 5),
            color: Color::new(0, 128, 255),
            label: None,
        }));
        model.finalize(Drawable::Line(LineElement {
            from: ToolPoint::new(0, 15),
            to: ToolPoint::new(23, 0),
            color: Color::new(255, 0, 0),
            label: None,
        }));
        model
    }

    #[test]
    fn format_follows_the_extension_and_defaults_to_png() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.PNG")), DocumentFormat::Png);
        assert_eq!(DocumentFormat::from_path(Path::new("a.jpeg")), DocumentFormat::Jpg);
        assert_eq!(DocumentFormat::from_path(Path::new("a.gif")), DocumentFormat::Gif);
        assert_eq!(DocumentFormat::from_path(Path::new("a.easel")), DocumentFormat::Document);
        assert_eq!(DocumentFormat::from_path(Path::new("a.bmp")), DocumentFormat::Png);
        assert_eq!(DocumentFormat::from_path(Path::new("a")), DocumentFormat::Png);
    }

    #[test]
    fn missing_extension_is_appended() {
        assert_eq!(
            path_with_extension(Path::new("/tmp/art"), DocumentFormat::Document),
            PathBuf::from("/tmp/art.easel")
        );
        assert_eq!(
            path_with_extension(Path::new("/tmp/art.png"), DocumentFormat::Jpg),
            PathBuf::from("/tmp/art.png.jpg")
        );
        assert_eq!(
            path_with_extension(Path::new("/tmp/art.JPEG"), DocumentFormat::Jpg),
            PathBuf::from("/tmp/art.JPEG")
        );
    }

    #[test]
    fn document_round_trip_keeps_history_and_pixels() {
        with_temp_root("storage-document", |root| {
            let mut model = sketch();
            let saved = save_document(&mut model, &root.join("sketch"), DocumentFormat::Document)
                .expect("document should save");
            assert_eq!(saved, root.join("sketch.easel"));

            let loaded = load_document(&saved).expect("document should load");

            assert_eq!(loaded.history(), model.history());
            assert_eq!(loaded.pixels(), model.pixels());
            assert_eq!(loaded.baseline(), model.baseline());
            assert_eq!(loaded.counters(), model.counters());
            assert_eq!(loaded.name(), "sketch.easel");
            assert!(!loaded.is_dirty());
            assert!(loaded.has_opaque_background());
        });
    }

    #[test]
    fn saving_renames_the_model_and_clears_dirty() {
        with_temp_root("storage-saved", |root| {
            let mut model = sketch();
            let seen = recording_listener(&mut model);
            assert!(model.is_dirty());

            let saved = save_as(&mut model, &root.join("nested/out.png")).expect("png should save");

            assert!(saved.exists());
            assert_eq!(model.name(), "out.png");
            assert_eq!(model.save_path(), Some(saved.as_path()));
            assert!(!model.is_dirty());
            assert_eq!(seen.borrow().as_slice(), &[ModelChange::Saved]);
        });
    }

    #[test]
    fn png_export_reloads_as_a_flat_baseline() {
        with_temp_root("storage-png", |root| {
            let mut model = sketch();
            let saved = save_as(&mut model, &root.join("flat.png")).expect("png should save");

            let loaded = load_document(&saved).expect("png should load");

            assert_eq!(loaded.pixels(), model.pixels());
            assert_eq!(loaded.baseline(), model.pixels());
            assert!(loaded.history().is_empty());
            assert!(loaded.has_opaque_background());
        });
    }

    #[test]
    fn jpeg_and_gif_exports_keep_dimensions() {
        with_temp_root("storage-lossy", |root| {
            let mut model = sketch();
            for name in ["photo.jpg", "anim.gif"] {
                let saved = save_as(&mut model, &root.join(name)).expect("raster should save");
                let loaded = load_document(&saved).expect("raster should load");
                assert_eq!(loaded.dimensions(), (24, 16));
            }
        });
    }

    #[test]
    fn malformed_containers_are_rejected() {
        let valid = encode_document(&sketch()).expect("document should encode");

        let mut wrong_magic = valid.clone();
        wrong_magic[0] = b'X';
        let mut wrong_version = valid.clone();
        wrong_version[5] = 9;
        let mut oversized = valid.clone();
        oversized[6..10].copy_from_slice(&u32::MAX.to_be_bytes());
        let mut bad_manifest = valid.clone();
        bad_manifest.truncate(valid.len() - 3);

        for bytes in [
            &valid[..4],
            &wrong_magic[..],
            &wrong_version[..],
            &oversized[..],
            &bad_manifest[..],
        ] {
            let err = decode_document(bytes).expect_err("malformed bytes must be rejected");
            assert!(
                matches!(err, StorageError::MalformedDocument(_)),
                "unexpected error: {err}"
            );
        }
    }

    /// Valid container bytes with the manifest replaced by `manifest`.
    fn container_with_manifest(manifest: serde_json::Value) -> Vec<u8> {
        let blank = CanvasModel::new(8, 8, true).expect("canvas should build");
        let mut bytes = encode_document(&blank).expect("document should encode");
        let baseline_len = u32::from_be_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
        bytes.truncate(HEADER_LEN + baseline_len);
        serde_json::to_writer(&mut bytes, &manifest).expect("manifest should serialize");
        bytes
    }

    #[test]
    fn manifests_holding_transient_drawables_are_rejected() {
        let nothing = serde_json::json!({
            "opaque_background": true,
            "drawables": [{"kind": "nothing"}],
        });
        let in_progress = serde_json::json!({
            "opaque_background": true,
            "drawables": [{
                "kind": "polygon_in_progress",
                "points": [{"x": 1, "y": 1}, {"x": 5, "y": 1}],
                "color": {"r": 0, "g": 0, "b": 0},
            }],
        });

        for manifest in [nothing, in_progress] {
            let err = decode_document(&container_with_manifest(manifest))
                .expect_err("transient history must be rejected");
            assert!(
                matches!(err, StorageError::MalformedDocument(_)),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn stale_counters_are_raised_past_stored_labels() {
        let manifest = serde_json::json!({
            "opaque_background": true,
            "counters": {
                "line": 1,
                "rectangle": 0,
                "oval": 0,
                "polygon": 0,
                "pencil": 0,
                "fill_region": 0,
            },
            "drawables": [
                {
                    "kind": "line",
                    "from": {"x": 0, "y": 0},
                    "to": {"x": 7, "y": 0},
                    "color": {"r": 0, "g": 0, "b": 0},
                    "label": {"kind": "line", "index": 4},
                },
                {
                    "kind": "line",
                    "from": {"x": 0, "y": 7},
                    "to": {"x": 7, "y": 7},
                    "color": {"r": 0, "g": 0, "b": 0},
                },
            ],
        });

        let mut model =
            decode_document(&container_with_manifest(manifest)).expect("document should load");

        assert_eq!(model.history()[0].name().as_deref(), Some("Line-4"));
        assert_eq!(model.history()[1].name().as_deref(), Some("Line-5"));
        assert_eq!(model.counters().peek(DrawableKind::Line), Some(6));

        model.finalize(Drawable::Line(LineElement {
            from: ToolPoint::new(0, 3),
            to: ToolPoint::new(7, 3),
            color: Color::BLACK,
            label: None,
        }));
        assert_eq!(model.history()[2].name().as_deref(), Some("Line-6"));
    }

    #[test]
    fn loading_a_missing_file_reports_io() {
        let err = load_document(Path::new("/nonexistent/easel/missing.easel"))
            .expect_err("missing file must fail");
        assert!(matches!(err, StorageError::Io(_)));
    }
}
