//! Embedded assets and the loaders for the resume and the atlas.

use eframe::egui;
use folio::{Atlas, Resume, ResumeError};
use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use thiserror::Error;

/// Embeds everything under assets/. Debug builds read from disk instead.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

const RESUME_ASSET: &str = "resume.ron";
const ATLAS_ASSET: &str = "atlas.ron";

#[derive(Error, Debug)]
pub enum ResumeLoadError {
    #[error("{0} not found in embedded assets")]
    NotFound(String),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported resume format {0:?}, expected .ron or .json")]
    UnsupportedFormat(PathBuf),
    #[error("invalid UTF-8 in resume: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to parse resume: {0}")]
    Ron(#[from] ron::de::SpannedError),
    #[error("failed to parse resume: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid resume: {0}")]
    Invalid(#[from] ResumeError),
}

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("atlas.ron not found in embedded assets")]
    NotFound,
    #[error("invalid UTF-8 in atlas.ron: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to parse atlas.ron: {0}")]
    ParseError(#[from] ron::de::SpannedError),
}

/// Result of the startup load, sent back from the loader thread.
pub struct LoadedContent {
    pub resume: Result<Resume, ResumeLoadError>,
    pub atlas: Result<Arc<Atlas>, AtlasError>,
}

/// Startup content being read in the background.
pub enum ContentLoadState {
    Loading(mpsc::Receiver<LoadedContent>),
    Ready,
}

/// Reads the resume and the atlas on a background thread.
pub fn spawn_content_loader(ctx: &egui::Context, resume_path: Option<PathBuf>) -> ContentLoadState {
    let (tx, rx) = mpsc::channel();
    let ctx = ctx.clone();

    std::thread::spawn(move || {
        let content = LoadedContent {
            resume: match &resume_path {
                Some(path) => load_resume_file(path),
                None => load_embedded_resume(),
            },
            atlas: load_atlas().map(Arc::new),
        };
        let _ = tx.send(content);
        ctx.request_repaint();
    });

    ContentLoadState::Loading(rx)
}

pub fn load_embedded_resume() -> Result<Resume, ResumeLoadError> {
    let file =
        Assets::get(RESUME_ASSET).ok_or_else(|| ResumeLoadError::NotFound(RESUME_ASSET.into()))?;
    parse_resume_ron(std::str::from_utf8(&file.data)?)
}

/// Loads a resume from disk, picking the format from the file extension.
pub fn load_resume_file(path: &Path) -> Result<Resume, ResumeLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ResumeLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => parse_resume_ron(&text),
        Some("json") => parse_resume_json(&text),
        _ => Err(ResumeLoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn parse_resume_ron(text: &str) -> Result<Resume, ResumeLoadError> {
    let resume: Resume = ron::from_str(text)?;
    resume.validate()?;
    Ok(resume)
}

fn parse_resume_json(text: &str) -> Result<Resume, ResumeLoadError> {
    let resume: Resume = serde_json::from_str(text)?;
    resume.validate()?;
    Ok(resume)
}

pub fn load_atlas() -> Result<Atlas, AtlasError> {
    let file = Assets::get(ATLAS_ASSET).ok_or(AtlasError::NotFound)?;
    let ron_string = std::str::from_utf8(&file.data)?;
    Ok(ron::from_str(ron_string)?)
}

/// URI an embedded image is registered under with egui's loaders.
pub fn image_uri(path: &str) -> String {
    format!("bytes://{path}")
}

/// Hands the job logos and city pictures to egui's image loaders.
pub fn register_images(ctx: &egui::Context, resume: &Resume) {
    let paths = resume
        .jobs
        .iter()
        .flat_map(|job| [&job.logo_asset, &job.city_image_asset])
        .filter(|path| !path.is_empty());

    for path in paths {
        match Assets::get(path) {
            Some(file) => ctx.include_bytes(image_uri(path), file.data.into_owned()),
            None => log::warn!("Image asset not found: {path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_resume_is_valid() {
        let resume = load_embedded_resume().expect("bundled resume should load");
        assert!(!resume.jobs.is_empty());
        for job in &resume.jobs {
            assert!(Assets::get(&job.logo_asset).is_some(), "{}", job.logo_asset);
            assert!(
                Assets::get(&job.city_image_asset).is_some(),
                "{}",
                job.city_image_asset
            );
        }
    }

    #[test]
    fn test_embedded_atlas_has_geometry() {
        let atlas = load_atlas().expect("bundled atlas should load");
        assert!(!atlas.land.is_empty());
        assert!(!atlas.places.is_empty());
        assert!(!atlas.roads.is_empty());
    }

    #[test]
    fn test_embedded_projects_link_to_their_sites() {
        let resume = load_embedded_resume().expect("bundled resume should load");
        assert!(!resume.projects.is_empty());
        for project in &resume.projects {
            assert!(project.link.starts_with("https://"), "{}", project.link);
        }
    }

    #[test]
    fn test_json_resume_is_validated() {
        let err = parse_resume_json(r#"{"owner":{"name":"","headline":""},"origin":{"lat":0.0,"lng":0.0},"jobs":[]}"#)
            .unwrap_err();
        assert!(matches!(err, ResumeLoadError::Invalid(ResumeError::NoJobs)));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = std::env::temp_dir().join("folio-resume-test.yaml");
        std::fs::write(&dir, "jobs: []").expect("temp file");
        let err = load_resume_file(&dir).unwrap_err();
        assert!(matches!(err, ResumeLoadError::UnsupportedFormat(_)));
        let _ = std::fs::remove_file(&dir);
    }
}
