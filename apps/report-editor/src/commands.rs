//! Subcommand implementations
//!
//! Each command reads its inputs from disk, runs the library and returns what
//! should go to stdout. Logging goes through `tracing` to stderr.

use crate::config::TemplateConfig;
use anyhow::Context;
use overlay_core::{
    compose, locate, locate_fields, merge_pdf, parse_words, EditContext, ImageAsset, ImageFill,
    ImageSlot, PositionMatch, RegenerateResult, SourceDocument, Word,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RegenerateArgs {
    pub source: PathBuf,
    pub words: PathBuf,
    pub template: PathBuf,
    pub image: Option<PathBuf>,
    pub set: Vec<(String, String)>,
    pub out: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug)]
pub struct RegenerateReport {
    pub result: RegenerateResult,
    /// Path the PDF was written to, if any
    pub written: Option<PathBuf>,
}

fn read_bytes(path: &Path, what: &str) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}: {}", what, path.display()))
}

fn read_words(path: &Path) -> anyhow::Result<Vec<Word>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read words file: {}", path.display()))?;
    parse_words(&json).with_context(|| format!("Invalid words file: {}", path.display()))
}

fn write_pdf(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote PDF");
    Ok(())
}

/// Fill the template into the source report.
///
/// With `--json` and no `--out`, the PDF travels only inside the result
/// envelope. Pipeline failures become a failed envelope in JSON mode.
pub fn regenerate(args: &RegenerateArgs) -> anyhow::Result<RegenerateReport> {
    let config = TemplateConfig::from_file(&args.template)?;
    let source = read_bytes(&args.source, "source PDF")?;
    let words = read_words(&args.words)?;

    let name = args
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let outcome = EditContext::load(&name, &source, config.field_map()?).and_then(|mut ctx| {
        for (field, value) in &args.set {
            ctx.set_field(field, value.as_str())?;
        }
        if let Some(path) = &args.image {
            match fs::read(path) {
                Ok(bytes) => ctx.set_image(bytes),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot read image, skipping"),
            }
        }
        let filename = args
            .out
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.output.filename.clone());
        ctx.set_output_name(filename);
        ctx.regenerate(&words, &config.overlay)
    });

    let document = match outcome {
        Ok(document) => document,
        Err(e) if args.json => {
            tracing::error!(error = %e, "regeneration failed");
            return Ok(RegenerateReport {
                result: RegenerateResult::failure(&e),
                written: None,
            });
        }
        Err(e) => return Err(e).context("Regeneration failed"),
    };

    for label in &document.missing_labels {
        tracing::warn!(label = %label, "label not found in word stream");
    }

    let target = match (&args.out, args.json) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => Some(PathBuf::from(&document.filename)),
        (None, true) => None,
    };
    if let Some(path) = &target {
        write_pdf(path, &document.bytes)?;
    }

    Ok(RegenerateReport {
        result: RegenerateResult::success(&document),
        written: target,
    })
}

#[derive(Debug, Serialize)]
pub struct LabelMatches {
    pub label: String,
    pub matches: Vec<PositionMatch>,
}

/// Positions of each label, in argument order
pub fn locate_labels(words: &Path, labels: &[String]) -> anyhow::Result<Vec<LabelMatches>> {
    let words = read_words(words)?;
    Ok(labels
        .iter()
        .map(|label| LabelMatches {
            label: label.clone(),
            matches: locate(&words, label),
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct OverlayArgs {
    pub source: PathBuf,
    pub words: PathBuf,
    pub template: PathBuf,
    pub image: Option<PathBuf>,
    pub out: PathBuf,
}

/// Write the standalone overlay for previewing. Returns its page count.
pub fn overlay(args: &OverlayArgs) -> anyhow::Result<u32> {
    let config = TemplateConfig::from_file(&args.template)?;
    let source = SourceDocument::load(&read_bytes(&args.source, "source PDF")?)?;
    let words = read_words(&args.words)?;
    let template = config.field_map()?;

    let fills = locate_fields(&words, &template);
    let image = match (&args.image, template.image_slot()) {
        (Some(path), Some(slot)) => image_fill(path, slot, &words)
            .map_err(|e| tracing::warn!(error = %format!("{:#}", e), "skipping image overlay"))
            .ok(),
        (Some(_), None) => {
            tracing::warn!("image supplied but template has no image slot, skipping");
            None
        }
        (None, _) => None,
    };

    let overlay = compose(&fills, source.page_sizes(), image, &config.overlay);
    if overlay.page_count() == 0 {
        anyhow::bail!("No labels matched; overlay would be empty");
    }
    write_pdf(&args.out, &overlay.to_pdf()?)?;
    Ok(overlay.page_count())
}

fn image_fill(path: &Path, slot: &ImageSlot, words: &[Word]) -> anyhow::Result<ImageFill> {
    let bytes = read_bytes(path, "image")?;
    let (w, h) = slot.pixel_size();
    let asset = ImageAsset::decode(&bytes, w, h)?;
    Ok(ImageFill {
        asset,
        width: slot.width,
        height: slot.height,
        matches: locate(words, &slot.label),
    })
}

/// Stamp every page of `overlay` onto the matching page of `source`
pub fn stamp(source: &Path, overlay: &Path, out: &Path) -> anyhow::Result<()> {
    let original = read_bytes(source, "source PDF")?;
    let overlay = read_bytes(overlay, "overlay PDF")?;
    let merged = merge_pdf(&original, &overlay).context("Failed to merge overlay")?;
    write_pdf(out, &merged)
}
