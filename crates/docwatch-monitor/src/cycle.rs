//! One full check cycle: fetch → extract → fallback → normalize →
//! translate → compare → persist → notify.
//!
//! Cycles are independent; the only state crossing cycle boundaries is the
//! baseline owned by [`crate::baseline`]. Only a primary-page parse failure
//! aborts a cycle early (the baseline keeps its last good content);
//! everything else degrades to a best-effort result that still reaches the
//! change detector.

use std::path::Path;

use docwatch_core::StatusVocabulary;
use docwatch_extract::{
    extract, render_canonical, ExtractOptions, ExtractionKind, ExtractionResult,
};

use crate::baseline::{detect_change, BaselineStore};
use crate::error::MonitorError;
use crate::notify::Notifier;
use crate::sources::{FallbackFetcher, PageSource};
use crate::translate::Translator;

/// The collaborators one cycle talks to.
pub struct CycleDeps<'a> {
    pub source: &'a dyn PageSource,
    pub fallback: Option<&'a dyn FallbackFetcher>,
    pub translator: &'a dyn Translator,
    pub notifier: &'a dyn Notifier,
    pub baseline: &'a dyn BaselineStore,
}

/// Per-cycle parameters.
pub struct CycleSettings<'a> {
    pub record_code: &'a str,
    pub extract_opts: ExtractOptions,
    /// Where to dump the raw page when extraction comes up empty. The only
    /// path on which the cycle writes anything besides the baseline.
    pub page_dump_dir: Option<&'a Path>,
}

/// What a completed cycle hands to the caller (and the notifier).
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// The final, human-readable canonical status.
    pub status: String,
    pub changed: bool,
    /// Confidence tier of the extraction that produced `status`.
    pub kind: ExtractionKind,
}

/// Runs one check cycle to completion.
///
/// # Errors
///
/// Returns [`MonitorError::Extract`] when the primary page is not parseable
/// text (the cycle ends without touching the baseline) and
/// [`MonitorError::Baseline`] when the baseline cannot be read or written.
/// Fetch, fallback, translation, and notification failures are absorbed.
pub async fn run_check_cycle(
    deps: &CycleDeps<'_>,
    settings: &CycleSettings<'_>,
    vocab: &StatusVocabulary,
) -> Result<CycleOutcome, MonitorError> {
    let primary_page = match deps.source.fetch_page(settings.record_code).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "primary fetch failed; treating page as unavailable");
            None
        }
    };

    let mut result = match &primary_page {
        Some(bytes) => extract(bytes, vocab, settings.extract_opts)?,
        None => ExtractionResult::unavailable(),
    };
    tracing::info!(kind = %result.kind, "primary extraction finished");

    if should_try_fallback(&result, vocab) {
        if let Some(fallback) = deps.fallback {
            result = try_fallback(fallback, settings, vocab, result).await;
        } else {
            tracing::debug!("fallback indicated but no fallback fetcher configured");
        }
    }

    if result.kind == ExtractionKind::Unavailable {
        if let (Some(dir), Some(bytes)) = (settings.page_dump_dir, primary_page.as_ref()) {
            dump_page(dir, bytes);
        }
    }

    let canonical = render_canonical(&result);

    let translated = match deps.translator.translate(&canonical).await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "translation failed; using source-language text");
            canonical
        }
    };

    let changed = detect_change(deps.baseline, &translated)?;

    if let Err(e) = deps.notifier.notify(&translated, changed).await {
        tracing::warn!(error = %e, "notification failed");
    }

    Ok(CycleOutcome {
        status: translated,
        changed,
        kind: result.kind,
    })
}

/// The fallback fires when the primary result is Unavailable, or is
/// Unstructured text that matches a configured "temporarily unavailable /
/// blocked" phrase.
fn should_try_fallback(result: &ExtractionResult, vocab: &StatusVocabulary) -> bool {
    match result.kind {
        ExtractionKind::Unavailable => true,
        ExtractionKind::Unstructured => vocab.matches_unavailable(&result.raw_text),
        ExtractionKind::Structured => false,
    }
}

/// The fallback result replaces the primary only when it is usable and at
/// least as confident; otherwise the primary stands.
fn accept_fallback(primary: &ExtractionResult, secondary: &ExtractionResult) -> bool {
    secondary.kind != ExtractionKind::Unavailable
        && secondary.kind.confidence() >= primary.kind.confidence()
}

/// One fallback attempt. All failure modes keep the primary result.
async fn try_fallback(
    fallback: &dyn FallbackFetcher,
    settings: &CycleSettings<'_>,
    vocab: &StatusVocabulary,
    primary: ExtractionResult,
) -> ExtractionResult {
    tracing::info!("primary result unusable; trying direct status endpoint");
    match fallback.fetch_direct(settings.record_code).await {
        Ok(bytes) => match extract(&bytes, vocab, settings.extract_opts) {
            Ok(secondary) if accept_fallback(&primary, &secondary) => {
                tracing::info!(kind = %secondary.kind, "fallback result adopted");
                secondary
            }
            Ok(secondary) => {
                tracing::debug!(kind = %secondary.kind, "fallback no better; keeping primary");
                primary
            }
            Err(e) => {
                tracing::warn!(error = %e, "fallback body unparseable; keeping primary");
                primary
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "fallback fetch failed; keeping primary");
            primary
        }
    }
}

/// Persists the raw page for offline diagnosis. Best-effort; a failed dump
/// only logs.
fn dump_page(dir: &Path, bytes: &[u8]) {
    let filename = format!("page_{}.html", chrono::Utc::now().format("%Y%m%d_%H%M%S%f"));
    let path = dir.join(filename);
    let write = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, bytes));
    match write {
        Ok(()) => tracing::info!(path = %path.display(), "saved page for offline diagnosis"),
        Err(e) => tracing::warn!(error = %e, "failed to save page dump"),
    }
}
