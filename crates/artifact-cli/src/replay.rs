//! Transcript replay
//!
//! Streams a recorded reply through [`ArtifactFeed`] in fixed-size chunks,
//! syncing an [`ArtifactPanel`] after every chunk like a live host would.

use anyhow::Context;
use artifact_stream::ArtifactFeed;
use artifact_view::{ArtifactPanel, HeadlessHost, PanelCommand, PanelSnapshot, ViewConfig};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// Replay parameters
#[derive(Debug, Clone)]
pub(crate) struct ReplayOptions {
    pub(crate) chunk_size: usize,
    pub(crate) back_steps: usize,
    pub(crate) config: ViewConfig,
}

/// Outcome of a replay
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReplayReport {
    pub(crate) chunks: usize,
    pub(crate) revisions: usize,
    pub(crate) skipped_blocks: usize,
    pub(crate) prose: String,
    pub(crate) panel: PanelSnapshot,
}

/// Feed `transcript` through the parser and the panel
pub(crate) fn replay(transcript: &str, options: &ReplayOptions) -> anyhow::Result<ReplayReport> {
    let mut feed = ArtifactFeed::new();
    let mut panel = ArtifactPanel::new(options.config.clone(), Arc::new(HeadlessHost::new()));
    let mut prose = String::new();
    let mut skipped_blocks = 0;
    let mut chunks = 0;

    for chunk in byte_chunks(transcript, options.chunk_size) {
        let update = feed
            .push(chunk)
            .with_context(|| format!("applying chunk {chunks}"))?;
        chunks += 1;
        prose.push_str(&update.prose);
        skipped_blocks += update.skipped;
        if update.touched_artifacts() {
            panel.sync(feed.snapshot());
        }
    }

    let update = feed.finish().context("finishing reply")?;
    prose.push_str(&update.prose);
    skipped_blocks += update.skipped;
    panel.sync(feed.snapshot());

    for _ in 0..options.back_steps {
        panel.dispatch(PanelCommand::Back)?;
    }

    tracing::info!(
        chunks,
        revisions = feed.collection().len(),
        skipped_blocks,
        "replay finished"
    );

    Ok(ReplayReport {
        chunks,
        revisions: feed.collection().len(),
        skipped_blocks,
        prose,
        panel: panel.snapshot(),
    })
}

/// Split into chunks of about `size` bytes without cutting a character
pub(crate) fn byte_chunks(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = start.saturating_add(size).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&text[start..end]);
        start = end;
    }
    chunks
}

/// Human-readable summary
pub(crate) fn render_text(report: &ReplayReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "chunks: {}  revisions: {}  skipped blocks: {}",
        report.chunks, report.revisions, report.skipped_blocks
    );

    let Some(shell) = &report.panel.shell else {
        out.push_str("no artifact open\n");
        return out;
    };

    let state = if shell.ready { "ready" } else { "streaming" };
    let _ = writeln!(
        out,
        "open: {} (#{}, {}, {})",
        shell.name, shell.index, shell.kind, state
    );
    let _ = writeln!(out, "mode: {}", shell.active_mode);
    if let Some(navigation) = &report.panel.navigation {
        let _ = writeln!(
            out,
            "{} (back: {}, forward: {})",
            navigation.label(),
            yes_no(navigation.can_go_back),
            yes_no(navigation.can_go_forward)
        );
    }
    let _ = writeln!(out, "digest: {}", shell.digest.short());
    if shell.files.is_empty() {
        out.push_str("files: none\n");
    } else {
        out.push_str("files:\n");
        for (path, content) in shell.files.iter() {
            let _ = writeln!(out, "  {path} ({} bytes)", content.len());
        }
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
