//! Command handlers

use std::{fmt::Write as _, path::Path};

use anyhow::{Context, bail};
use application::{ConnectivityPort, DRAFT_KEY_PREFIX, DrainReport, NEW_DRAFT_SUFFIX};
use domain::{ArticleId, Draft, QueuedSave, StoredDraft};

use crate::app::App;

/// Longest body excerpt printed by `draft show`
const PREVIEW_CHARS: usize = 280;

fn identity_from_args(id: Option<u64>, slug: Option<String>) -> anyhow::Result<Option<ArticleId>> {
    match (id, slug) {
        (None, None) => Ok(None),
        (None, Some(_)) => bail!("--slug requires --id"),
        (Some(id), None) => Ok(Some(ArticleId::new(id)?)),
        (Some(id), Some(slug)) => Ok(Some(ArticleId::with_slug(id, slug)?)),
    }
}

fn describe_target(identity: Option<&ArticleId>) -> String {
    identity.map_or_else(|| "new post".to_string(), |id| format!("post #{id}"))
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

fn format_queue_entry(position: usize, entry: &QueuedSave) -> String {
    format!(
        "{position:>3}. {}  {:<12} \"{}\"",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        describe_target(entry.identity.as_ref()),
        entry.draft.title
    )
}

fn format_drain_report(report: &DrainReport) -> String {
    let mut line = format!(
        "replayed {}, superseded {}, remaining {}",
        report.replayed, report.superseded, report.remaining
    );
    if let Some(error) = &report.error {
        let _ = write!(line, " (stopped: {error})");
    }
    line
}

fn print_stored_draft(identity: Option<&ArticleId>, stored: &StoredDraft) {
    println!("📝 Draft for {}", describe_target(identity));
    println!("   Saved:  {}", stored.saved_at.format("%Y-%m-%d %H:%M:%S"));
    println!("   Title:  {}", stored.draft.title);
    if let Some(excerpt) = &stored.draft.excerpt {
        println!("   Excerpt: {excerpt}");
    }
    if !stored.draft.tag_ids.is_empty() {
        println!("   Tags:   {:?}", stored.draft.tag_ids);
    }
    println!("\n{}", preview(&stored.draft.body));
}

pub(crate) async fn status(app: &App) -> anyhow::Result<()> {
    let drafts = app.store.keys_with_prefix(DRAFT_KEY_PREFIX).await?;
    let queued = app.session.context().queue.len().await;

    println!("📊 Inkwell status");
    println!("   Storage:  {}", app.config.storage.path.display());
    println!("   Backend:  {}", app.config.api.base_url);
    match app.backend_reachable().await {
        Some(true) => println!("   Network:  ✅ online"),
        Some(false) => println!("   Network:  ❌ offline"),
        None => println!("   Network:  ⏭️  probe disabled"),
    }
    println!("   Drafts:   {}", drafts.len());
    println!("   Queued:   {queued}");
    Ok(())
}

pub(crate) async fn draft_list(app: &App) -> anyhow::Result<()> {
    let keys = app.store.keys_with_prefix(DRAFT_KEY_PREFIX).await?;
    if keys.is_empty() {
        println!("📭 No local drafts");
        return Ok(());
    }

    println!("📝 Local drafts:");
    for key in keys {
        let suffix = key.trim_start_matches(DRAFT_KEY_PREFIX);
        let identity = if suffix == NEW_DRAFT_SUFFIX {
            None
        } else {
            match suffix.parse::<ArticleId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    println!("   ⚠️  {key} (unrecognized key)");
                    continue;
                },
            }
        };

        match app.session.recovery_offer(identity.as_ref()).await {
            Some(stored) => println!(
                "   {:<12} {}  \"{}\"",
                describe_target(identity.as_ref()),
                stored.saved_at.format("%Y-%m-%d %H:%M:%S"),
                stored.draft.title
            ),
            None => println!("   ⚠️  {key} (unreadable)"),
        }
    }
    Ok(())
}

pub(crate) async fn draft_show(app: &App, id: Option<u64>) -> anyhow::Result<()> {
    let identity = identity_from_args(id, None)?;
    match app.session.recovery_offer(identity.as_ref()).await {
        Some(stored) => print_stored_draft(identity.as_ref(), &stored),
        None => println!("📭 No local draft for {}", describe_target(identity.as_ref())),
    }
    Ok(())
}

pub(crate) async fn draft_discard(app: &App, id: Option<u64>) -> anyhow::Result<()> {
    let identity = identity_from_args(id, None)?;
    if !app.session.has_unsaved_draft(identity.as_ref()).await {
        println!("📭 No local draft for {}", describe_target(identity.as_ref()));
        return Ok(());
    }
    app.session.discard(identity.as_ref()).await;
    println!("🗑️  Discarded local draft for {}", describe_target(identity.as_ref()));
    Ok(())
}

pub(crate) async fn queue_list(app: &App) {
    let entries = app.session.context().queue.drain().await;
    if entries.is_empty() {
        println!("📭 Offline queue is empty");
        return;
    }

    println!("📦 Offline queue ({} entries, oldest first):", entries.len());
    for (index, entry) in entries.iter().enumerate() {
        println!("{}", format_queue_entry(index + 1, entry));
    }
}

pub(crate) async fn queue_flush(app: &App) -> anyhow::Result<()> {
    let queued = app.session.context().queue.len().await;
    if queued == 0 {
        println!("📭 Offline queue is empty");
        return Ok(());
    }

    let connected = app.connect(None).await?;
    if !connected.monitor.is_online() {
        bail!("Backend unreachable, {queued} queued saves kept");
    }

    println!("🔄 Replaying {queued} queued saves...");
    let report = connected.manager.flush_queue().await?;
    println!("   {}", format_drain_report(&report));

    match &report.error {
        Some(_) => bail!("Replay stopped early"),
        None => {
            println!("✅ Offline queue flushed");
            Ok(())
        },
    }
}

pub(crate) async fn queue_clear(app: &App) {
    let queue = &app.session.context().queue;
    let count = queue.len().await;
    queue.clear().await;
    println!("🗑️  Dropped {count} queued saves");
}

pub(crate) async fn save(
    app: &App,
    title: String,
    body_file: &Path,
    id: Option<u64>,
    slug: Option<String>,
) -> anyhow::Result<()> {
    let identity = identity_from_args(id, slug)?;
    let body = tokio::fs::read_to_string(body_file)
        .await
        .with_context(|| format!("Failed to read {}", body_file.display()))?;

    let connected = app.connect(identity.clone()).await?;
    println!("💾 Saving {}...", describe_target(identity.as_ref()));

    match connected.manager.manual_save(Draft::new(title, body)).await {
        Ok(receipt) => {
            println!(
                "✅ Saved as post #{} ({}) at {}",
                receipt.identity,
                receipt.identity.path_segment(),
                receipt.updated_at.format("%Y-%m-%d %H:%M:%S")
            );
            Ok(())
        },
        Err(e) => {
            let queued = connected.manager.offline_queue_len().await;
            println!("📦 Kept in offline queue ({queued} entries)");
            Err(e.into())
        },
    }
}
