//! # Dialog Example
//!
//! A confirmation dialog opened from a button:
//! - Tab / Shift+Tab cycle inside the dialog while it is open
//! - Escape or "Cancel" closes it and focus returns to the button
//! - A background task opens the dialog through an `OpenRequester` after a
//!   few seconds, and another logs every `OverlayNotice`
//!
//! The dialog fades in over a short transition; focus is moved again once
//! it ends. Debug logging goes to `drape-dialog.log`.
//!
//! Run with: `cargo run --example dialog`

use drape::ratatui::layout::Rect;
use drape::widgets::{dialog, Dialog, OpenRequest};
use drape::{Document, Element, Page, Stylesheet, Tag, VisibilityRule};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("drape-dialog.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {} {}", record.level(), record.target(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}

fn build_document() -> Document {
    let sheet = Stylesheet::new().with_rule(
        VisibilityRule::new(dialog::CONTAINER_CLASS, dialog::VISIBLE_CLASS)
            .with_transition(Duration::from_millis(250)),
    );
    let mut doc = Document::with_stylesheet(sheet);
    let body = doc.body();

    doc.append(
        body,
        Element::new(Tag::Heading)
            .with_text("Files")
            .with_layout(Rect::new(2, 1, 40, 1)),
    );
    doc.append(
        body,
        Element::new(Tag::Paragraph)
            .with_text("Tab to move, Enter to press, Ctrl+C to quit.")
            .with_layout(Rect::new(2, 2, 60, 1)),
    );
    doc.append(
        body,
        Element::new(Tag::Button)
            .with_text("Rename")
            .with_layout(Rect::new(2, 4, 12, 1)),
    );
    doc.append(
        body,
        Element::new(Tag::Button)
            .with_attr("aria-controls", "confirm-delete")
            .with_text("Delete")
            .with_layout(Rect::new(16, 4, 12, 1)),
    );

    let confirm = doc.append(
        body,
        Element::new(Tag::Div)
            .with_id("confirm-delete")
            .with_class(dialog::CONTAINER_CLASS)
            .with_attr("aria-label", "Delete notes.txt?")
            .with_layout(Rect::new(8, 7, 44, 9)),
    );
    doc.append(
        confirm,
        Element::new(Tag::Paragraph)
            .with_text("This cannot be undone.")
            .with_layout(Rect::new(10, 9, 40, 1)),
    );
    doc.append(
        confirm,
        Element::new(Tag::Input)
            .with_attr("type", "checkbox")
            .with_text("[x] also delete backups")
            .with_layout(Rect::new(10, 11, 30, 1)),
    );
    doc.append(
        confirm,
        Element::new(Tag::Button)
            .with_class(dialog::CLOSE_CLASS)
            .with_text("Cancel")
            .with_layout(Rect::new(10, 13, 14, 1)),
    );
    doc.append(
        confirm,
        Element::new(Tag::Button)
            .with_class(dialog::CLOSE_CLASS)
            .with_text("Delete")
            .with_layout(Rect::new(36, 13, 14, 1)),
    );
    doc
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging()?;

    let mut page = Page::new(build_document());
    let mut dialog = Dialog::attach(page.document_mut(), "confirm-delete")?;

    let mut notices = dialog.subscribe();
    tokio::spawn(async move {
        while let Some(notice) = notices.next().await {
            log::info!("dialog notice: {notice:?}");
        }
    });

    let requester = dialog.requester();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        if let Err(err) = requester.send(OpenRequest::default()) {
            log::warn!("could not open dialog: {err}");
        }
    });

    page.add(dialog);
    drape::run(page).await?;
    Ok(())
}
