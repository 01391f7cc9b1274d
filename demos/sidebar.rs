//! # Sidebar Example
//!
//! A navigation sidebar that adapts to the terminal width:
//! - 90 columns or wider: the sidebar is pinned on the left
//! - narrower: it becomes a drawer opened with the "Menu" button, traps
//!   focus, and closes on Escape, "Close" or a click on its background
//!
//! Resize the terminal to switch layouts. Debug logging goes to
//! `drape-sidebar.log`.
//!
//! Run with: `cargo run --example sidebar`

use drape::ratatui::layout::Rect;
use drape::widgets::{sidebar, Sidebar, SidebarOptions};
use drape::{Document, Element, Page, ProgramOptions, Tag};
use std::fs;
use std::path::PathBuf;

const SECTIONS: [&str; 4] = ["Inbox", "Drafts", "Sent", "Archive"];

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("drape-sidebar.log");
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
    let mut doc = Document::new();
    let body = doc.body();

    doc.append(
        body,
        Element::new(Tag::Button)
            .with_attr("aria-controls", "main-nav")
            .with_text("Menu")
            .with_layout(Rect::new(0, 0, 10, 1)),
    );
    doc.append(
        body,
        Element::new(Tag::Heading)
            .with_text("Inbox (3 unread)")
            .with_layout(Rect::new(30, 1, 40, 1)),
    );
    doc.append(
        body,
        Element::new(Tag::Paragraph)
            .with_text("Resize the terminal to switch layouts. Ctrl+C quits.")
            .with_layout(Rect::new(30, 3, 60, 1)),
    );

    let nav = doc.append(
        body,
        Element::new(Tag::Nav)
            .with_id("main-nav")
            .with_attr(sidebar::STATIC_CLASS_ATTR, "sidebar--pinned")
            .with_attr("aria-label", "Mail")
            .with_layout(Rect::new(0, 1, 26, 12)),
    );
    for (row, section) in (2u16..).step_by(2).zip(SECTIONS) {
        doc.append(
            nav,
            Element::new(Tag::A)
                .with_attr("href", format!("#{}", section.to_lowercase()))
                .with_text(section)
                .with_layout(Rect::new(2, row, 20, 1)),
        );
    }
    doc.append(
        nav,
        Element::new(Tag::Button)
            .with_class(sidebar::CLOSE_CLASS)
            .with_text("Close")
            .with_layout(Rect::new(2, 11, 12, 1)),
    );
    doc
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging()?;

    let mut page = Page::new(build_document());
    let mut nav = Sidebar::attach(
        page.document_mut(),
        "main-nav",
        SidebarOptions { breakpoint: 90 },
    )?;
    let mut notices = nav.subscribe();
    tokio::spawn(async move {
        while let Some(notice) = notices.next().await {
            log::info!("sidebar notice: {notice:?}");
        }
    });
    page.add(nav);

    let options = ProgramOptions {
        title: Some("drape sidebar".into()),
        ..ProgramOptions::default()
    };
    drape::run_with(page, options).await?;
    Ok(())
}
