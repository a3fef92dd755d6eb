//! Results command handler: one fetch, one rendered page.

use std::fmt::Write;

use tabled::Tabled;

use patrol_core::{Controller, Gallery, GalleryView, JumpOutcome, PageView, ResultCard};

use crate::cli::{GlobalOpts, OutputFormat, ResultsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Image")]
    path: String,
}

fn card_row(card: &ResultCard) -> CardRow {
    CardRow {
        number: card.index + 1,
        time: card.time.clone(),
        path: card.path.clone(),
    }
}

pub async fn handle(
    controller: &Controller,
    args: &ResultsArgs,
    default_page_size: usize,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let results = controller.refresh_results().await?;

    let mut gallery = Gallery::new(args.page_size.unwrap_or(default_page_size));
    gallery.set_results(results);
    if gallery.jump_to_page(&args.page) == JumpOutcome::Ignored {
        return Err(CliError::Validation {
            field: "page".into(),
            reason: format!("expected a page number, got '{}'", args.page),
        });
    }

    let view = gallery.render();
    let out = match global.output {
        OutputFormat::Table => render_table(&view)?,
        OutputFormat::Plain => view
            .cards()
            .iter()
            .map(|card| card.path.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        format => output::render_single(format, &view, |_| String::new(), |_| String::new())?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_table(view: &GalleryView) -> Result<String, CliError> {
    match view {
        GalleryView::Empty { message } => Ok((*message).to_owned()),
        GalleryView::Page(page) => {
            let mut out = output::render_list(
                OutputFormat::Table,
                &page.cards,
                card_row,
                |c| c.path.clone(),
            )?;
            let _ = write!(out, "\n{}", footer(page));
            Ok(out)
        }
    }
}

/// `Page 2 / 3  (45)  20 per page` plus navigation hints.
fn footer(page: &PageView) -> String {
    let mut line = format!(
        "{}  {}  {} per page",
        page.page_label, page.count_badge, page.items_per_page
    );
    if !page.prev_disabled {
        let _ = write!(line, "  [--page {}]", page.current_page - 1);
    }
    if !page.next_disabled {
        let _ = write!(line, "  [--page {}]", page.current_page + 1);
    }
    line
}
