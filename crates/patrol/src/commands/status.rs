//! Status command handler.

use patrol_core::{Controller, StatusSnapshot, StatusView};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = controller.refresh_status().await?;
    print(&snapshot, global)
}

/// Render one snapshot in the selected output format.
pub fn print(snapshot: &StatusSnapshot, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        snapshot,
        |s| detail(s, color),
        |s| s.status.label().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(snapshot: &StatusSnapshot, color: bool) -> String {
    let view = StatusView::from_snapshot(Some(snapshot));
    let interval = view
        .interval_placeholder
        .map_or_else(|| "-".to_owned(), |secs| format!("{secs}s"));
    let next = if view.show_end {
        "patrol stop"
    } else {
        "patrol start"
    };

    format!(
        "Patrol:     {}\nInterval:   {interval}\nUpdated:    {}\nNext:       {next}",
        output::status_label(view.status, color),
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
