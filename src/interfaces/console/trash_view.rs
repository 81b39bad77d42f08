use std::io::Write;
use std::sync::Mutex;

use tracing::{debug, error};

use crate::application::dtos::trash_dto::TrashEntryDto;
use crate::application::ports::trash_ports::TrashView;

const NAME_WIDTH: usize = 40;

/// Header line of the trash table
pub fn header_row() -> String {
    format!(
        "{:<20} {:<width$} {:>10}  {:<24}  {}",
        "FS_ID",
        "NAME",
        "SIZE",
        "DELETED",
        "REMAINING",
        width = NAME_WIDTH
    )
}

/// One table row per display record
pub fn format_row(record: &TrashEntryDto) -> String {
    let mut name = record.name.clone();
    if record.is_dir {
        name.push('/');
    }
    format!(
        "{:<20} {:<width$} {:>10}  {:<24}  {}",
        record.fs_id,
        ellipsize(&name, NAME_WIDTH),
        record.human_size,
        record.deleted_at,
        record.remaining_label,
        width = NAME_WIDTH
    )
}

/// Truncates to `max` characters, ending with `…` when shortened
fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Plain-text rendering of the trash listing
pub struct ConsoleTrashView<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleTrashView<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn write_lines<I: IntoIterator<Item = String>>(&self, lines: I) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        for line in lines {
            if let Err(e) = writeln!(out, "{}", line) {
                error!("Failed to write trash listing: {}", e);
                return;
            }
        }
        let _ = out.flush();
    }
}

impl<W: Write + Send> TrashView for ConsoleTrashView<W> {
    fn loading_started(&self) {
        debug!("Loading trash...");
    }

    fn loading_stopped(&self) {
        debug!("Loading finished");
    }

    fn list_reset(&self) {
        self.write_lines([header_row()]);
    }

    fn entries_appended(&self, records: &[TrashEntryDto]) {
        self.write_lines(records.iter().map(format_row));
    }

    fn navigate_home(&self) {
        self.write_lines(["Restored entries are back in the home folder.".to_string()]);
    }
}
