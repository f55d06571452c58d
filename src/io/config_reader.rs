use super::readers::{numbered_lines, open_text_reader};
use crate::{
    core::report_config::{ConfigEntry, ReportConfig},
    utils::util::Result,
};
use std::path::Path;

pub fn read_report_config(path: &Path) -> Result<ReportConfig> {
    let reader = open_text_reader(path)?;
    let mut entries = Vec::new();
    for line in numbered_lines(reader, path) {
        let (line_number, line) = line?;
        if let Some(entry) = ConfigEntry::parse_line(&line, line_number)? {
            log::trace!("Config entry {:?}", entry);
            entries.push(entry);
        }
    }
    log::debug!(
        "Loaded {} config entries from {}",
        entries.len(),
        path.display()
    );
    Ok(ReportConfig::new(entries))
}
