use crate::error::VcfParseResult;
use log;
use std::{
    fmt::Display,
    path::Path,
    sync::Once,
};

pub type Result<T> = VcfParseResult<T>;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

/// File name without any of the trailing extensions in `extensions`, e.g.
/// `panel.bed.gz` -> `panel` for `["gz", "bed"]`.
pub fn strip_extensions(path: &Path, extensions: &[&str]) -> String {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    loop {
        let Some((stem, ext)) = name.rsplit_once('.') else {
            break;
        };
        if stem.is_empty() || !extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            break;
        }
        name = stem.to_string();
    }
    name
}

pub fn format_number_with_commas(n: usize) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let mut result = String::with_capacity(digits.len() + (digits.len() - 1) / 3);
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_number_with_commas() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(100), "100");
        assert_eq!(format_number_with_commas(1_000), "1,000");
        assert_eq!(format_number_with_commas(10_000), "10,000");
        assert_eq!(format_number_with_commas(123_456), "123,456");
        assert_eq!(format_number_with_commas(1_234_567_890), "1,234,567,890");
    }

    #[test]
    fn test_strip_extensions() {
        let exts = ["gz", "bed"];
        assert_eq!(
            strip_extensions(&PathBuf::from("/a/b/panel.bed.gz"), &exts),
            "panel"
        );
        assert_eq!(strip_extensions(&PathBuf::from("panel.bed"), &exts), "panel");
        assert_eq!(
            strip_extensions(&PathBuf::from("panel.v2.bed"), &exts),
            "panel.v2"
        );
        assert_eq!(strip_extensions(&PathBuf::from(".bed"), &exts), ".bed");
    }
}
