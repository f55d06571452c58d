use crate::{constants::*, core::transcripts::Strictness, utils::util::Result};
use clap::{ArgAction, ArgGroup, Parser};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
/// * `0.1.0` - built outside a git checkout
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = option_env!("VERGEN_GIT_DESCRIBE").unwrap_or_default();
    if git_describe.is_empty() || git_describe == "VERGEN_IDEMPOTENT_OUTPUT" {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug, Clone)]
#[command(name = "vcf_parse",
          version = &**FULL_VERSION,
          about = "Takes a VCF file and parses the variants to produce a tab delimited variant report.",
          long_about = None,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
#[command(group(
    ArgGroup::new("bed_files")
        .required(false)
        .args(["bed", "bed_folder"]),
))]
pub struct Cli {
    /// Input VCF file (plain or gzip/bgzip compressed)
    #[arg(value_name = "INPUT", value_parser = check_file_exists)]
    pub input: PathBuf,

    /// Folder where reports are saved, created if missing [default: current directory]
    #[arg(
        short = 'O',
        long = "output",
        value_name = "OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output: PathBuf,

    /// Preferred transcripts file, tab separated with transcripts in the second column
    #[arg(
        short = 't',
        long = "transcripts",
        value_name = "TRANSCRIPTS",
        value_parser = check_file_exists
    )]
    pub transcripts: Option<PathBuf>,

    /// Strictness of matching while annotating preferred transcripts
    #[arg(
        short = 'T',
        long = "transcript-strictness",
        alias = "transcript_strictness",
        value_name = "STRICTNESS",
        value_enum,
        default_value_t = Strictness::Low
    )]
    pub transcript_strictness: Strictness,

    /// BED file applied to the report, saved as an extra report next to the full one
    #[arg(
        short = 'b',
        long = "bed",
        value_name = "BED",
        value_parser = check_file_exists
    )]
    pub bed: Option<PathBuf>,

    /// Folder of BED files, each applied to the report and saved as <OUTPUT>/<BED_FOLDER name>/
    #[arg(
        short = 'B',
        long = "bed-folder",
        alias = "bed_folder",
        value_name = "BED_FOLDER",
        value_parser = check_dir_exists
    )]
    pub bed_folder: Option<PathBuf>,

    /// Known variants VCF carrying an INFO 'Classification' code (0-5) for each variant
    #[arg(
        short = 'k',
        long = "known-variants",
        alias = "known_variants",
        value_name = "KNOWN_VARIANTS",
        value_parser = check_file_exists
    )]
    pub known_variants: Option<PathBuf>,

    /// Config file selecting and ordering the report columns (annotation, location[, alias])
    #[arg(
        short = 'c',
        long = "config",
        value_name = "CONFIG",
        value_parser = check_file_exists
    )]
    pub config: Option<PathBuf>,

    /// Print every available config entry of the input VCF, then exit
    #[arg(short = 'l', long = "config-list", alias = "config_list")]
    pub config_list: bool,

    /// Drop variants whose FILTER column is not PASS
    #[arg(short = 'F', long = "filter-non-pass", alias = "filter_non_pass")]
    pub filter_non_pass: bool,

    /// Number of threads used to apply BED files
    #[arg(
        short = '@',
        value_name = "THREADS",
        default_value_t = DEFAULT_THREADS,
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity).
    /// The version is printed by -V/--version
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
    )]
    pub verbosity: u8,
}

/// Initializes the logger; `-v` selects Debug, `-vv` Trace, Info otherwise.
/// `RUST_LOG` is honoured through `from_default_env`.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match level {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{}\t{}\t{}\t{}",
                style.value(level),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.module_path().unwrap_or("vcf_parse"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse::<usize>()
        .map_err(|_| crate::vcf_parse_error!("`{}` is not a valid thread number", s))?;
    if thread == 0 {
        return Err(crate::vcf_parse_error!("Number of threads must be >= 1"));
    }
    Ok(thread)
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_file() {
        return Err(crate::vcf_parse_error!(
            "File does not exist: {}",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

fn check_dir_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        return Err(crate::vcf_parse_error!(
            "Folder does not exist: {}",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_defaults() {
        let input = NamedTempFile::new().unwrap();
        let path = input.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["vcf_parse", path]).unwrap();
        assert_eq!(cli.input, input.path());
        assert_eq!(cli.output, PathBuf::from("."));
        assert_eq!(cli.transcript_strictness, Strictness::Low);
        assert_eq!(cli.num_threads, 1);
        assert!(!cli.config_list);
        assert!(!cli.filter_non_pass);
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn test_underscore_aliases() {
        let input = NamedTempFile::new().unwrap();
        let path = input.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "vcf_parse",
            "--transcript_strictness",
            "high",
            "--filter_non_pass",
            "--config_list",
            "-vv",
            path,
        ])
        .unwrap();
        assert_eq!(cli.transcript_strictness, Strictness::High);
        assert!(cli.filter_non_pass);
        assert!(cli.config_list);
        assert_eq!(cli.verbosity, 2);
    }

    #[test]
    fn test_bed_and_bed_folder_conflict() {
        let input = NamedTempFile::new().unwrap();
        let bed = NamedTempFile::new().unwrap();
        let folder = tempdir().unwrap();
        let result = Cli::try_parse_from([
            "vcf_parse",
            "-b",
            bed.path().to_str().unwrap(),
            "-B",
            folder.path().to_str().unwrap(),
            input.path().to_str().unwrap(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_missing_input_and_zero_threads() {
        assert!(Cli::try_parse_from(["vcf_parse", "/definitely/missing.vcf"]).is_err());
        let input = NamedTempFile::new().unwrap();
        let path = input.path().to_str().unwrap();
        assert!(Cli::try_parse_from(["vcf_parse", "-@", "0", path]).is_err());
        assert!(Cli::try_parse_from(["vcf_parse", "-@", "two", path]).is_err());
        assert!(Cli::try_parse_from(["vcf_parse", "-T", "medium", path]).is_err());
    }

    #[test]
    fn test_version_flag_is_upper_case() {
        let err = Cli::try_parse_from(["vcf_parse", "-V"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let input = NamedTempFile::new().unwrap();
        let path = input.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["vcf_parse", "-v", path]).unwrap();
        assert_eq!(cli.verbosity, 1);
    }

    #[test]
    fn test_full_version_starts_with_crate_version() {
        assert!(FULL_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
    }
}
