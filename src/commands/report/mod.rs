use crate::{
    cli::Cli,
    core::{report::VariantReport, report_config::ReportConfig},
    io::{
        bed_reader::{list_bed_files, BedMap},
        config_reader::read_report_config,
        known_variants_reader::read_known_variants,
        report_writer::ReportWriter,
        transcripts_reader::read_preferred_transcripts,
        vcf_reader::VcfReader,
    },
    utils::util::{format_number_with_commas, Result},
};
use rayon::{prelude::*, ThreadPoolBuilder};
use std::path::{Path, PathBuf};


pub fn report(args: &Cli) -> Result<()> {
    let mut vcf = VcfReader::from_path(&args.input)?;
    log::info!(
        "Reading {} ({} sample(s))",
        args.input.display(),
        vcf.header().sample_count()
    );

    if args.config_list {
        print!("{}", ReportConfig::from_header(vcf.header()).listing());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            let config = read_report_config(path)?;
            log::info!(
                "Loaded {} config entries from {}",
                config.entries.len(),
                path.display()
            );
            config
        }
        None => {
            log::info!("No config file found -- outputting all data from VCF.");
            ReportConfig::from_header(vcf.header())
        }
    };

    let mut report = build_report(&mut vcf, &config, args.filter_non_pass)?;

    match &args.transcripts {
        Some(path) => {
            let preferred = read_preferred_transcripts(path, args.transcript_strictness)?;
            let count = report.apply_preferred_transcripts(&preferred);
            log::info!(
                "{} row(s) on a preferred transcript",
                format_number_with_commas(count)
            );
        }
        None => log::info!(
            "No preferred transcripts file found -- preferred transcripts column will be labelled 'Unknown'."
        ),
    }

    match &args.known_variants {
        Some(path) => {
            let known = read_known_variants(path)?;
            let count = report.apply_known_variants(&known);
            log::info!(
                "{} row(s) matched a known variant",
                format_number_with_commas(count)
            );
        }
        None => log::info!(
            "No known variants file found -- Classification column will be empty."
        ),
    }

    let writer = ReportWriter::new(&args.output, &args.input)?;
    writer.write(&report, None)?;

    if let Some(bed_path) = &args.bed {
        let bed = BedMap::new(bed_path)?;
        write_bed_report(&writer, &report, &bed)?;
    } else if let Some(folder) = &args.bed_folder {
        write_bed_folder(&writer, &report, folder, args.num_threads)?;
    } else {
        log::info!("No BED files provided -- skipping region restriction.");
    }

    Ok(())
}

fn build_report(
    vcf: &mut VcfReader,
    config: &ReportConfig,
    filter_non_pass: bool,
) -> Result<VariantReport> {
    let mut report = VariantReport::new(vcf.header(), config)?;
    let mut n_records = 0;
    let mut n_filtered = 0;
    while let Some(record) = vcf.next_record()? {
        n_records += 1;
        if filter_non_pass && !record.is_pass() {
            n_filtered += 1;
            continue;
        }
        report.add_record(&record);
    }

    log::info!(
        "Processed {} record(s) into {} row(s)",
        format_number_with_commas(n_records),
        format_number_with_commas(report.rows.len())
    );
    if filter_non_pass {
        log::info!(
            "Skipped {} non-PASS record(s)",
            format_number_with_commas(n_filtered)
        );
    }
    Ok(report)
}

fn write_bed_report(
    writer: &ReportWriter,
    report: &VariantReport,
    bed: &BedMap,
) -> Result<Vec<PathBuf>> {
    let restricted =
        report.filter_rows(|row| bed.overlaps(&row.variant.chrom, row.variant.pos, row.end));
    log::debug!(
        "BED {}: kept {} of {} row(s)",
        bed.name,
        format_number_with_commas(restricted.rows.len()),
        format_number_with_commas(report.rows.len())
    );
    writer.write(&restricted, Some(&bed.name))
}

fn write_bed_folder(
    writer: &ReportWriter,
    report: &VariantReport,
    folder: &Path,
    num_threads: usize,
) -> Result<()> {
    let bed_paths = list_bed_files(folder)?;
    if bed_paths.is_empty() {
        log::warn!("No BED files found in {}", folder.display());
        return Ok(());
    }

    let folder_name = folder
        .canonicalize()
        .unwrap_or_else(|_| folder.to_path_buf())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            crate::vcf_parse_error!("BED folder {} has no name", folder.display())
        })?;
    let bed_writer = writer.subfolder(&folder_name)?;

    log::info!(
        "Applying {} BED file(s) from {} into {} using {} thread(s)",
        bed_paths.len(),
        folder.display(),
        bed_writer.output_dir().display(),
        num_threads
    );
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("vcf-parse-bed-{i}"))
        .build()
        .map_err(|e| crate::vcf_parse_error!("Failed to initialize BED thread pool: {e}"))?;

    pool.install(|| {
        bed_paths
            .par_iter()
            .try_for_each(|bed_path| -> Result<()> {
                let bed = BedMap::new(bed_path)?;
                write_bed_report(&bed_writer, report, &bed)?;
                Ok(())
            })
    })
}
