use crate::{
    constants::{REPORT_SUFFIX, VCF_EXTENSIONS},
    core::report::VariantReport,
    utils::util::{format_number_with_commas, strip_extensions, Result},
};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes one tab-separated report per sample into an output folder.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    /// Stands in for the sample name when the VCF has no samples
    vcf_name: String,
}

impl ReportWriter {
    pub fn new(output_dir: &Path, vcf_path: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).map_err(|e| {
            crate::vcf_parse_error!(
                "Failed to create output folder {}: {}",
                output_dir.display(),
                e
            )
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            vcf_name: strip_extensions(vcf_path, &VCF_EXTENSIONS),
        })
    }

    /// Writer targeting `<output_dir>/<name>`, created if missing.
    pub fn subfolder(&self, name: &str) -> Result<Self> {
        let output_dir = self.output_dir.join(name);
        fs::create_dir_all(&output_dir).map_err(|e| {
            crate::vcf_parse_error!(
                "Failed to create output folder {}: {}",
                output_dir.display(),
                e
            )
        })?;
        Ok(Self {
            output_dir,
            vcf_name: self.vcf_name.clone(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn report_path(&self, sample: Option<&str>, bed_name: Option<&str>) -> PathBuf {
        let prefix = sample.unwrap_or(&self.vcf_name);
        let file_name = match bed_name {
            Some(bed) => format!("{prefix}_{bed}{REPORT_SUFFIX}"),
            None => format!("{prefix}{REPORT_SUFFIX}"),
        };
        self.output_dir.join(file_name)
    }

    /// Writes every sample's rows, including samples without any. Returns the written paths.
    pub fn write(&self, report: &VariantReport, bed_name: Option<&str>) -> Result<Vec<PathBuf>> {
        let samples: Vec<Option<&str>> = if report.samples().is_empty() {
            vec![None]
        } else {
            report.samples().iter().map(|s| Some(s.as_str())).collect()
        };

        let mut written = Vec::with_capacity(samples.len());
        for sample in samples {
            let path = self.report_path(sample, bed_name);
            let file = File::create(&path).map_err(|e| {
                crate::vcf_parse_error!("Failed to create report {}: {}", path.display(), e)
            })?;
            let rows = write_report(BufWriter::new(file), report, sample)
                .map_err(|e| crate::vcf_parse_error!("Failed to write {}: {}", path.display(), e))?;
            log::info!(
                "Wrote {} row(s) to {}",
                format_number_with_commas(rows),
                path.display()
            );
            written.push(path);
        }
        Ok(written)
    }
}

/// Writes the header line and the rows of `sample`, returning the row count.
pub fn write_report<W: Write>(
    mut writer: W,
    report: &VariantReport,
    sample: Option<&str>,
) -> Result<usize> {
    writeln!(writer, "{}", report.header_row().join("\t"))?;
    let mut count = 0;
    for row in report.rows_for_sample(sample) {
        writeln!(writer, "{}", report.render_row(row).join("\t"))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        header::HeaderParser,
        record::VcfRecord,
        report_config::{ConfigEntry, Location, ReportConfig},
    };
    use tempfile::tempdir;

    fn report(columns: &str, records: &[&str]) -> VariantReport {
        let mut parser = HeaderParser::new();
        parser.push_meta_line("##fileformat=VCFv4.2", 1).unwrap();
        parser
            .push_meta_line(
                r#"##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">"#,
                2,
            )
            .unwrap();
        let header = parser.finish(columns, 3).unwrap();
        let config = ReportConfig::new(vec![ConfigEntry::new("FILTER", Location::Filter)]);
        let mut report = VariantReport::new(&header, &config).unwrap();
        for (i, line) in records.iter().enumerate() {
            let record = VcfRecord::from_line(line, header.sample_count(), i + 4).unwrap();
            report.add_record(&record);
        }
        report
    }

    #[test]
    fn test_report_path() -> Result<()> {
        let dir = tempdir()?;
        let writer = ReportWriter::new(dir.path(), Path::new("/data/run1.vcf.gz"))?;
        assert_eq!(
            writer.report_path(Some("S1"), None),
            dir.path().join("S1_VariantReport.txt")
        );
        assert_eq!(
            writer.report_path(Some("S1"), Some("panel")),
            dir.path().join("S1_panel_VariantReport.txt")
        );
        assert_eq!(
            writer.report_path(None, None),
            dir.path().join("run1_VariantReport.txt")
        );
        Ok(())
    }

    #[test]
    fn test_write_one_file_per_sample() -> Result<()> {
        let dir = tempdir()?;
        let report = report(
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2",
            &["1\t10\t.\tA\tG\t.\tPASS\t.\tGT\t0/1\t0/0"],
        );
        let writer = ReportWriter::new(&dir.path().join("out"), Path::new("in.vcf"))?;
        let written = writer.write(&report, None)?;
        assert_eq!(written.len(), 2);

        let s1 = fs::read_to_string(writer.report_path(Some("S1"), None))?;
        assert_eq!(
            s1,
            "SampleID\tVariant\tClassification\tFILTER\nS1\t1:10A>G\t\tPASS\n"
        );
        let s2 = fs::read_to_string(writer.report_path(Some("S2"), None))?;
        assert_eq!(s2, "SampleID\tVariant\tClassification\tFILTER\n");
        Ok(())
    }

    #[test]
    fn test_write_sites_only_and_subfolder() -> Result<()> {
        let dir = tempdir()?;
        let report = report(
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO",
            &["1\t10\t.\tA\tG\t.\t.\t."],
        );
        let writer = ReportWriter::new(dir.path(), Path::new("cohort.vcf"))?.subfolder("beds")?;
        let written = writer.write(&report, Some("exons"))?;
        assert_eq!(written, [dir.path().join("beds/cohort_exons_VariantReport.txt")]);
        let text = fs::read_to_string(&written[0])?;
        assert_eq!(text.lines().nth(1), Some("\t1:10A>G\t\t."));
        Ok(())
    }
}
