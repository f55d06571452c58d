pub const DEFAULT_THREADS: usize = 1;
pub const DEFAULT_OUTPUT_DIR: &str = ".";

pub const REPORT_SUFFIX: &str = "_VariantReport.txt";

pub const SAMPLE_ID_COLUMN: &str = "SampleID";
pub const VARIANT_COLUMN: &str = "Variant";
pub const CLASSIFICATION_COLUMN: &str = "Classification";
pub const FIXED_COLUMNS: [&str; 3] = [SAMPLE_ID_COLUMN, VARIANT_COLUMN, CLASSIFICATION_COLUMN];

pub const DEFAULT_FILTER_ANNOTATION: &str = "FILTER";
pub const DEFAULT_PREF_ANNOTATION: &str = "Preferred";

pub const VEP_INFO_ID: &str = "CSQ";
pub const VEP_FORMAT_MARKER: &str = "Format: ";
pub const VEP_ALLELE_FIELD: &str = "Allele";
pub const VEP_TRANSCRIPT_FIELD: &str = "Feature";

pub const GENOTYPE_FORMAT_ID: &str = "GT";
pub const CLASSIFICATION_INFO_ID: &str = "Classification";

/// Largest POS a VCF record may carry (2^31 - 1)
pub const MAX_POSITION: u64 = i32::MAX as u64;

pub const PASS_FILTER: &str = "PASS";
pub const MISSING_VALUE: &str = ".";
pub const SPANNING_DELETION: &str = "*";

pub const MANDATORY_COLUMNS: [&str; 8] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO",
];
pub const FORMAT_COLUMN: &str = "FORMAT";

pub const VCF_EXTENSIONS: [&str; 4] = ["gz", "bgz", "vcf", "bcf"];
pub const BED_EXTENSIONS: [&str; 2] = ["gz", "bed"];
