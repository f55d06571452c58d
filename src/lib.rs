pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod classification;
    pub mod header;
    pub mod record;
    pub mod report;
    pub mod report_config;
    pub mod transcripts;
    pub mod vep;
    pub mod containers {
        pub mod interval_tree;
    }
}

pub mod io {
    pub mod bed_reader;
    pub mod config_reader;
    pub mod known_variants_reader;
    pub mod readers;
    pub mod report_writer;
    pub mod transcripts_reader;
    pub mod vcf_reader;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
