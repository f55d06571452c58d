mod report;

pub use report::report;
