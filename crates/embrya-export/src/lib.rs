//! embrya-export
//!
//! Report artifacts for a single analyzed embryo: a plain-text report
//! rendered through a Tera template and a PDF rendered with printpdf.
//! Both are presentational; every numeric they quote comes straight from
//! the derived prediction record.

pub mod error;
pub mod pdf;
pub mod render;

pub use pdf::generate_pdf_report;
pub use render::{render_text_report, ReportOptions};
