//! Evidence video handling.

pub mod evidence;

pub use evidence::{EvidenceUpload, EvidenceUploader};
