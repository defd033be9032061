pub mod content;
pub mod fields;
pub mod matcher;
pub mod provenance;
pub mod snippet;
