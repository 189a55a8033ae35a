// Adapters layer: concrete narrators and the report writer.

pub mod narrator;
pub mod report;
