pub mod aggregation;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod phases;
pub mod photos;
pub mod report;
