pub mod header;
pub mod utilization_bar;
