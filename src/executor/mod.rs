pub mod leaf_scan;
pub mod scan;
