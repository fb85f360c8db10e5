pub mod common_io; // reading and writing (gzipped) text files
pub mod dmatrix_io; // named dense matrices from and to delimited files
pub mod dmatrix_stat; // row statistics, correlation, percentiles
pub mod traits;
pub mod utils; // grouping and sampling helpers
