// implementation of common parallel algorithms in rust
// - blocked forward substitution (wavefront scheduled)
// - parallel quicksort
// - parallel reduce
// - parallel scan (prefix)

pub mod reduce;
pub mod scan;
pub mod sort;
pub mod substitution;
pub mod wavefront;

mod utils;

pub use crate::reduce::{parallel_reduce, parallel_reduce_tune, parallel_sum};
pub use crate::scan::{parallel_scan, parallel_scan_sum, parallel_scan_tune};
pub use crate::sort::{parallel_quicksort, parallel_quicksort_tune};
pub use crate::substitution::{
    forward_substitution, parallel_forward_substitution, parallel_forward_substitution_tune,
};
pub use crate::wavefront::{wavefront, wavefront_tune};

// cutoff below which the divide-and-conquer algorithms stop splitting
pub(crate) const SEQ_THRESHOLD: usize = 1024;
