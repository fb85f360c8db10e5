pub use log::{info, warn};

pub use matrix_util::traits::MatWithNames;

pub type Mat = nalgebra::DMatrix<f64>;
pub type NamedMat = MatWithNames<Mat>;

/// Gene identifiers are opaque, compared exactly
pub type GeneId = Box<str>;

pub use fnv::FnvHashMap as HashMap;
pub use fnv::FnvHashSet as HashSet;
pub use std::collections::{BTreeMap, BTreeSet};
