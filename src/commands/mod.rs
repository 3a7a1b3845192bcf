//! Command implementations, one module per service resource

pub mod applications;
pub mod batches;
pub mod catalogs;
pub mod environments;
pub mod native_builds;
pub mod test_cases;
pub mod whoami;
