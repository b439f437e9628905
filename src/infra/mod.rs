pub mod local;
pub mod socrata;
