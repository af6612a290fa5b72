pub mod group;
pub mod merge_request;

pub use group::*;
pub use merge_request::*;
