pub mod client;
pub mod source;

pub use client::GitLabClient;
pub use source::MergeRequestSource;
