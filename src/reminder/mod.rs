pub mod aggregator;
pub mod filter;
pub mod scope;

pub use aggregator::Aggregator;
pub use filter::is_stale;
pub use scope::{MemberScopes, ProjectScopes, ScopeProvider};
