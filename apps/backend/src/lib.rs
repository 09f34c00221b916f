pub mod http;
mod id;
mod models;
mod pagination;
mod resolver;

pub use http::router;
pub use id::GlobalId;
pub use models::graphql;
pub use resolver::{MutationRoot, QueryRoot, VideoSchema, build_schema};
