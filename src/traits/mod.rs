pub mod producer;
pub mod template;

pub use producer::{ProduceRequest, ProduceResponse, Producer};
pub use template::Template;
