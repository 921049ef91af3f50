pub mod collect;
pub mod corpus;
pub mod errors;
pub mod exec;
pub mod plan;
pub mod report;
pub mod stats;
pub mod types;
