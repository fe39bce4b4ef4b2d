pub mod annotation;
pub mod pipeline;
pub mod registry;
pub mod shared;
pub mod storage;
