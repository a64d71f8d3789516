//! ports - 抽象 trait 层
//!
//! 定义外部基础设施的抽象接口

mod object_storage;

pub use object_storage::*;
