pub mod artifact;
pub mod business_function;
pub mod client;
pub mod common;
pub mod company;
pub mod erp_system;
pub mod hierarchy;
pub mod user_context;

pub use artifact::*;
pub use business_function::*;
pub use client::*;
pub use common::*;
pub use company::*;
pub use erp_system::*;
pub use hierarchy::*;
pub use user_context::*;
