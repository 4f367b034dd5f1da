pub mod engine;
pub mod messenger;

pub use crate::domain::model::{BirthdayMessage, Employee, GreetingBatch};
pub use crate::domain::ports::{
    ConfigProvider, EmployeeSource, GreetingPipeline, GreetingSender, Storage,
};
pub use crate::utils::error::Result;
