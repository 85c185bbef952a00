//! Structured error handling for API responses

pub mod codes;
pub mod dispatcher;
pub mod fault;
pub mod response;

pub use codes::ErrorCode;
pub use dispatcher::{dispatch, handle_faults};
pub use fault::{ApplicationFault, ConstraintViolation, Fault, FieldError};
pub use response::ErrorResponse;
