// ============================================================================
// Order Domain - the order processing pipeline
// ============================================================================
//
// - Value objects (OrderId, OrderStatus, Stage)
// - The order record and its shared handle
// - Errors (collaborator errors and the pipeline failure taxonomy)
// - Capabilities (validator, repository, notifier) and their reference
//   implementations
// - OrderService, which runs the capabilities in sequence
//
// ============================================================================

pub mod value_objects;
pub mod aggregate;
pub mod errors;
pub mod validator;
pub mod repository;
pub mod notifier;
pub mod service;

pub use value_objects::*;
pub use aggregate::*;
pub use errors::*;
pub use validator::*;
pub use repository::*;
pub use notifier::*;
pub use service::*;
