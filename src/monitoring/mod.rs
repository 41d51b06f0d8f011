/*!
 * Monitoring
 * Structured tracing for table calls and manager operations
 */

mod tracer;

pub use tracer::{init_tracing, span_call, span_operation, CallSpan, OperationSpan};
