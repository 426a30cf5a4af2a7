//! OpenTelemetry-based observability with file-based trace export.
//!
//! All components log through `tracing`. When a host calls [`init_tracing`],
//! spans are bridged into OpenTelemetry and written as OTLP-JSON lines:
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → OTLP-JSON file
//! ```
//!
//! # Features
//!
//! - **File-Based Export**: `eventsync-otlp.json` in the data directory, or
//!   `trace_file` from the configuration
//! - **Rotation**: the file rotates at 10 MiB, keeping 3 numbered backups
//! - **Fetch Linking**: each `FetchRequest` carries the requesting span's
//!   trace context, so the span that executes the fetch joins the same trace
//!
//! # Configuration
//!
//! The level filter comes from `trace_level`, then `RUST_LOG`, then `"info"`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`exporter`]: OTLP-JSON span exporter and tracer provider
//! - [`rotating_file`]: size-capped line file with numbered backups

pub mod exporter;
pub mod init;
pub mod rotating_file;

pub use init::init_tracing;
