//! Structured logging and OpenTelemetry span export.
//!
//! Everything in the crate logs through `tracing` macros and spans. This module
//! wires those to two sinks:
//!
//! ```text
//! tracing ─┬─ fmt layer ──────────────────────────────→ stderr
//!          └─ tracing-opentelemetry → SDK → FileSpanExporter → <data_dir>/ecocampus-traces.jsonl
//! ```
//!
//! # Features
//!
//! - **Env filter**: `RUST_LOG` first, then `trace_level` from [`Config`](crate::Config), then `info`
//! - **File export**: one JSON object per finished span
//! - **Rotation**: the trace file rotates at 10MB, keeping 3 backups
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - `tracer`: tracer provider with the file exporter
//! - `span_formatter`: span to JSON rendering
//! - `file_writer`: rotating file writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE_NAME};
