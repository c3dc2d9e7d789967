//! Tests for worker services
//!
//! The HTTP client runs against a wiremock coordinator; the provider against
//! known prime tables.
