//! Property-based tests for request validation, rendering, and history windows
