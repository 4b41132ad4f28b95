//! Integration Tests Module
//!
//! This module contains integration tests for the Trust Recon gateway.
//! Tests cover entity resolution, the report cache gateway, research
//! stream reconstruction, the HTTP stream client, and end-to-end gateway
//! orchestration.


// Report cache gateway tests
mod cache_gateway_test;

// Stream reconstructor tests (framing, phases, extraction)
mod stream_reconstruction_test;

// HTTP research stream client tests against a local socket
mod research_client_test;

// End-to-end gateway orchestration tests with mocked collaborators
mod gateway_test;
