//! Tests for the phone verification flow

mod service_tests;
