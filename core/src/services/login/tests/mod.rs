//! Tests for the email sign-in flow
