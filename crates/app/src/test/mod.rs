//! Shared PostgreSQL fixtures for service tests.


pub(crate) use context::TestContext;
