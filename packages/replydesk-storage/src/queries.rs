//! Row-level queries. Every function takes any Postgres executor, so callers choose between the
//! pool and an open transaction.

pub mod businesses;
pub mod conversations;
pub mod leads;
pub mod templates;
