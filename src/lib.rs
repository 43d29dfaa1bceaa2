//! dynotes
//!
//! Notes CRUD against a DynamoDB table, exposed two ways:
//! - CLI subcommands (add, list, get, update, delete) that run one table
//!   operation each and print the result
//! - a small HTML web UI (the `ui` subcommand)
//!
//! Durability, key uniqueness, and partitioning are all delegated to
//! DynamoDB. Every operation is a single remote call; nothing is cached or
//! retried locally.

pub mod dynamo;
pub mod notes;
pub mod web;
