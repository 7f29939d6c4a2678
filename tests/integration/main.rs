//! Integration tests driving the docs2csv binary.

mod cli_test;
mod helpers;
mod pipeline_test;
