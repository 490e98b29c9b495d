//! Shared test harness modules for the zipfinder CLI.

mod helpers;
mod pipeline;
