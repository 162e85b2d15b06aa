//! Unit test modules.

mod categories_test;
mod gating_test;
mod navigation_test;
mod ranking_test;
mod recovery_test;
