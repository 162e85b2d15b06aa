//! Integration test modules.

mod brief_test;
mod checkin_flow_test;
mod scenario_test;
mod storage_test;
