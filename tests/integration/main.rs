//! Integration test harness: StationService → FSM → ports.

mod mock_hw;
mod service_tests;
