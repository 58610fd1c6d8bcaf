//! Unit test suite

mod config_test;
