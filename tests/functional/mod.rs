//! Functional test suite

mod seed_test;
