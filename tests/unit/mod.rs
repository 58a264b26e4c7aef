mod basic_tests;
mod properties;
