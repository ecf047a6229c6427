/// Unit-level tests against the public library API
mod core_properties;
mod storage_tests;
