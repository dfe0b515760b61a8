// Integration test suite for the Health Records Contract
// These tests cover complete user workflows and end-to-end scenarios

#[path = "../common/mod.rs"]
mod common;

mod clinician_workflows;
mod pharmacy_workflows;
