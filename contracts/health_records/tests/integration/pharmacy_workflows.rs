// Integration tests for pharmacy resolution and verification workflows

use crate::common::{
    create_test_patient, create_test_user, create_test_visit, sample_medications, setup_test_env,
    T0,
};
use health_records::{ContractError, Role};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{Address, String};

/// Test the dispensing flow: resolve via token, list pending orders, verify
#[test]
fn test_dispensing_workflow() {
    let ctx = setup_test_env();
    let (account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");
    let pharmacist = create_test_user(&ctx, Role::Pharmacist, "MedPlus");

    let visit_id = create_test_visit(&ctx, &doctor, &health_id, "fever");
    let rx_id = ctx.client.add_prescription(
        &doctor,
        &visit_id,
        &sample_medications(&ctx.env),
        &Some(String::from_str(&ctx.env, "After food")),
    );

    // Step 1: patient hands the pharmacy a token, not the permanent id
    let token = ctx.client.issue_token(&account, &0);
    let patient = ctx.client.resolve_patient(&pharmacist, &token.value);
    assert_eq!(patient.health_id, health_id);

    // Step 2: pending orders for the resolved patient
    let orders = ctx.client.list_prescriptions(&pharmacist, &patient.health_id);
    assert_eq!(orders.len(), 1);
    assert!(!orders.get(0).unwrap().verified);

    // Step 3: verify before dispensing
    ctx.client.verify_prescription(&pharmacist, &rx_id);
    let verified = ctx.client.get_prescription(&pharmacist, &rx_id);
    assert!(verified.verified);
    assert_eq!(verified.verified_by, Some(pharmacist.clone()));
    assert_eq!(verified.verified_at, Some(T0));
}

/// Test that a second verification from another branch never rewrites the
/// original verifier or timestamp
#[test]
fn test_double_verification_keeps_first_writer() {
    let ctx = setup_test_env();
    let (_account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");
    let first_pharmacist = create_test_user(&ctx, Role::Pharmacist, "MedPlus");
    let second_pharmacist = create_test_user(&ctx, Role::Pharmacist, "Apollo");

    let visit_id = create_test_visit(&ctx, &doctor, &health_id, "fever");
    let rx_id = ctx
        .client
        .add_prescription(&doctor, &visit_id, &sample_medications(&ctx.env), &None);

    ctx.client.verify_prescription(&first_pharmacist, &rx_id);

    ctx.env.ledger().set_timestamp(T0 + 1_800);
    ctx.client.verify_prescription(&second_pharmacist, &rx_id);

    let rx = ctx.client.get_prescription(&first_pharmacist, &rx_id);
    assert_eq!(rx.verified_by, Some(first_pharmacist.clone()));
    assert_eq!(rx.verified_at, Some(T0));
}

/// Test that verification stays open after the sharing token expires; the
/// token gates resolution, not the order itself
#[test]
fn test_verification_outlives_token() {
    let ctx = setup_test_env();
    let (account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");
    let pharmacist = create_test_user(&ctx, Role::Pharmacist, "MedPlus");

    let visit_id = create_test_visit(&ctx, &doctor, &health_id, "fever");
    let rx_id = ctx
        .client
        .add_prescription(&doctor, &visit_id, &sample_medications(&ctx.env), &None);

    let token = ctx.client.issue_token(&account, &60);
    ctx.client.resolve_patient(&pharmacist, &token.value);

    ctx.env.ledger().set_timestamp(T0 + 7_200);
    assert_eq!(
        ctx.client.try_resolve_patient(&pharmacist, &token.value),
        Err(Ok(ContractError::NotFound))
    );

    ctx.client.verify_prescription(&pharmacist, &rx_id);
    assert!(ctx.client.get_prescription(&pharmacist, &rx_id).verified);
}

/// Test that verification is fenced to registered pharmacists
#[test]
fn test_verification_requires_pharmacist_role() {
    let ctx = setup_test_env();
    let (_account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");

    let visit_id = create_test_visit(&ctx, &doctor, &health_id, "fever");
    let rx_id = ctx
        .client
        .add_prescription(&doctor, &visit_id, &sample_medications(&ctx.env), &None);

    // Neither the prescriber nor an unregistered account may verify
    assert_eq!(
        ctx.client.try_verify_prescription(&doctor, &rx_id),
        Err(Ok(ContractError::Unauthorized))
    );
    let outsider = Address::generate(&ctx.env);
    assert_eq!(
        ctx.client.try_verify_prescription(&outsider, &rx_id),
        Err(Ok(ContractError::Unauthorized))
    );
}
