// Integration tests for clinician lookup and visit recording workflows

use crate::common::{
    create_test_patient, create_test_user, create_test_visit, setup_test_env, T0,
};
use health_records::{ContractError, Role};
use soroban_sdk::testutils::Ledger as _;
use soroban_sdk::String;

/// Test the consultation flow: resolve by permanent id, record a visit,
/// see it in the history
#[test]
fn test_consultation_by_permanent_id() {
    let ctx = setup_test_env();
    let (_account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");

    // Step 1: doctor looks the patient up by the id they dictated
    let patient = ctx.client.resolve_patient(&doctor, &health_id);
    assert_eq!(patient.health_id, health_id);

    // Step 2: doctor records the consultation
    let visit_id = ctx.client.record_visit(
        &doctor,
        &doctor,
        &health_id,
        &String::from_str(&ctx.env, "fever"),
        &String::from_str(&ctx.env, "viral fever"),
        &String::from_str(&ctx.env, "paracetamol, review if no improvement"),
        &None,
        &false,
    );

    // Step 3: the history shows exactly that visit, newest first
    let visits = ctx.client.list_visits(&doctor, &health_id, &10);
    assert_eq!(visits.len(), 1);
    let visit = visits.get(0).unwrap();
    assert_eq!(visit.id, visit_id);
    assert_eq!(visit.chief_complaint, String::from_str(&ctx.env, "fever"));
    assert_eq!(visit.clinician, doctor);
}

/// Test the same flow when the patient shares a temporary token instead of
/// their permanent id
#[test]
fn test_consultation_by_token() {
    let ctx = setup_test_env();
    let (account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");

    let token = ctx.client.issue_token(&account, &0);

    // The token resolves without ever disclosing the permanent id to the
    // patient's chat or paperwork
    let patient = ctx.client.resolve_patient(&doctor, &token.value);
    assert_eq!(patient.health_id, health_id);

    create_test_visit(&ctx, &doctor, &patient.health_id, "fever");
    assert_eq!(ctx.client.list_visits(&doctor, &health_id, &10).len(), 1);
}

/// Test that an expired or revoked token gives the same single failure as
/// an unknown one
#[test]
fn test_lookup_failures_are_uniform() {
    let ctx = setup_test_env();
    let (account, _health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");

    let expired = ctx.client.issue_token(&account, &60);
    let revoked = ctx.client.issue_token(&account, &7_200);
    ctx.client.deactivate_token(&account, &revoked.id);
    ctx.env.ledger().set_timestamp(T0 + 120);

    for query in [
        expired.value.clone(),
        revoked.value.clone(),
        String::from_str(&ctx.env, "ZZZZ9999"),
    ] {
        assert_eq!(
            ctx.client.try_resolve_patient(&doctor, &query),
            Err(Ok(ContractError::NotFound))
        );
    }
}

/// Test the clinician-side history window of ten entries
#[test]
fn test_visit_history_window() {
    let ctx = setup_test_env();
    let (_account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");

    for i in 0..12u64 {
        ctx.env.ledger().set_timestamp(T0 + i * 3_600);
        create_test_visit(&ctx, &doctor, &health_id, "check");
    }

    let window = ctx.client.list_visits(&doctor, &health_id, &10);
    assert_eq!(window.len(), 10);
    assert_eq!(window.get(0).unwrap().recorded_at, T0 + 11 * 3_600);
}

/// Test clinician credential profile registration alongside the flows
#[test]
fn test_clinician_profile() {
    let ctx = setup_test_env();
    let doctor = create_test_user(&ctx, Role::Doctor, "Dr. Mehta");

    ctx.client.register_clinician(
        &doctor,
        &doctor,
        &String::from_str(&ctx.env, "KMC-44812"),
        &Some(String::from_str(&ctx.env, "General Medicine")),
        &None,
    );

    let profile = ctx.client.get_clinician(&doctor);
    assert_eq!(
        profile.license_number,
        String::from_str(&ctx.env, "KMC-44812")
    );
}

/// Test that visit recording is fenced to the clinician permission even
/// after a successful resolution elsewhere
#[test]
fn test_pharmacist_cannot_record_visits() {
    let ctx = setup_test_env();
    let (_account, health_id) = create_test_patient(&ctx, "Asha Rao");
    let pharmacist = create_test_user(&ctx, Role::Pharmacist, "MedPlus");

    // Resolution works for pharmacists
    assert_eq!(
        ctx.client
            .resolve_patient(&pharmacist, &health_id)
            .health_id,
        health_id
    );

    // Recording does not
    let result = ctx.client.try_record_visit(
        &pharmacist,
        &pharmacist,
        &health_id,
        &String::from_str(&ctx.env, "fever"),
        &String::from_str(&ctx.env, ""),
        &String::from_str(&ctx.env, ""),
        &None,
        &false,
    );
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
}
