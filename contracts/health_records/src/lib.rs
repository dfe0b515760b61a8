#![no_std]
mod clinician;
mod events;
mod identifier;
mod patient;
mod prescription;
mod resolver;
mod token;
mod visit;
pub mod rbac;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String,
    Symbol, Vec,
};

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

/// Identifier regeneration bound. Generation is probabilistic; the store's
/// occupancy check decides, and after this many collisions the conflict is
/// surfaced instead of retried.
const MAX_ID_ATTEMPTS: u32 = 5;

pub use clinician::Clinician;
pub use identifier::{HEALTH_ID_LEN, TOKEN_VALUE_LEN};
pub use patient::{Patient, Sex};
pub use prescription::{Medication, Prescription};
pub use rbac::{Permission, Role};
pub use token::{AccessToken, DEFAULT_TOKEN_TTL};
pub use visit::Visit;

/// User information structure
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub address: Address,
    pub role: Role,
    pub name: String,
    pub registered_at: u64,
    pub is_active: bool,
}

/// Contract errors
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    UserNotFound = 4,
    /// Resolution failure. Deliberately covers unknown, expired, and
    /// deactivated identifiers alike.
    NotFound = 5,
    InvalidInput = 6,
    PatientExists = 7,
    PatientNotFound = 8,
    TokenNotFound = 9,
    VisitNotFound = 10,
    PrescriptionNotFound = 11,
    IdCollision = 12,
}

#[contract]
pub struct HealthRecordsContract;

#[contractimpl]
impl HealthRecordsContract {
    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);

        // Assign the Admin RBAC role so the admin has permissions
        rbac::assign_role(&env, admin.clone(), Role::Admin, 0);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Register a new user
    pub fn register_user(
        env: Env,
        caller: Address,
        user: Address,
        role: Role,
        name: String,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        if !rbac::has_permission(&env, &caller, &Permission::ManageUsers) {
            return Err(ContractError::Unauthorized);
        }

        let user_data = User {
            address: user.clone(),
            role: role.clone(),
            name: name.clone(),
            registered_at: env.ledger().timestamp(),
            is_active: true,
        };

        let key = (symbol_short!("USER"), user.clone());
        env.storage().persistent().set(&key, &user_data);

        // Create the RBAC role assignment so has_permission works
        rbac::assign_role(&env, user.clone(), role.clone(), 0);

        events::publish_user_registered(&env, user, role, name);

        Ok(())
    }

    /// Get user information
    pub fn get_user(env: Env, user: Address) -> Result<User, ContractError> {
        let key = (symbol_short!("USER"), user);
        env.storage()
            .persistent()
            .get(&key)
            .ok_or(ContractError::UserNotFound)
    }

    // ======================== Patients ========================

    /// Create the patient record for `account` and assign its permanent
    /// health id. Self-service for the patient, or performed by a user
    /// manager on their behalf.
    #[allow(clippy::too_many_arguments)]
    pub fn register_patient(
        env: Env,
        caller: Address,
        account: Address,
        date_of_birth: String,
        sex: Sex,
        blood_group: Option<String>,
        emergency_contact: String,
        home_address: String,
        nearest_police_station: Option<String>,
    ) -> Result<String, ContractError> {
        caller.require_auth();

        if caller != account && !rbac::has_permission(&env, &caller, &Permission::ManageUsers) {
            return Err(ContractError::Unauthorized);
        }

        let user = Self::get_user(env.clone(), account.clone())?;
        if user.role != Role::Patient {
            return Err(ContractError::InvalidInput);
        }

        if patient::health_id_for_account(&env, &account).is_some() {
            return Err(ContractError::PatientExists);
        }

        if date_of_birth.len() == 0 || emergency_contact.len() == 0 || home_address.len() == 0 {
            return Err(ContractError::InvalidInput);
        }

        let health_id = Self::unique_health_id(&env)?;

        let record = patient::Patient {
            health_id: health_id.clone(),
            account: account.clone(),
            date_of_birth,
            sex,
            blood_group,
            emergency_contact,
            home_address,
            nearest_police_station,
            registered_at: env.ledger().timestamp(),
        };
        patient::set_patient(&env, &record);

        events::publish_patient_registered(&env, health_id.clone(), account);

        Ok(health_id)
    }

    /// The caller's own patient record.
    pub fn my_patient_record(env: Env, caller: Address) -> Result<Patient, ContractError> {
        caller.require_auth();
        Self::owned_patient(&env, &caller)
    }

    // ======================== Clinicians ========================

    /// Create the professional profile for a doctor account.
    pub fn register_clinician(
        env: Env,
        caller: Address,
        account: Address,
        license_number: String,
        specialization: Option<String>,
        hospital_affiliation: Option<String>,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        if caller != account && !rbac::has_permission(&env, &caller, &Permission::ManageUsers) {
            return Err(ContractError::Unauthorized);
        }

        let user = Self::get_user(env.clone(), account.clone())?;
        if user.role != Role::Doctor {
            return Err(ContractError::InvalidInput);
        }

        if license_number.len() == 0 {
            return Err(ContractError::InvalidInput);
        }

        let record = clinician::Clinician {
            account: account.clone(),
            license_number: license_number.clone(),
            specialization,
            hospital_affiliation,
            registered_at: env.ledger().timestamp(),
        };
        clinician::set_clinician(&env, &record);

        events::publish_clinician_registered(&env, account, license_number);

        Ok(())
    }

    /// Get a clinician profile
    pub fn get_clinician(env: Env, account: Address) -> Result<Clinician, ContractError> {
        clinician::get_clinician(&env, &account).ok_or(ContractError::UserNotFound)
    }

    // ======================== Access tokens ========================

    /// Issue a temporary access token for the caller's own record.
    /// `ttl_seconds == 0` selects the default two-hour window. Prior tokens
    /// stay live; concurrent sharing windows are legal.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn issue_token(
        env: Env,
        caller: Address,
        ttl_seconds: u64,
    ) -> Result<AccessToken, ContractError> {
        caller.require_auth();

        let record = Self::owned_patient(&env, &caller)?;

        let now = env.ledger().timestamp();
        let ttl = if ttl_seconds == 0 {
            DEFAULT_TOKEN_TTL
        } else {
            ttl_seconds
        };

        let value = Self::unique_token_value(&env, now)?;

        let issued = token::AccessToken {
            id: token::increment_token_counter(&env),
            value,
            patient_id: record.health_id.clone(),
            issued_at: now,
            expires_at: now + ttl,
            active: true,
        };
        token::set_token(&env, &issued);

        events::publish_token_issued(&env, issued.id, record.health_id, issued.expires_at);

        Ok(issued)
    }

    /// Active tokens for the caller's own record, newest first. Expired
    /// tokens with the active flag still set are included; expiry is a
    /// derived property the consumer evaluates.
    pub fn list_active_tokens(env: Env, caller: Address) -> Result<Vec<AccessToken>, ContractError> {
        caller.require_auth();

        let record = Self::owned_patient(&env, &caller)?;

        let ids = token::patient_token_ids(&env, &record.health_id);
        let mut tokens = Vec::new(&env);
        for i in (0..ids.len()).rev() {
            if let Some(id) = ids.get(i) {
                if let Some(tok) = token::get_token(&env, id) {
                    if tok.active {
                        tokens.push_back(tok);
                    }
                }
            }
        }
        Ok(tokens)
    }

    /// Deactivate one of the caller's tokens. Idempotent.
    pub fn deactivate_token(
        env: Env,
        caller: Address,
        token_id: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let record = Self::owned_patient(&env, &caller)?;

        let mut tok = token::get_token(&env, token_id).ok_or(ContractError::TokenNotFound)?;
        if tok.patient_id != record.health_id {
            return Err(ContractError::Unauthorized);
        }

        if tok.active {
            tok.active = false;
            token::set_token(&env, &tok);
            events::publish_token_deactivated(&env, token_id, record.health_id);
        }

        Ok(())
    }

    // ======================== Resolution ========================

    /// Map a search string (permanent health id or live access token) to
    /// the owning patient record.
    pub fn resolve_patient(
        env: Env,
        caller: Address,
        query: String,
    ) -> Result<Patient, ContractError> {
        caller.require_auth();

        if !rbac::has_permission(&env, &caller, &Permission::ResolvePatient) {
            return Err(ContractError::Unauthorized);
        }

        resolver::resolve(&env, &query).ok_or(ContractError::NotFound)
    }

    // ======================== Visits ========================

    /// Append a visit to a patient's ledger, attributed to `clinician`.
    /// A caller other than the clinician needs an active delegation.
    #[allow(clippy::too_many_arguments)]
    pub fn record_visit(
        env: Env,
        caller: Address,
        clinician: Address,
        patient_id: String,
        chief_complaint: String,
        diagnosis: String,
        notes: String,
        transcript: Option<String>,
        critical: bool,
    ) -> Result<u64, ContractError> {
        caller.require_auth();

        let has_perm = if caller == clinician {
            rbac::has_permission(&env, &caller, &Permission::RecordVisit)
        } else {
            rbac::has_delegated_permission(&env, &clinician, &caller, &Permission::RecordVisit)
        };

        if !has_perm && !rbac::has_permission(&env, &caller, &Permission::SystemAdmin) {
            return Err(ContractError::Unauthorized);
        }

        if !patient::has_patient(&env, &patient_id) {
            return Err(ContractError::PatientNotFound);
        }

        if chief_complaint.len() == 0 {
            return Err(ContractError::InvalidInput);
        }

        let recorded = visit::Visit {
            id: visit::increment_visit_counter(&env),
            patient_id: patient_id.clone(),
            clinician: clinician.clone(),
            recorded_at: env.ledger().timestamp(),
            chief_complaint,
            diagnosis,
            notes,
            transcript,
            critical,
        };
        visit::set_visit(&env, &recorded);

        events::publish_visit_recorded(&env, recorded.id, patient_id, clinician, recorded.critical);

        Ok(recorded.id)
    }

    /// Visits for a patient, newest first, capped to `limit` (0 = no cap).
    /// Readable by resolvers (doctor, pharmacist) and the owning patient.
    pub fn list_visits(
        env: Env,
        caller: Address,
        patient_id: String,
        limit: u32,
    ) -> Result<Vec<Visit>, ContractError> {
        caller.require_auth();

        if !Self::can_view_patient(&env, &caller, &patient_id) {
            return Err(ContractError::Unauthorized);
        }

        Ok(visit::list_visits(&env, &patient_id, limit))
    }

    // ======================== Prescriptions ========================

    /// Write a prescription against an existing visit.
    pub fn add_prescription(
        env: Env,
        caller: Address,
        visit_id: u64,
        medications: Vec<Medication>,
        instructions: Option<String>,
    ) -> Result<u64, ContractError> {
        caller.require_auth();

        if !rbac::has_permission(&env, &caller, &Permission::WritePrescription) {
            return Err(ContractError::Unauthorized);
        }

        let parent = visit::get_visit(&env, visit_id).ok_or(ContractError::VisitNotFound)?;

        if medications.is_empty() {
            return Err(ContractError::InvalidInput);
        }

        let written = prescription::Prescription {
            id: prescription::increment_prescription_counter(&env),
            visit_id,
            patient_id: parent.patient_id.clone(),
            prescriber: caller.clone(),
            medications,
            instructions,
            verified: false,
            verified_by: None,
            verified_at: None,
            created_at: env.ledger().timestamp(),
        };
        prescription::set_prescription(&env, &written);

        events::publish_prescription_added(
            &env,
            written.id,
            visit_id,
            parent.patient_id,
            caller,
        );

        Ok(written.id)
    }

    /// Get a prescription by id
    pub fn get_prescription(
        env: Env,
        caller: Address,
        prescription_id: u64,
    ) -> Result<Prescription, ContractError> {
        caller.require_auth();

        let rx = prescription::get_prescription(&env, prescription_id)
            .ok_or(ContractError::PrescriptionNotFound)?;

        if !Self::can_view_patient(&env, &caller, &rx.patient_id) {
            return Err(ContractError::Unauthorized);
        }

        Ok(rx)
    }

    /// Prescriptions for a patient, newest first.
    pub fn list_prescriptions(
        env: Env,
        caller: Address,
        patient_id: String,
    ) -> Result<Vec<Prescription>, ContractError> {
        caller.require_auth();

        if !Self::can_view_patient(&env, &caller, &patient_id) {
            return Err(ContractError::Unauthorized);
        }

        Ok(prescription::list_prescriptions(&env, &patient_id))
    }

    /// Move a prescription from pending to verified, recording the
    /// verifier and timestamp. A second call is a no-op; the first
    /// verifier and timestamp are never clobbered. The host serializes
    /// invocations, so the flag check and write commit atomically.
    pub fn verify_prescription(
        env: Env,
        caller: Address,
        prescription_id: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        if !rbac::has_permission(&env, &caller, &Permission::VerifyPrescription) {
            return Err(ContractError::Unauthorized);
        }

        let mut rx = prescription::get_prescription(&env, prescription_id)
            .ok_or(ContractError::PrescriptionNotFound)?;

        if rx.verified {
            return Ok(());
        }

        rx.verified = true;
        rx.verified_by = Some(caller.clone());
        rx.verified_at = Some(env.ledger().timestamp());
        prescription::set_prescription(&env, &rx);

        events::publish_prescription_verified(&env, prescription_id, caller);

        Ok(())
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }

    // ======================== RBAC Endpoints ========================

    pub fn grant_custom_permission(
        env: Env,
        caller: Address,
        user: Address,
        permission: Permission,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        if !rbac::has_permission(&env, &caller, &Permission::ManageUsers) {
            return Err(ContractError::Unauthorized);
        }
        rbac::grant_custom_permission(&env, user, permission)
            .map_err(|_| ContractError::UserNotFound)?;
        Ok(())
    }

    pub fn revoke_custom_permission(
        env: Env,
        caller: Address,
        user: Address,
        permission: Permission,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        if !rbac::has_permission(&env, &caller, &Permission::ManageUsers) {
            return Err(ContractError::Unauthorized);
        }
        rbac::revoke_custom_permission(&env, user, permission)
            .map_err(|_| ContractError::UserNotFound)?;
        Ok(())
    }

    pub fn delegate_role(
        env: Env,
        delegator: Address,
        delegatee: Address,
        role: Role,
        expires_at: u64,
    ) -> Result<(), ContractError> {
        delegator.require_auth();
        rbac::delegate_role(&env, delegator, delegatee, role, expires_at);
        Ok(())
    }

    pub fn check_permission(env: Env, user: Address, permission: Permission) -> bool {
        rbac::has_permission(&env, &user, &permission)
    }

    // ======================== Internal helpers ========================

    /// Patient record owned by `account`, via the account index.
    fn owned_patient(env: &Env, account: &Address) -> Result<Patient, ContractError> {
        let health_id = patient::health_id_for_account(env, account)
            .ok_or(ContractError::PatientNotFound)?;
        patient::get_patient(env, &health_id).ok_or(ContractError::PatientNotFound)
    }

    /// Whether `caller` may read records under `patient_id`: resolvers
    /// (doctor, pharmacist) and the owning patient.
    fn can_view_patient(env: &Env, caller: &Address, patient_id: &String) -> bool {
        if rbac::has_permission(env, caller, &Permission::ResolvePatient) {
            return true;
        }
        match patient::health_id_for_account(env, caller) {
            Some(own_id) => own_id == *patient_id,
            None => false,
        }
    }

    /// Generate a health id not yet present in the registry.
    fn unique_health_id(env: &Env) -> Result<String, ContractError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = identifier::generate_health_id(env);
            if !patient::has_patient(env, &candidate) {
                return Ok(candidate);
            }
        }
        Err(ContractError::IdCollision)
    }

    /// Generate a token value not held by any live token.
    fn unique_token_value(env: &Env, now: u64) -> Result<String, ContractError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = identifier::generate_token_value(env);
            if !token::value_in_use(env, &candidate, now) {
                return Ok(candidate);
            }
        }
        Err(ContractError::IdCollision)
    }
}
