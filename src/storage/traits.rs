//! Abstract storage interfaces for pluggable backends
//!
//! The auth core only ever reads through `UserStorage`; the remaining traits
//! back the therapist and appointment endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::user::{CredentialRecord, Principal, UserId, UserRole};
use crate::error::Result;

pub type TherapistId = i64;
pub type AppointmentId = i64;

/// User account row
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl StoredUser {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            is_active: self.is_active,
        }
    }

    pub fn credential(&self) -> CredentialRecord {
        CredentialRecord {
            user_id: self.id,
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

/// Registration payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Therapist profile attached to a therapist-typed user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTherapist {
    pub id: TherapistId,
    pub user_id: UserId,
    pub name: String,
    pub specialization: String,
    pub contact: String,
    pub experience: i32,
}

#[derive(Debug, Clone)]
pub struct NewTherapist {
    pub user_id: UserId,
    pub name: String,
    pub specialization: String,
    pub contact: String,
    pub experience: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAppointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub therapist_id: TherapistId,
    pub scheduled_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: UserId,
    pub therapist_id: TherapistId,
    pub scheduled_time: DateTime<Utc>,
}

/// User data storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Create a new user; fails with `Conflict` if the email is taken
    async fn create_user(&self, user: NewUser) -> Result<StoredUser>;

    /// Exact, case-sensitive email lookup
    async fn find_credential_by_email(&self, email: &str) -> Result<Option<CredentialRecord>>;

    async fn find_principal_by_id(&self, user_id: UserId) -> Result<Option<Principal>>;
}

/// Therapist profile storage interface
#[async_trait]
pub trait TherapistStorage: Send + Sync {
    /// Create a profile; fails with `Conflict` if the user already has one
    async fn create_therapist(&self, therapist: NewTherapist) -> Result<StoredTherapist>;

    async fn list_therapists(&self) -> Result<Vec<StoredTherapist>>;

    async fn get_therapist(&self, therapist_id: TherapistId) -> Result<Option<StoredTherapist>>;

    async fn get_therapist_by_user(&self, user_id: UserId) -> Result<Option<StoredTherapist>>;
}

/// Appointment storage interface
#[async_trait]
pub trait AppointmentStorage: Send + Sync {
    /// Book a new appointment in `Pending` state
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<StoredAppointment>;

    async fn pending_for_therapist(
        &self,
        therapist_id: TherapistId,
    ) -> Result<Vec<StoredAppointment>>;

    /// Confirm an appointment owned by `therapist_id`.
    ///
    /// Returns `None` when the appointment does not exist or belongs to
    /// another therapist.
    async fn confirm_appointment(
        &self,
        appointment_id: AppointmentId,
        therapist_id: TherapistId,
    ) -> Result<Option<StoredAppointment>>;
}

/// Storage provider that combines all storage interfaces
#[async_trait]
pub trait StorageProvider: Send + Sync {
    fn user_storage(&self) -> &dyn UserStorage;

    fn therapist_storage(&self) -> &dyn TherapistStorage;

    fn appointment_storage(&self) -> &dyn AppointmentStorage;

    /// Initialize the storage backend (create tables, etc.)
    async fn initialize(&self) -> Result<()>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<bool>;
}
