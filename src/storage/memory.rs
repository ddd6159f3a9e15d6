//! In-memory storage implementation for development and testing
//!
//! Keeps every table in memory behind async read/write locks. Ids are
//! assigned sequentially per table, starting at 1.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::traits::*;
use crate::auth::user::{CredentialRecord, Principal, UserId, UserRole};
use crate::error::{Result, SpectrumError};

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<UserId, StoredUser>,
    by_email: HashMap<String, UserId>,
    next_id: UserId,
}

#[derive(Default)]
struct TherapistTable {
    rows: BTreeMap<TherapistId, StoredTherapist>,
    by_user: HashMap<UserId, TherapistId>,
    next_id: TherapistId,
}

#[derive(Default)]
struct AppointmentTable {
    rows: BTreeMap<AppointmentId, StoredAppointment>,
    next_id: AppointmentId,
}

/// Memory-based storage provider
pub struct MemoryStorageProvider {
    users: RwLock<UserTable>,
    therapists: RwLock<TherapistTable>,
    appointments: RwLock<AppointmentTable>,
}

impl MemoryStorageProvider {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(UserTable::default()),
            therapists: RwLock::new(TherapistTable::default()),
            appointments: RwLock::new(AppointmentTable::default()),
        }
    }

    /// Flip a user's active flag. Returns false if the user does not exist.
    pub async fn set_user_active(&self, user_id: UserId, active: bool) -> bool {
        let mut users = self.users.write().await;
        match users.rows.get_mut(&user_id) {
            Some(user) => {
                user.is_active = active;
                true
            }
            None => false,
        }
    }

    /// Change a user's account type. Returns false if the user does not exist.
    pub async fn set_user_role(&self, user_id: UserId, role: UserRole) -> bool {
        let mut users = self.users.write().await;
        match users.rows.get_mut(&user_id) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn user_storage(&self) -> &dyn UserStorage {
        self
    }

    fn therapist_storage(&self) -> &dyn TherapistStorage {
        self
    }

    fn appointment_storage(&self) -> &dyn AppointmentStorage {
        self
    }

    async fn initialize(&self) -> Result<()> {
        // Nothing to initialize for memory storage
        log::info!("Memory storage provider initialized");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl UserStorage for MemoryStorageProvider {
    async fn create_user(&self, user: NewUser) -> Result<StoredUser> {
        let mut users = self.users.write().await;

        if users.by_email.contains_key(&user.email) {
            return Err(SpectrumError::Conflict("Email already registered".to_string()));
        }

        users.next_id += 1;
        let stored = StoredUser {
            id: users.next_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
        };

        users.by_email.insert(stored.email.clone(), stored.id);
        users.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.rows.get(id))
            .map(StoredUser::credential))
    }

    async fn find_principal_by_id(&self, user_id: UserId) -> Result<Option<Principal>> {
        let users = self.users.read().await;
        Ok(users.rows.get(&user_id).map(StoredUser::principal))
    }
}

#[async_trait]
impl TherapistStorage for MemoryStorageProvider {
    async fn create_therapist(&self, therapist: NewTherapist) -> Result<StoredTherapist> {
        let mut therapists = self.therapists.write().await;

        if therapists.by_user.contains_key(&therapist.user_id) {
            return Err(SpectrumError::Conflict(
                "Therapist profile already exists.".to_string(),
            ));
        }

        therapists.next_id += 1;
        let stored = StoredTherapist {
            id: therapists.next_id,
            user_id: therapist.user_id,
            name: therapist.name,
            specialization: therapist.specialization,
            contact: therapist.contact,
            experience: therapist.experience,
        };

        therapists.by_user.insert(stored.user_id, stored.id);
        therapists.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_therapists(&self) -> Result<Vec<StoredTherapist>> {
        let therapists = self.therapists.read().await;
        Ok(therapists.rows.values().cloned().collect())
    }

    async fn get_therapist(&self, therapist_id: TherapistId) -> Result<Option<StoredTherapist>> {
        let therapists = self.therapists.read().await;
        Ok(therapists.rows.get(&therapist_id).cloned())
    }

    async fn get_therapist_by_user(&self, user_id: UserId) -> Result<Option<StoredTherapist>> {
        let therapists = self.therapists.read().await;
        Ok(therapists
            .by_user
            .get(&user_id)
            .and_then(|id| therapists.rows.get(id))
            .cloned())
    }
}

#[async_trait]
impl AppointmentStorage for MemoryStorageProvider {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<StoredAppointment> {
        let mut appointments = self.appointments.write().await;

        appointments.next_id += 1;
        let stored = StoredAppointment {
            id: appointments.next_id,
            user_id: appointment.user_id,
            therapist_id: appointment.therapist_id,
            scheduled_time: appointment.scheduled_time,
            status: AppointmentStatus::Pending,
        };

        appointments.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn pending_for_therapist(
        &self,
        therapist_id: TherapistId,
    ) -> Result<Vec<StoredAppointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .rows
            .values()
            .filter(|a| a.therapist_id == therapist_id && a.status == AppointmentStatus::Pending)
            .cloned()
            .collect())
    }

    async fn confirm_appointment(
        &self,
        appointment_id: AppointmentId,
        therapist_id: TherapistId,
    ) -> Result<Option<StoredAppointment>> {
        let mut appointments = self.appointments.write().await;
        match appointments.rows.get_mut(&appointment_id) {
            Some(appointment) if appointment.therapist_id == therapist_id => {
                appointment.status = AppointmentStatus::Confirmed;
                Ok(Some(appointment.clone()))
            }
            _ => Ok(None),
        }
    }
}
