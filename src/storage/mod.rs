//! Storage mechanisms for users, therapist profiles and appointments

pub mod memory;
pub mod traits;

pub use memory::MemoryStorageProvider;
pub use traits::{
    AppointmentId, AppointmentStatus, AppointmentStorage, NewAppointment, NewTherapist, NewUser,
    StorageProvider, StoredAppointment, StoredTherapist, StoredUser, TherapistId,
    TherapistStorage, UserStorage,
};
