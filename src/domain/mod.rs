pub mod appointment;
pub mod blackout;
pub mod client;
pub mod event;
pub mod master;
pub mod price;
pub mod reminder;
pub mod service;

pub use appointment::{Appointment, AppointmentStatus};
pub use blackout::Blackout;
pub use client::{Client, ClientStatus};
pub use event::{ActorKind, Event, EventType};
pub use master::Master;
pub use price::Price;
pub use reminder::{Reminder, ReminderKind, ReminderStatus};
pub use service::Service;
