//! Events carried between the clock tasks, and the bounded queues that carry them.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

/// Capacity of the [`EventChannel`].
pub const EVENT_QUEUE_CAPACITY: usize = 8;
/// Capacity of the [`AlarmChannel`].
pub const ALARM_QUEUE_CAPACITY: usize = 4;

/// A user action, one per button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    SetTime,
    SetAlarm,
    Accept,
    Cancel,
    Increment,
    Decrement,
}

/// Requests for the alarm task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmEvent {
    /// Compare the time with the alarm and start sounding on a new match.
    Check,
    /// Start sounding regardless of the time.
    Activate,
    /// Stop sounding.
    Deactivate,
}

/// Channel type for [`Event`]s going to the controller task.
pub type EventChannel = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_CAPACITY>;

/// Channel type for [`AlarmEvent`]s going to the alarm task.
pub type AlarmChannel = Channel<CriticalSectionRawMutex, AlarmEvent, ALARM_QUEUE_CAPACITY>;

/// Queues `event` without waiting. Returns `false` (and logs) if the queue was full and the event
/// was dropped.
pub fn send_event(channel: &EventChannel, event: Event) -> bool {
    let sent = channel.try_send(event).is_ok();
    #[cfg(feature = "defmt")]
    if !sent {
        defmt::warn!("Event queue full, dropping {:?}", event);
    }
    sent
}

/// Queues `event` without waiting. Returns `false` (and logs) if the queue was full and the event
/// was dropped.
pub fn send_alarm_event(channel: &AlarmChannel, event: AlarmEvent) -> bool {
    let sent = channel.try_send(event).is_ok();
    #[cfg(feature = "defmt")]
    if !sent {
        defmt::warn!("Alarm queue full, dropping {:?}", event);
    }
    sent
}
