//! Reminder settings
//!
//! Stored with the request and handed to the notification collaborator
//! verbatim. The engine never interprets these values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderAudience {
    #[default]
    AllParticipants,
    NonVotersOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    #[default]
    Daily,
    TwiceDaily,
    Hourly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderConfig {
    #[serde(rename = "sendSMS")]
    pub send_sms: bool,
    pub send_email: bool,
    pub send_to: ReminderAudience,
    pub frequency: ReminderFrequency,
    /// Days before the end date at which reminders start
    pub start_before: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            send_sms: false,
            send_email: true,
            send_to: ReminderAudience::default(),
            frequency: ReminderFrequency::default(),
            start_before: 1,
        }
    }
}
