use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters handed to the booking view. Absent values read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationParams {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingContext {
    pub provider_name: String,
    pub service_type: String,
    pub provider_phone: Option<String>,
    pub provider_email: Option<String>,
}

impl BookingContext {
    /// Every parameter is trimmed. Name and service default to empty; contact
    /// details that are blank become `None`.
    pub fn from_params(params: &NavigationParams) -> Self {
        fn trimmed(v: &Option<String>) -> Option<String> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            provider_name: trimmed(&params.provider).unwrap_or_default(),
            service_type: trimmed(&params.service).unwrap_or_default(),
            provider_phone: trimmed(&params.phone),
            provider_email: trimmed(&params.email),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub message: String,
    pub provider: String,
    pub service: String,
}

impl BookingForm {
    pub fn seeded(context: &BookingContext) -> Self {
        Self {
            provider: context.provider_name.clone(),
            service: context.service_type.clone(),
            ..Default::default()
        }
    }

    pub fn set(&mut self, field: BookingField, value: String) {
        let slot = match field {
            BookingField::Name => &mut self.name,
            BookingField::Email => &mut self.email,
            BookingField::Phone => &mut self.phone,
            BookingField::Date => &mut self.date,
            BookingField::Time => &mut self.time,
            BookingField::Message => &mut self.message,
        };
        *slot = value;
    }
}

/// Requester-editable fields. Provider and service come from the context only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingField {
    Name,
    Email,
    Phone,
    Date,
    Time,
    Message,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum BookingStage {
    Collecting,
    Submitting,
    Confirmed { receipt: BookingReceipt },
    Returned,
    Cancelled,
}

impl BookingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStage::Collecting => "collecting",
            BookingStage::Submitting => "submitting",
            BookingStage::Confirmed { .. } => "confirmed",
            BookingStage::Returned => "returned",
            BookingStage::Cancelled => "cancelled",
        }
    }

    /// True once the user is back on the discovery view.
    pub fn is_finished(&self) -> bool {
        matches!(self, BookingStage::Returned | BookingStage::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub provider: String,
    pub service: String,
    pub provider_phone: Option<String>,
    pub provider_email: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReceipt {
    pub reference: Uuid,
    pub provider: String,
    pub date: String,
    pub time: String,
    pub confirmed_at: NaiveDateTime,
}
