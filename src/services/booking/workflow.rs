use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{
    BookingContext, BookingField, BookingForm, BookingReceipt, BookingRequest, BookingStage,
    NavigationParams,
};
use crate::services::scheduling::{self, DateChoice};

/// Booking state machine for one provider.
///
/// `Collecting -> Submitting -> Confirmed -> Returned`, or `Collecting -> Cancelled`.
/// A rejected submission goes back to `Collecting` with `submit_error` set.
#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    context: BookingContext,
    form: BookingForm,
    stage: BookingStage,
    dates: Vec<DateChoice>,
    slots: Vec<String>,
    submit_error: Option<String>,
    history: Vec<&'static str>,
}

impl BookingWorkflow {
    pub fn enter(params: &NavigationParams, today: NaiveDate) -> Self {
        let context = BookingContext::from_params(params);
        let form = BookingForm::seeded(&context);
        Self {
            context,
            form,
            stage: BookingStage::Collecting,
            dates: scheduling::date_choices(today),
            slots: scheduling::time_slots(),
            submit_error: None,
            history: vec![BookingStage::Collecting.as_str()],
        }
    }

    pub fn context(&self) -> &BookingContext {
        &self.context
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn stage(&self) -> &BookingStage {
        &self.stage
    }

    pub fn dates(&self) -> &[DateChoice] {
        &self.dates
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Every stage entered so far, oldest first.
    pub fn history(&self) -> &[&'static str] {
        &self.history
    }

    pub fn update(&mut self, field: BookingField, value: String) -> Result<(), AppError> {
        self.require_collecting("edit the form")?;
        self.form.set(field, value);
        Ok(())
    }

    /// Checks each field's own constraint and builds the request to submit.
    pub fn validate(&self) -> Result<BookingRequest, AppError> {
        let form = &self.form;
        let required = [
            (form.name.trim(), "Please enter your name"),
            (form.email.trim(), "Please enter your email address"),
            (form.phone.trim(), "Please enter your phone number"),
        ];
        for (value, msg) in required {
            if value.is_empty() {
                return Err(AppError::Validation(msg.to_string()));
            }
        }
        if !is_email(form.email.trim()) {
            return Err(AppError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        if !self.dates.iter().any(|d| d.value == form.date) {
            return Err(AppError::Validation("Please select a date".to_string()));
        }
        if !self.slots.iter().any(|s| *s == form.time) {
            return Err(AppError::Validation("Please select a time".to_string()));
        }

        let message = form.message.trim();
        Ok(BookingRequest {
            provider: form.provider.clone(),
            service: form.service.clone(),
            provider_phone: self.context.provider_phone.clone(),
            provider_email: self.context.provider_email.clone(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            date: form.date.clone(),
            time: form.time.clone(),
            message: (!message.is_empty()).then(|| message.to_string()),
        })
    }

    pub fn begin_submit(&mut self) -> Result<BookingRequest, AppError> {
        self.require_collecting("submit")?;
        let request = self.validate()?;
        self.submit_error = None;
        self.transition(BookingStage::Submitting);
        Ok(request)
    }

    pub fn finish_submit(
        &mut self,
        outcome: Result<BookingReceipt, AppError>,
    ) -> Result<(), AppError> {
        if self.stage != BookingStage::Submitting {
            return Err(self.invalid("complete a submission"));
        }
        match outcome {
            Ok(receipt) => self.transition(BookingStage::Confirmed { receipt }),
            Err(e) => {
                self.submit_error = Some(e.to_string());
                self.transition(BookingStage::Collecting);
            }
        }
        Ok(())
    }

    pub fn return_to_discovery(&mut self) -> Result<(), AppError> {
        if !matches!(self.stage, BookingStage::Confirmed { .. }) {
            return Err(self.invalid("return to discovery"));
        }
        self.transition(BookingStage::Returned);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), AppError> {
        self.require_collecting("cancel")?;
        self.form = BookingForm::seeded(&self.context);
        self.submit_error = None;
        self.transition(BookingStage::Cancelled);
        Ok(())
    }

    fn transition(&mut self, next: BookingStage) {
        tracing::debug!(from = self.stage.as_str(), to = next.as_str(), "booking transition");
        self.history.push(next.as_str());
        self.stage = next;
    }

    fn require_collecting(&self, action: &'static str) -> Result<(), AppError> {
        if self.stage == BookingStage::Collecting {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            from: self.stage.as_str(),
            action,
        }
    }
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
