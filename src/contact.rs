//! The contact form. Submissions never leave the page: a valid submit shows an
//! acknowledgement for a few seconds, then the form clears itself.

use crate::error::SiteError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    /// Only checks that every field is filled in.
    pub fn validate(&self) -> Result<(), SiteError> {
        for (label, value) in [("name", &self.name), ("email", &self.email), ("message", &self.message)] {
            if value.trim().is_empty() {
                return Err(SiteError::MissingField(label));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Editing,
    Acknowledged { until_ms: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    fields: ContactFields,
    state: FormState,
    ack_ms: f64,
}

impl ContactForm {
    pub fn new(ack_ms: f64) -> Self {
        Self {
            fields: ContactFields::default(),
            state: FormState::Editing,
            ack_ms,
        }
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self.state, FormState::Acknowledged { .. })
    }

    /// Accepts the submitted values. A second submit during the
    /// acknowledgement is ignored.
    pub fn submit(&mut self, fields: ContactFields, now_ms: f64) -> Result<(), SiteError> {
        if self.is_acknowledged() {
            return Ok(());
        }
        fields.validate()?;
        log::info!("contact form submitted by {:?}", fields.name.trim());
        self.fields = fields;
        self.state = FormState::Acknowledged {
            until_ms: now_ms + self.ack_ms,
        };
        Ok(())
    }

    /// Ends the acknowledgement once it has run its course. Returns `true` when
    /// the form was just cleared.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.state {
            FormState::Acknowledged { until_ms } if now_ms >= until_ms => {
                self.fields = ContactFields::default();
                self.state = FormState::Editing;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactFields {
        ContactFields {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Let's build a thing.".into(),
        }
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut form = ContactForm::new(3000.0);
        let fields = ContactFields {
            email: "   ".into(),
            ..filled()
        };
        assert_eq!(form.submit(fields, 0.0), Err(SiteError::MissingField("email")));
        assert_eq!(form.state(), FormState::Editing);
    }

    #[test]
    fn acknowledgement_lasts_then_clears() {
        let mut form = ContactForm::new(3000.0);
        form.submit(filled(), 1000.0).unwrap();
        assert!(form.is_acknowledged());
        assert!(!form.tick(3999.0));
        assert_eq!(form.fields(), &filled());
        assert!(form.tick(4000.0));
        assert_eq!(form.fields(), &ContactFields::default());
        assert!(!form.tick(9000.0));
    }

    #[test]
    fn resubmitting_during_acknowledgement_is_ignored() {
        let mut form = ContactForm::new(3000.0);
        form.submit(filled(), 0.0).unwrap();
        form.submit(ContactFields::default(), 500.0).unwrap();
        assert_eq!(form.state(), FormState::Acknowledged { until_ms: 3000.0 });
    }
}
