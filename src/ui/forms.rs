use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::ContactDetails;
use crate::planner::FieldError;

/// Fields available within the contact form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum ContactField {
    #[default]
    CoupleNames,
    WeddingDate,
    Email,
    Phone,
    Notes,
}

impl ContactField {
    pub(crate) const ALL: [ContactField; 5] = [
        ContactField::CoupleNames,
        ContactField::WeddingDate,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Notes,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            ContactField::CoupleNames => "Couple names",
            ContactField::WeddingDate => "Wedding date",
            ContactField::Email => "Email",
            ContactField::Phone => "Phone",
            ContactField::Notes => "Notes",
        }
    }

    /// Wire key reported by validation, used to map errors back to fields.
    fn key(self) -> &'static str {
        match self {
            ContactField::CoupleNames => "coupleNames",
            ContactField::WeddingDate => "weddingDate",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Notes => "notes",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            ContactField::WeddingDate => "<YYYY-MM-DD>",
            ContactField::Notes => "<optional>",
            _ => "<required>",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|field| *field == self).unwrap_or(0)
    }
}

/// Form state for the "send to choir" contact details.
#[derive(Default, Clone, Debug)]
pub(crate) struct ContactForm {
    pub(crate) details: ContactDetails,
    pub(crate) active: ContactField,
    pub(crate) errors: Vec<FieldError>,
}

impl ContactForm {
    /// Reopen the form with whatever was typed last time.
    pub(crate) fn from_details(details: ContactDetails) -> Self {
        Self {
            details,
            ..Self::default()
        }
    }

    pub(crate) fn next_field(&mut self) {
        let next = (self.active.index() + 1) % ContactField::ALL.len();
        self.active = ContactField::ALL[next];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = ContactField::ALL.len();
        let previous = (self.active.index() + len - 1) % len;
        self.active = ContactField::ALL[previous];
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            ContactField::CoupleNames => self.details.couple_names.push(ch),
            ContactField::WeddingDate => self.details.wedding_date.push(ch),
            ContactField::Email => self.details.email.push(ch),
            ContactField::Phone => self.details.phone.push(ch),
            ContactField::Notes => self.details.notes.get_or_insert_with(String::new).push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            ContactField::CoupleNames => {
                self.details.couple_names.pop();
            }
            ContactField::WeddingDate => {
                self.details.wedding_date.pop();
            }
            ContactField::Email => {
                self.details.email.pop();
            }
            ContactField::Phone => {
                self.details.phone.pop();
            }
            ContactField::Notes => {
                if let Some(notes) = self.details.notes.as_mut() {
                    notes.pop();
                }
            }
        }
    }

    /// Validate what was typed. On success the trimmed details come back and
    /// the error list is cleared; otherwise focus jumps to the first bad field.
    pub(crate) fn submit(&mut self) -> Option<ContactDetails> {
        self.errors = self.details.validate();
        match self.errors.first() {
            None => Some(self.details.normalized()),
            Some(first) => {
                if let Some(field) = ContactField::ALL.iter().find(|f| f.key() == first.field) {
                    self.active = *field;
                }
                None
            }
        }
    }

    pub(crate) fn error_for(&self, field: ContactField) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field.key())
    }

    pub(crate) fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::CoupleNames => &self.details.couple_names,
            ContactField::WeddingDate => &self.details.wedding_date,
            ContactField::Email => &self.details.email,
            ContactField::Phone => &self.details.phone,
            ContactField::Notes => self.details.notes.as_deref().unwrap_or(""),
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: ContactField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::raw(format!("{:<13}", format!("{}:", field.label()))),
            Span::styled(display, style),
        ];
        if let Some(error) = self.error_for(field) {
            spans.push(Span::styled(
                format!("  {}", error.message),
                Style::default().fg(Color::Red),
            ));
        }
        Line::from(spans)
    }

    /// Column of the text cursor for the active field, relative to the label.
    pub(crate) fn cursor_offset(&self) -> u16 {
        13 + self.value(self.active).chars().count() as u16
    }
}
