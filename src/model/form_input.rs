use super::department::Department;

/// The text fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    Name,
    Email,
    Password,
}

static ALL_FIELDS: &[RegistrationField] = &[
    RegistrationField::Name,
    RegistrationField::Email,
    RegistrationField::Password,
];

impl RegistrationField {
    /// Returns the fields in on-screen order.
    pub fn all() -> &'static [RegistrationField] {
        ALL_FIELDS
    }

    /// Label shown above the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "College Email ID",
            Self::Password => "Password",
        }
    }
}

/// Everything the student has entered so far.
///
/// Values persist across steps and are not cleared on logout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// The department chosen during profile setup, if any.
    pub section: Option<Department>,
}

impl FormInput {
    /// Returns the current value of a text field.
    pub fn get(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::Name => &self.name,
            RegistrationField::Email => &self.email,
            RegistrationField::Password => &self.password,
        }
    }

    /// Replaces the value of a text field.
    pub fn set(&mut self, field: RegistrationField, value: String) {
        match field {
            RegistrationField::Name => self.name = value,
            RegistrationField::Email => self.email = value,
            RegistrationField::Password => self.password = value,
        }
    }

    /// Name used in the feed greeting; `Student` when no name was entered.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Student"
        } else {
            &self.name
        }
    }

    /// Section label for the feed header; `Campus Resident` when unset.
    pub fn section_label(&self) -> &'static str {
        self.section.map_or("Campus Resident", Department::label)
    }

    /// First character of the name for the avatar; `U` when no name was entered.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('U')
    }
}
