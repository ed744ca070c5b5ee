mod department;
mod form_input;
mod session;
mod step;
mod validation;

pub use department::Department;
pub use form_input::{FormInput, RegistrationField};
pub use session::Session;
pub use step::Step;
pub use validation::{
    ALLOWED_EMAIL_SUFFIXES, ValidationError, is_college_email, validate_registration,
};
