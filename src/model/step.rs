use std::fmt;

/// One of the three linear screens of the sign-up flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    /// Name, college email and password entry.
    #[default]
    Registration,
    /// Department selection.
    ProfileSetup,
    /// The welcome feed shown to a signed-in student.
    Feed,
}

static ALL_STEPS: &[Step] = &[Step::Registration, Step::ProfileSetup, Step::Feed];

impl Step {
    /// Returns the 1-based position of this step in the flow.
    pub fn number(self) -> u8 {
        match self {
            Self::Registration => 1,
            Self::ProfileSetup => 2,
            Self::Feed => 3,
        }
    }

    /// Human-readable screen name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Registration => "Registration",
            Self::ProfileSetup => "Profile Setup",
            Self::Feed => "Feed",
        }
    }

    /// Returns all steps in flow order.
    pub fn all() -> &'static [Step] {
        ALL_STEPS
    }
}

#[mutants::skip]
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
