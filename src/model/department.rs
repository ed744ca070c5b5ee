use std::fmt;

/// A department a student can join during profile setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    BTechCs,
    Mechanical,
    BCom,
    Medical,
}

static ALL_DEPARTMENTS: &[Department] = &[
    Department::BTechCs,
    Department::Mechanical,
    Department::BCom,
    Department::Medical,
];

impl Department {
    /// Returns the display label, e.g. `B.Tech CS`.
    pub fn label(self) -> &'static str {
        match self {
            Self::BTechCs => "B.Tech CS",
            Self::Mechanical => "Mechanical",
            Self::BCom => "B.Com",
            Self::Medical => "Medical",
        }
    }

    /// Returns the selectable departments in display order.
    pub fn all() -> &'static [Department] {
        ALL_DEPARTMENTS
    }
}

#[mutants::skip]
impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
