//! Hobby catalog offered during onboarding.

/// A selectable hobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    pub id: &'static str,
    pub label: &'static str,
}

pub const CATALOG: &[Interest] = &[
    Interest { id: "1", label: "Cars" },
    Interest { id: "2", label: "Music" },
    Interest { id: "3", label: "Running" },
    Interest { id: "4", label: "Traveling" },
    Interest { id: "5", label: "Reading" },
    Interest { id: "6", label: "Swimming" },
    Interest { id: "7", label: "Cycling" },
    Interest { id: "8", label: "Writing" },
    Interest { id: "9", label: "Art" },
    Interest { id: "10", label: "Animals" },
    Interest { id: "11", label: "Cooking" },
    Interest { id: "12", label: "Photo" },
    Interest { id: "13", label: "Gaming" },
    Interest { id: "14", label: "Dancing" },
    Interest { id: "15", label: "Hiking" },
];

/// Case-insensitive lookup by label.
pub fn find_by_label(label: &str) -> Option<&'static Interest> {
    CATALOG
        .iter()
        .find(|interest| interest.label.eq_ignore_ascii_case(label))
}
