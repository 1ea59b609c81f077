use super::Related;

/// The state of one relation on a model instance.
///
/// A slot starts unresolved, caches the value once loaded, becomes dirty
/// when a new value is assigned and persisted once the owner is saved.
#[derive(Debug, Clone, Default)]
pub enum Slot {
    /// Never loaded nor assigned. Saving leaves the relation untouched.
    #[default]
    Unresolved,

    /// Loaded from storage
    Resolved(Related),

    /// Assigned, not yet saved
    Dirty(Related),

    /// Written by the last save
    Persisted(Related),
}

impl Slot {
    /// The cached or assigned value.
    pub fn value(&self) -> Option<&Related> {
        match self {
            Slot::Unresolved => None,
            Slot::Resolved(value) | Slot::Dirty(value) | Slot::Persisted(value) => Some(value),
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut Related> {
        match self {
            Slot::Unresolved => None,
            Slot::Resolved(value) | Slot::Dirty(value) | Slot::Persisted(value) => Some(value),
        }
    }

    pub(crate) fn into_value(self) -> Option<Related> {
        match self {
            Slot::Unresolved => None,
            Slot::Resolved(value) | Slot::Dirty(value) | Slot::Persisted(value) => Some(value),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Slot::Unresolved)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(_))
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Slot::Dirty(_))
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Slot::Persisted(_))
    }

    pub(crate) fn into_persisted(self) -> Slot {
        match self {
            Slot::Unresolved => Slot::Unresolved,
            Slot::Resolved(value) | Slot::Dirty(value) | Slot::Persisted(value) => {
                Slot::Persisted(value)
            }
        }
    }

    /// Name of the state, used for logging.
    pub fn state(&self) -> &'static str {
        match self {
            Slot::Unresolved => "unresolved",
            Slot::Resolved(_) => "resolved",
            Slot::Dirty(_) => "dirty",
            Slot::Persisted(_) => "persisted",
        }
    }
}
