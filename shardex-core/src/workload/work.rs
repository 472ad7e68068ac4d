/// Index works exchanged between the workload generator, the engine under test and the ledger.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifying key of an indexed document
pub type DocumentId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    Add,
    Update,
    Delete,
}

impl WorkType {
    pub const ALL: [WorkType; 3] = [WorkType::Add, WorkType::Update, WorkType::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Add => "ADD",
            WorkType::Update => "UPDATE",
            WorkType::Delete => "DELETE",
        }
    }

    /// Update and Delete must reference a previously added id.
    pub fn requires_existing(&self) -> bool {
        !matches!(self, WorkType::Add)
    }
}

const QUOTES: &[&str] = &[
    "Simplicity is prerequisite for reliability.",
    "Premature optimization is the root of all evil.",
    "Make it work, make it right, make it fast.",
    "There are only two hard things in computer science.",
    "Talk is cheap. Show me the code.",
    "Programs must be written for people to read.",
    "The best way to predict the future is to invent it.",
    "Testing shows the presence, not the absence of bugs.",
    "Any sufficiently advanced technology is indistinguishable from magic.",
    "Code never lies, comments sometimes do.",
];

/// Document payload carried by every work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: DocumentId,
    pub text: String,
}

impl Quote {
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Quote with random text for `id`
    pub fn random<R: Rng + ?Sized>(id: DocumentId, rng: &mut R) -> Self {
        let text = QUOTES.choose(rng).copied().unwrap_or(QUOTES[0]);
        Self::new(id, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub work_type: WorkType,
    pub id: DocumentId,
    pub payload: Quote,
}

impl Work {
    pub fn add(payload: Quote) -> Self {
        Self {
            work_type: WorkType::Add,
            id: payload.id,
            payload,
        }
    }

    pub fn update(payload: Quote) -> Self {
        Self {
            work_type: WorkType::Update,
            id: payload.id,
            payload,
        }
    }

    pub fn delete(payload: Quote) -> Self {
        Self {
            work_type: WorkType::Delete,
            id: payload.id,
            payload,
        }
    }

    /// Routing key of the work
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }
}

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Work{{{} id={}}}", self.work_type.as_str(), self.id)
    }
}
