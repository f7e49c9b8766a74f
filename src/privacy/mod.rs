pub mod classifier;
pub mod contact;
pub mod entities;
pub mod lexicon;
pub mod names;
pub mod redactor;
pub mod segments;
pub mod shuffle;
pub mod values;

pub use classifier::EntityClassifier;
pub use entities::KnownEntityTable;
pub use names::{IdentityKind, IdentityToken, NamePool, UsedTokens};
pub use redactor::TextRedactor;
pub use shuffle::ShuffleRegistry;
