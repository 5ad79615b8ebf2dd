//! Ankify Domain Layer
//!
//! Core value types and collaborator seams for turning study text into
//! flashcards. Like every domain crate in this workspace it carries no
//! infrastructure: HTTP, file persistence and prompt wording all live in
//! other crates behind the traits defined in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Fact**: an atomic, self-contained statement pulled out of study text
//! - **Card**: a front/back pair tagged with a [`CardMode`]
//! - **UsageRecord**: monthly card counter checked against a cap
//! - **Subscription**: externally reported billing state gating generation
//! - **RunId**: UUIDv7 tag attached to every generation run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card;
pub mod completion;
pub mod fact;
pub mod run;
pub mod subscription;
pub mod traits;
pub mod usage;

// Re-exports for convenience
pub use card::{normalize_modes, Card, CardMode, CardTemplate};
pub use completion::CompletionRequest;
pub use fact::Fact;
pub use run::RunId;
pub use subscription::{
    normalize_email, InMemorySubscriptions, SubscriptionRecord, SubscriptionStatus,
};
pub use traits::DeckArtifact;
pub use usage::{UsageRecord, USAGE_SCHEMA_VERSION};
