//! Release workflow domain model

pub mod actor;
pub mod release;
pub mod step;
pub mod track;

pub use actor::{Actor, ArtistLibraryEntry, Role, SocialLinks, UserProfile, WriterLibraryEntry};
pub use release::{
    Confirmations, DocumentRef, Monetization, Release, ReleaseForm, ReleaseTiming, ReleaseType,
    TerritoryPolicy,
};
pub use step::WizardStep;
pub use track::{
    is_blank, AiUsage, ArtistRole, CompositionType, CopyrightType, ReleaseArtist, Track,
    TrackWriter, WriterRole,
};
