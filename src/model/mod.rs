pub mod company;
pub mod contact;
pub mod ids;
pub mod interaction;
pub mod relationship;

pub use company::Company;
pub use contact::Contact;
pub use ids::Id;
pub use interaction::Interaction;
pub use relationship::{LeadStage, Relationship, RelationshipType, Response, StageOutcome};

pub use company::{COMPANY_SECTORS, COMPANY_STAGES, COMPANY_TYPES};
pub use interaction::{INTERACTION_KINDS, MAINTENANCE_KIND};
