mod create;
mod load;
mod membership;

pub use create::CreateCommunity;
pub use load::LoadCommunities;
pub use membership::{CommunityActionError, CommunityMembership, MembershipChange};
