//! Organisation (ERG) members and their tribal affiliation.

use serde::{Deserialize, Serialize};

/// Input for [`TribalStore::add_member`](crate::store::TribalStore::add_member).
///
/// `tribe_name` is a fragment matched case-insensitively against each
/// tribe's full and short names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
  pub name:       String,
  pub tribe_name: String,
  pub notes:      Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub member_id: i64,
  pub name:      String,
  pub tribe_id:  i64,
  pub notes:     Option<String>,
}
