use std::collections::HashMap;

use crate::domain::repository::{OutpassRepository, UserRepository};
use crate::domain::types::{UserBrief, dedup_first_seen};
use crate::error::OutpassServiceError;

// ── ListDistinctStudents ─────────────────────────────────────────────────────

/// Every student who has ever requested an outpass, once each, in the order
/// their first outpass appears in the scan. Recomputed on every call.
pub struct ListDistinctStudentsUseCase<R: OutpassRepository, U: UserRepository> {
    pub repo: R,
    pub users: U,
}

impl<R: OutpassRepository, U: UserRepository> ListDistinctStudentsUseCase<R, U> {
    pub async fn execute(&self) -> Result<Vec<UserBrief>, OutpassServiceError> {
        let ids = dedup_first_seen(self.repo.list_student_ids().await?);
        let mut by_id: HashMap<_, _> = self
            .users
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        // Outpasses whose student account is gone are skipped.
        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|u| UserBrief::from(&u))
            .collect())
    }
}
