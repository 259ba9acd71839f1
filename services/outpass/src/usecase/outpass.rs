use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use outpass_domain::outpass::{Decision, OutpassStatus};

use crate::domain::repository::{OutpassRepository, UserRepository};
use crate::domain::types::{
    Outpass, OutpassWithStaff, OutpassWithStudent, RawInstant, User, UserBrief,
};
use crate::error::OutpassServiceError;

async fn users_by_id<U: UserRepository>(
    users: &U,
    mut ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, User>, OutpassServiceError> {
    ids.sort_unstable();
    ids.dedup();
    let found = users.find_many(&ids).await?;
    Ok(found.into_iter().map(|u| (u.id, u)).collect())
}

async fn join_students<U: UserRepository>(
    users: &U,
    outpasses: Vec<Outpass>,
) -> Result<Vec<OutpassWithStudent>, OutpassServiceError> {
    let by_id = users_by_id(users, outpasses.iter().map(|o| o.student_id).collect()).await?;
    Ok(outpasses
        .into_iter()
        .map(|outpass| OutpassWithStudent {
            student: by_id.get(&outpass.student_id).map(UserBrief::from),
            outpass,
        })
        .collect())
}

/// Resolve the error for a compare-and-set that did not land: re-read the
/// row and re-run the transition check against what is stored now.
async fn lost_race<R, F>(
    repo: &R,
    id: Uuid,
    check: F,
    fallback: OutpassServiceError,
) -> OutpassServiceError
where
    R: OutpassRepository,
    F: FnOnce(&Outpass) -> Result<(), OutpassServiceError>,
{
    match repo.find_by_id(id).await {
        Ok(None) => OutpassServiceError::OutpassNotFound,
        Ok(Some(current)) => check(&current).err().unwrap_or(fallback),
        Err(e) => e,
    }
}

// ── RequestOutpass ───────────────────────────────────────────────────────────

pub struct RequestOutpassInput {
    pub reason: Option<String>,
    pub out_time: Option<RawInstant>,
    pub in_time: Option<RawInstant>,
}

pub struct RequestOutpassUseCase<R: OutpassRepository> {
    pub repo: R,
}

impl<R: OutpassRepository> RequestOutpassUseCase<R> {
    pub async fn execute(
        &self,
        student_id: Uuid,
        input: RequestOutpassInput,
    ) -> Result<Outpass, OutpassServiceError> {
        let (Some(reason), Some(out_time), Some(in_time)) = (
            input.reason.filter(|r| !r.trim().is_empty()),
            input.out_time.filter(|t| !t.is_blank()),
            input.in_time.filter(|t| !t.is_blank()),
        ) else {
            return Err(OutpassServiceError::MissingFields);
        };
        let out_time = out_time.to_instant()?;
        let in_time = in_time.to_instant()?;

        if self.repo.has_pending(student_id).await? {
            return Err(OutpassServiceError::DuplicatePending);
        }

        let outpass = Outpass::new_request(
            student_id,
            reason.trim().to_owned(),
            out_time,
            in_time,
            Utc::now(),
        );
        self.repo.create(&outpass).await?;
        tracing::info!(outpass_id = %outpass.id, %student_id, "outpass requested");
        Ok(outpass)
    }
}

// ── ListPending ──────────────────────────────────────────────────────────────

pub struct ListPendingUseCase<R: OutpassRepository, U: UserRepository> {
    pub repo: R,
    pub users: U,
}

impl<R: OutpassRepository, U: UserRepository> ListPendingUseCase<R, U> {
    pub async fn execute(&self) -> Result<Vec<OutpassWithStudent>, OutpassServiceError> {
        let pending = self.repo.list_by_status(OutpassStatus::Pending).await?;
        join_students(&self.users, pending).await
    }
}

// ── Decide ───────────────────────────────────────────────────────────────────

pub struct DecideUseCase<R: OutpassRepository> {
    pub repo: R,
}

impl<R: OutpassRepository> DecideUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        decision: Decision,
        staff_id: Uuid,
    ) -> Result<Outpass, OutpassServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(OutpassServiceError::OutpassNotFound)?;
        let now = Utc::now();
        let decided = current.decide(decision, staff_id, now)?;

        if !self.repo.save_decision(&decided).await? {
            return Err(lost_race(
                &self.repo,
                id,
                |op| op.decide(decision, staff_id, now).map(drop),
                OutpassServiceError::AlreadyProcessed,
            )
            .await);
        }
        tracing::info!(
            outpass_id = %id,
            %staff_id,
            status = %decided.status,
            "outpass decided"
        );
        Ok(decided)
    }
}

// ── DecideAll ────────────────────────────────────────────────────────────────

pub struct DecideAllUseCase<R: OutpassRepository> {
    pub repo: R,
}

impl<R: OutpassRepository> DecideAllUseCase<R> {
    /// Apply `decision` to every outpass pending when the update runs.
    pub async fn execute(
        &self,
        decision: Decision,
        staff_id: Uuid,
    ) -> Result<u64, OutpassServiceError> {
        let status = decision.target_status();
        let count = self
            .repo
            .decide_all_pending(status, staff_id, Utc::now())
            .await?;
        tracing::info!(%staff_id, %status, count, "pending outpasses decided in bulk");
        Ok(count)
    }
}

// ── CancelOutpass ────────────────────────────────────────────────────────────

pub struct CancelOutpassUseCase<R: OutpassRepository> {
    pub repo: R,
}

impl<R: OutpassRepository> CancelOutpassUseCase<R> {
    pub async fn execute(&self, id: Uuid, student_id: Uuid) -> Result<(), OutpassServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(OutpassServiceError::OutpassNotFound)?;
        current.ensure_cancellable_by(student_id)?;

        if !self.repo.delete_pending(id, student_id).await? {
            return Err(lost_race(
                &self.repo,
                id,
                |op| op.ensure_cancellable_by(student_id),
                OutpassServiceError::NotPending,
            )
            .await);
        }
        tracing::info!(outpass_id = %id, %student_id, "outpass cancelled");
        Ok(())
    }
}

// ── MarkReached ──────────────────────────────────────────────────────────────

pub struct MarkReachedUseCase<R: OutpassRepository> {
    pub repo: R,
}

impl<R: OutpassRepository> MarkReachedUseCase<R> {
    pub async fn execute(&self, id: Uuid, student_id: Uuid) -> Result<Outpass, OutpassServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(OutpassServiceError::OutpassNotFound)?;
        let now = Utc::now();
        let reached = current.mark_reached(student_id, now)?;

        if !self.repo.save_reached(&reached).await? {
            return Err(lost_race(
                &self.repo,
                id,
                |op| op.mark_reached(student_id, now).map(drop),
                OutpassServiceError::AlreadyReached,
            )
            .await);
        }
        tracing::info!(
            outpass_id = %id,
            %student_id,
            delay_minutes = reached.delay_minutes,
            "outpass return recorded"
        );
        Ok(reached)
    }
}

// ── ListMine ─────────────────────────────────────────────────────────────────

pub struct ListMineUseCase<R: OutpassRepository, U: UserRepository> {
    pub repo: R,
    pub users: U,
}

impl<R: OutpassRepository, U: UserRepository> ListMineUseCase<R, U> {
    pub async fn execute(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<OutpassWithStaff>, OutpassServiceError> {
        let mine = self.repo.list_by_student(student_id).await?;
        let staff_by_id =
            users_by_id(&self.users, mine.iter().filter_map(|o| o.staff_id).collect()).await?;
        Ok(mine
            .into_iter()
            .map(|outpass| OutpassWithStaff {
                staff_name: outpass
                    .staff_id
                    .and_then(|id| staff_by_id.get(&id))
                    .map(|u| u.name.clone()),
                outpass,
            })
            .collect())
    }
}

// ── CountPending ─────────────────────────────────────────────────────────────

pub struct CountPendingUseCase<R: OutpassRepository> {
    pub repo: R,
}

impl<R: OutpassRepository> CountPendingUseCase<R> {
    pub async fn execute(&self) -> Result<u64, OutpassServiceError> {
        self.repo.count_by_status(OutpassStatus::Pending).await
    }
}

// ── ListDelayed ──────────────────────────────────────────────────────────────

pub struct ListDelayedUseCase<R: OutpassRepository, U: UserRepository> {
    pub repo: R,
    pub users: U,
}

impl<R: OutpassRepository, U: UserRepository> ListDelayedUseCase<R, U> {
    /// Every checked-in outpass, latest return first, with student contact.
    pub async fn execute(&self) -> Result<Vec<OutpassWithStudent>, OutpassServiceError> {
        let reached = self.repo.list_reached().await?;
        join_students(&self.users, reached).await
    }
}
