use chrono::{Duration, Utc};
use uuid::Uuid;

use outpass_service::error::OutpassServiceError;
use outpass_service::usecase::notification::{
    DeleteNotificationUseCase, EditNotificationInput, EditNotificationUseCase,
    ListActiveNotificationsUseCase, ListMyNotificationsUseCase,
    PurgeExpiredNotificationsUseCase, SendNotificationInput, SendNotificationUseCase,
};

use crate::helpers::{MockNotificationRepo, StaleReadNotificationRepo, test_notification};

fn ttl() -> Duration {
    Duration::hours(12)
}

// ── Send ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_send_notification_expiring_after_ttl() {
    let repo = MockNotificationRepo::default();
    let staff_id = Uuid::new_v4();

    let sent = SendNotificationUseCase {
        repo: repo.clone(),
        ttl: ttl(),
    }
    .execute(
        staff_id,
        SendNotificationInput {
            title: Some("Holiday".to_owned()),
            message: Some("Campus closed Friday".to_owned()),
        },
    )
    .await
    .unwrap();

    assert_eq!(sent.created_by, staff_id);
    assert_eq!(sent.expires_at - sent.created_at, ttl());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn should_require_title_and_message() {
    let uc = SendNotificationUseCase {
        repo: MockNotificationRepo::default(),
        ttl: ttl(),
    };
    let err = uc
        .execute(
            Uuid::new_v4(),
            SendNotificationInput {
                title: Some("Holiday".to_owned()),
                message: Some(String::new()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OutpassServiceError::MissingFields));
}

// ── Edit ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_edit_only_supplied_fields() {
    let staff_id = Uuid::new_v4();
    let n = test_notification(staff_id, Duration::hours(1), ttl());
    let repo = MockNotificationRepo::new(vec![n.clone()]);

    let edited = EditNotificationUseCase { repo: repo.clone() }
        .execute(
            n.id,
            staff_id,
            EditNotificationInput {
                title: None,
                message: Some("Gates close at 10pm".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.title, n.title);
    assert_eq!(edited.message, "Gates close at 10pm");
    let mine = ListMyNotificationsUseCase { repo }
        .execute(staff_id)
        .await
        .unwrap();
    assert_eq!(mine[0].message, "Gates close at 10pm");
}

#[tokio::test]
async fn should_forbid_editing_another_staff_members_notification() {
    let n = test_notification(Uuid::new_v4(), Duration::hours(1), ttl());
    let err = EditNotificationUseCase {
        repo: MockNotificationRepo::new(vec![n.clone()]),
    }
    .execute(
        n.id,
        Uuid::new_v4(),
        EditNotificationInput {
            title: Some("Hijacked".to_owned()),
            message: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OutpassServiceError::Forbidden));
}

#[tokio::test]
async fn should_refuse_editing_expired_notification() {
    let staff_id = Uuid::new_v4();
    let n = test_notification(staff_id, Duration::hours(13), ttl());
    let err = EditNotificationUseCase {
        repo: MockNotificationRepo::new(vec![n.clone()]),
    }
    .execute(
        n.id,
        staff_id,
        EditNotificationInput {
            title: Some("Late edit".to_owned()),
            message: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OutpassServiceError::NotificationExpired));
}

#[tokio::test]
async fn should_return_not_found_when_editing_unknown_notification() {
    let err = EditNotificationUseCase {
        repo: MockNotificationRepo::default(),
    }
    .execute(
        Uuid::new_v4(),
        Uuid::new_v4(),
        EditNotificationInput {
            title: None,
            message: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OutpassServiceError::NotificationNotFound));
}

#[tokio::test]
async fn should_return_not_found_when_notification_is_purged_mid_edit() {
    let staff_id = Uuid::new_v4();
    let n = test_notification(staff_id, Duration::hours(1), ttl());
    let uc = EditNotificationUseCase {
        repo: StaleReadNotificationRepo::new(MockNotificationRepo::default(), n.clone()),
    };
    let err = uc
        .execute(
            n.id,
            staff_id,
            EditNotificationInput {
                title: Some("Updated".to_owned()),
                message: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OutpassServiceError::NotificationNotFound));
}

#[tokio::test]
async fn should_not_touch_store_when_edit_changes_nothing() {
    let staff_id = Uuid::new_v4();
    let n = test_notification(staff_id, Duration::hours(1), ttl());
    let uc = EditNotificationUseCase {
        repo: StaleReadNotificationRepo::new(MockNotificationRepo::default(), n.clone()),
    };
    let edited = uc
        .execute(
            n.id,
            staff_id,
            EditNotificationInput {
                title: Some(n.title.clone()),
                message: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited, n);
}

// ── Lists ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_own_notifications_newest_first() {
    let staff_id = Uuid::new_v4();
    let old = test_notification(staff_id, Duration::hours(20), ttl());
    let new = test_notification(staff_id, Duration::hours(1), ttl());
    let other = test_notification(Uuid::new_v4(), Duration::minutes(5), ttl());
    let repo = MockNotificationRepo::new(vec![old.clone(), new.clone(), other]);

    let mine = ListMyNotificationsUseCase { repo }
        .execute(staff_id)
        .await
        .unwrap();
    let ids: Vec<_> = mine.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![new.id, old.id]);
}

#[tokio::test]
async fn should_hide_expired_notifications_before_purge() {
    let staff_id = Uuid::new_v4();
    let expired = test_notification(staff_id, Duration::hours(13), ttl());
    let live_old = test_notification(staff_id, Duration::hours(3), ttl());
    let live_new = test_notification(Uuid::new_v4(), Duration::hours(1), ttl());
    let repo = MockNotificationRepo::new(vec![expired, live_old.clone(), live_new.clone()]);

    let active = ListActiveNotificationsUseCase { repo }
        .execute()
        .await
        .unwrap();
    let ids: Vec<_> = active.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![live_new.id, live_old.id]);
}

// ── Delete / purge ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_only_own_notification() {
    let staff_id = Uuid::new_v4();
    let n = test_notification(staff_id, Duration::hours(1), ttl());
    let repo = MockNotificationRepo::new(vec![n.clone()]);
    let uc = DeleteNotificationUseCase { repo: repo.clone() };

    let err = uc.execute(n.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, OutpassServiceError::Forbidden));

    uc.execute(n.id, staff_id).await.unwrap();
    assert_eq!(repo.len(), 0);

    let err = uc.execute(n.id, staff_id).await.unwrap_err();
    assert!(matches!(err, OutpassServiceError::NotificationNotFound));
}

#[tokio::test]
async fn should_purge_only_expired_notifications() {
    let staff_id = Uuid::new_v4();
    let repo = MockNotificationRepo::new(vec![
        test_notification(staff_id, Duration::hours(30), ttl()),
        test_notification(staff_id, Duration::hours(13), ttl()),
        test_notification(staff_id, Duration::hours(1), ttl()),
    ]);

    let purged = PurgeExpiredNotificationsUseCase { repo: repo.clone() }
        .execute()
        .await
        .unwrap();
    assert_eq!(purged, 2);
    assert_eq!(repo.len(), 1);
    assert!(repo.notifications.lock().unwrap()[0].expires_at > Utc::now());
}
