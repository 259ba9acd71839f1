use chrono::Duration;
use uuid::Uuid;

use outpass_domain::outpass::Decision;
use outpass_domain::user::UserRole;
use outpass_service::usecase::roster::ListDistinctStudentsUseCase;

use crate::helpers::{MockOutpassRepo, MockUserRepo, test_outpass, test_user};

#[tokio::test]
async fn should_list_each_student_once_in_first_seen_order() {
    let a = test_user("Asha", UserRole::Student);
    let mut b = test_user("Bala", UserRole::Student);
    b.phone = Some("9876543210".to_owned());
    let staff_id = Uuid::new_v4();

    let repo = MockOutpassRepo::new(vec![
        test_outpass(b.id, Duration::hours(9))
            .decide(Decision::Reject, staff_id, chrono::Utc::now())
            .unwrap(),
        test_outpass(a.id, Duration::hours(8))
            .decide(Decision::Approve, staff_id, chrono::Utc::now())
            .unwrap(),
        test_outpass(b.id, Duration::hours(2)),
        test_outpass(a.id, Duration::hours(1)),
    ]);

    let students = ListDistinctStudentsUseCase {
        repo,
        users: MockUserRepo::new(vec![a.clone(), b.clone()]),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(students.len(), 2);
    assert_eq!(students[0].id, b.id);
    assert_eq!(students[0].phone.as_deref(), Some("9876543210"));
    assert_eq!(students[1].id, a.id);
    assert_eq!(students[1].email, "asha@campus.edu");
    assert!(students[1].phone.is_none());
}

#[tokio::test]
async fn should_skip_outpasses_of_deleted_students() {
    let a = test_user("Asha", UserRole::Student);
    let gone = test_user("Gone", UserRole::Student);
    let users = MockUserRepo::new(vec![a.clone(), gone.clone()]);
    users.remove(gone.id);

    let repo = MockOutpassRepo::new(vec![
        test_outpass(gone.id, Duration::hours(2)),
        test_outpass(a.id, Duration::hours(1)),
    ]);

    let students = ListDistinctStudentsUseCase { repo, users }
        .execute()
        .await
        .unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, a.id);
}

#[tokio::test]
async fn should_return_empty_roster_without_outpasses() {
    let students = ListDistinctStudentsUseCase {
        repo: MockOutpassRepo::default(),
        users: MockUserRepo::default(),
    }
    .execute()
    .await
    .unwrap();
    assert!(students.is_empty());
}
