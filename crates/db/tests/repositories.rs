//! Repository tests against a real PostgreSQL database.
//!
//! Need `DATABASE_URL` pointing at PostgreSQL; `sqlx::test` creates a fresh database per test.

use chrono::Utc;
use feedback_core::feedback::{FeedbackScope, Sentiment};
use feedback_core::feedback_request::{RequestScope, PENDING_REQUEST_CONSTRAINT};
use feedback_core::roles::Role;
use feedback_db::models::feedback::{CreateFeedback, UpdateFeedback};
use feedback_db::models::feedback_request::CreateFeedbackRequest;
use feedback_db::models::user::{CreateUser, UpdateUser, User};
use feedback_db::repositories::{FeedbackRepo, FeedbackRequestRepo, UserRepo};
use sqlx::PgPool;

async fn user(pool: &PgPool, email: &str, role: Role, manager_id: Option<i64>) -> User {
    let input = CreateUser {
        email: email.to_string(),
        full_name: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        role,
        manager_id,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_index_allows_one_pending_per_pair(pool: PgPool) {
    let manager = user(&pool, "m@example.com", Role::Manager, None).await;
    let employee = user(&pool, "e@example.com", Role::Employee, Some(manager.id)).await;
    let input = CreateFeedbackRequest::default();

    let first = FeedbackRequestRepo::create(&pool, employee.id, manager.id, &input)
        .await
        .unwrap();
    assert!(FeedbackRequestRepo::pending_exists(&pool, employee.id, manager.id)
        .await
        .unwrap());

    let err = FeedbackRequestRepo::create(&pool, employee.id, manager.id, &input)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some(PENDING_REQUEST_CONSTRAINT));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    FeedbackRequestRepo::complete(&pool, first.id, Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert!(!FeedbackRequestRepo::pending_exists(&pool, employee.id, manager.id)
        .await
        .unwrap());
    FeedbackRequestRepo::create(&pool, employee.id, manager.id, &input)
        .await
        .unwrap();

    let listed = FeedbackRequestRepo::list_for_scope(&pool, RequestScope::TargetedAt(manager.id))
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].status, "pending");
    assert_eq!(listed[1].status, "completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn acknowledged_flag_and_timestamp_must_agree(pool: PgPool) {
    let manager = user(&pool, "m@example.com", Role::Manager, None).await;
    let employee = user(&pool, "e@example.com", Role::Employee, Some(manager.id)).await;
    let feedback = FeedbackRepo::create(
        &pool,
        manager.id,
        &CreateFeedback {
            employee_id: employee.id,
            strengths: "s".into(),
            areas_to_improve: "a".into(),
            overall_sentiment: Sentiment::Positive,
        },
    )
    .await
    .unwrap();

    let result = sqlx::query("UPDATE feedback SET acknowledged = true WHERE id = $1")
        .bind(feedback.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "flag without timestamp must violate the check");

    let acked = FeedbackRepo::acknowledge(&pool, feedback.id, Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert!(acked.ack_state().unwrap().is_acknowledged());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_update_only_touches_present_fields(pool: PgPool) {
    let manager = user(&pool, "m@example.com", Role::Manager, None).await;
    let employee = user(&pool, "e@example.com", Role::Employee, Some(manager.id)).await;
    let feedback = FeedbackRepo::create(
        &pool,
        manager.id,
        &CreateFeedback {
            employee_id: employee.id,
            strengths: "original strengths".into(),
            areas_to_improve: "original areas".into(),
            overall_sentiment: Sentiment::Neutral,
        },
    )
    .await
    .unwrap();

    let updated = FeedbackRepo::update(
        &pool,
        feedback.id,
        &UpdateFeedback {
            overall_sentiment: Some(Sentiment::Negative),
            ..UpdateFeedback::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.sentiment().unwrap(), Sentiment::Negative);
    assert_eq!(updated.strengths, "original strengths");
    assert_eq!(updated.areas_to_improve, "original areas");

    assert!(FeedbackRepo::update(&pool, 999_999, &UpdateFeedback::default())
        .await
        .unwrap()
        .is_none());

    let received = FeedbackRepo::list_for_scope(&pool, FeedbackScope::ReceivedBy(employee.id))
        .await
        .unwrap();
    assert_eq!(received.len(), 1);
    let authored = FeedbackRepo::list_for_scope(&pool, FeedbackScope::AuthoredBy(employee.id))
        .await
        .unwrap();
    assert!(authored.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_update_handles_manager_tri_state(pool: PgPool) {
    let manager = user(&pool, "m@example.com", Role::Manager, None).await;
    let employee = user(&pool, "e@example.com", Role::Employee, Some(manager.id)).await;

    let renamed = UserRepo::update(
        &pool,
        employee.id,
        &UpdateUser {
            full_name: Some("Renamed".into()),
            ..UpdateUser::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.full_name, "Renamed");
    assert_eq!(renamed.manager_id, Some(manager.id));

    let cleared = UserRepo::update(
        &pool,
        employee.id,
        &UpdateUser {
            manager_id: Some(None),
            ..UpdateUser::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.manager_id, None);
    assert_eq!(UserRepo::count_team(&pool, manager.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_ids_returns_each_user_once(pool: PgPool) {
    let a = user(&pool, "a@example.com", Role::Manager, None).await;
    let b = user(&pool, "b@example.com", Role::Employee, Some(a.id)).await;

    assert!(UserRepo::find_by_ids(&pool, &[]).await.unwrap().is_empty());

    let mut found: Vec<i64> = UserRepo::find_by_ids(&pool, &[a.id, b.id, 999_999])
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    found.sort_unstable();
    assert_eq!(found, vec![a.id, b.id]);

    let managers = UserRepo::list_by_role(&pool, Role::Manager).await.unwrap();
    assert_eq!(managers.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_height_counts_levels_below(pool: PgPool) {
    let director = user(&pool, "d@example.com", Role::Manager, None).await;
    let lead = user(&pool, "l@example.com", Role::Manager, Some(director.id)).await;
    let engineer = user(&pool, "e@example.com", Role::Employee, None).await;

    assert_eq!(UserRepo::report_height(&pool, engineer.id).await.unwrap(), 0);
    assert_eq!(UserRepo::report_height(&pool, lead.id).await.unwrap(), 0);
    assert_eq!(UserRepo::report_height(&pool, director.id).await.unwrap(), 1);

    user(&pool, "r@example.com", Role::Employee, Some(lead.id)).await;
    assert_eq!(UserRepo::report_height(&pool, lead.id).await.unwrap(), 1);
    assert_eq!(UserRepo::report_height(&pool, director.id).await.unwrap(), 2);
}
