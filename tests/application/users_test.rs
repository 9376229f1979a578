use crate::common;

use grocer::application::users::delete::DeleteUserUseCase;
use grocer::application::users::update::{UpdateUserRequest, UpdateUserUseCase};
use grocer::domain::auth::SessionRepository;
use grocer::domain::orders::{NewOrder, OrderLine, OrderRepository};
use grocer::domain::users::{NewUser, User, UserRepository};
use grocer::infrastructure::password::PasswordService;
use grocer::infrastructure::repositories::orders::PostgresOrderRepository;
use grocer::infrastructure::repositories::sessions::PostgresSessionRepository;
use grocer::infrastructure::repositories::users::PostgresUserRepository;
use grocer::shared::error::AppError;
use serial_test::serial;
use std::sync::Arc;

async fn create(users: &PostgresUserRepository, email: &str) -> User {
    users
        .create(NewUser {
            firstname: "Erlan".to_string(),
            lastname: "Nurlanov".to_string(),
            phone_number: String::new(),
            email: email.to_string(),
            password_hash: "stored-hash".to_string(),
            role_id: common::CUSTOMER_ROLE_ID,
            activation_token: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn test_update_to_existing_email_is_duplicate() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let sessions = Arc::new(PostgresSessionRepository::new(pool.clone()));
    create(&users, "first@grocer.test").await;
    let second = create(&users, "second@grocer.test").await;

    let result = UpdateUserUseCase::new(users.clone(), sessions, Arc::new(PasswordService::new(4)))
        .execute(
            second.id,
            second.id,
            UpdateUserRequest {
                email: Some("first@grocer.test".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
    let unchanged = users.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.email, "second@grocer.test");
}

#[tokio::test]
#[serial]
async fn test_update_changes_only_given_fields() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let sessions = Arc::new(PostgresSessionRepository::new(pool.clone()));
    let user = create(&users, "partial@grocer.test").await;

    let updated = UpdateUserUseCase::new(users.clone(), sessions, Arc::new(PasswordService::new(4)))
        .execute(
            user.id,
            user.id,
            UpdateUserRequest {
                lastname: Some("Sultanov".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.lastname, "Sultanov");
    assert_eq!(updated.firstname, "Erlan");
    assert_eq!(updated.email, "partial@grocer.test");
}

#[tokio::test]
#[serial]
async fn test_delete_cascades_session_and_detaches_orders() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[40]).await;
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let sessions = PostgresSessionRepository::new(pool.clone());
    let orders = PostgresOrderRepository::new(pool.clone());
    let user = create(&users, "leaving@grocer.test").await;
    sessions.save(user.id, "some-token-hash").await.unwrap();
    let placed = orders
        .place(NewOrder::from_lines(
            user.id,
            "Pavlodar".to_string(),
            &[OrderLine {
                product_id: products[0],
                unit_price: 40,
                quantity: 1.0,
            }],
        )
        .unwrap())
        .await
        .unwrap();

    DeleteUserUseCase::new(users.clone()).execute(user.id).await.unwrap();

    assert!(users.find_by_id(user.id).await.unwrap().is_none());
    assert!(sessions.find_by_user_id(user.id).await.unwrap().is_none());
    let order = orders.find_by_id(placed.order.id).await.unwrap().unwrap();
    assert_eq!(order.user_id, None);
    assert_eq!(order.total, 40);

    let again = DeleteUserUseCase::new(users).execute(user.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}
