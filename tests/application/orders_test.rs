use crate::common;

use grocer::domain::orders::{
    DELIVERED_STATUS_ID, NewOrder, OrderLine, OrderRepository, OrderStatusUpdate,
    UnknownProductError, UnknownStatusError,
};
use grocer::domain::users::{NewUser, UserId, UserRepository};
use grocer::infrastructure::repositories::orders::PostgresOrderRepository;
use grocer::infrastructure::repositories::users::PostgresUserRepository;
use serial_test::serial;
use sqlx::PgPool;

async fn customer(pool: &PgPool, email: &str) -> UserId {
    PostgresUserRepository::new(pool.clone())
        .create(NewUser {
            firstname: "Timur".to_string(),
            lastname: "Bekov".to_string(),
            phone_number: String::new(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: common::CUSTOMER_ROLE_ID,
            activation_token: None,
        })
        .await
        .unwrap()
        .id
}

fn order(user_id: UserId, lines: &[(i64, i64, f64)]) -> NewOrder {
    let lines: Vec<OrderLine> = lines
        .iter()
        .map(|&(product_id, unit_price, quantity)| OrderLine {
            product_id,
            unit_price,
            quantity,
        })
        .collect();
    NewOrder::from_lines(user_id, "Karaganda".to_string(), &lines).unwrap()
}

#[tokio::test]
#[serial]
async fn test_place_stores_header_and_items() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[100, 50]).await;
    let user_id = customer(&pool, "cart@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());

    let placed = repo
        .place(order(user_id, &[(products[0], 100, 2.0), (products[1], 50, 3.0)]))
        .await
        .unwrap();

    assert_eq!(placed.order.total, 350);
    assert_eq!(placed.order.user_id, Some(user_id));
    assert_eq!(placed.items.len(), 2);
    let stored: i64 = sqlx::query_scalar("SELECT SUM(total)::BIGINT FROM order_items WHERE order_id = $1")
        .bind(placed.order.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, placed.order.total);
}

#[tokio::test]
#[serial]
async fn test_unknown_product_rolls_back_everything() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[100]).await;
    let user_id = customer(&pool, "ghost@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());

    let err = repo
        .place(order(user_id, &[(products[0], 100, 1.0), (products[0] + 99, 10, 1.0)]))
        .await
        .unwrap_err();

    let unknown = err.downcast_ref::<UnknownProductError>().unwrap();
    assert_eq!(unknown.index, 1);
    assert_eq!(repo.count().await.unwrap(), 0);
    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(items, 0);
}

#[tokio::test]
#[serial]
async fn test_zero_quantity_deletes_item_and_subtracts() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[100, 50]).await;
    let user_id = customer(&pool, "zero@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());
    let placed = repo
        .place(order(user_id, &[(products[0], 100, 2.0), (products[1], 50, 3.0)]))
        .await
        .unwrap();

    let update = repo
        .update_item_quantity(placed.items[0].id, 0.0)
        .await
        .unwrap()
        .unwrap();

    assert!(update.item.is_none());
    assert_eq!(update.delta, -200);
    assert_eq!(update.order.total, 150);
    assert!(repo.find_item(placed.items[0].id).await.unwrap().is_none());
    assert!(repo.update_item_quantity(placed.items[0].id, 1.0).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_concurrent_item_changes_keep_total_consistent() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[100, 50]).await;
    let user_id = customer(&pool, "race@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());
    let placed = repo
        .place(order(user_id, &[(products[0], 100, 2.0), (products[1], 50, 3.0)]))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        repo.update_item_quantity(placed.items[0].id, 0.0),
        repo.update_item_quantity(placed.items[1].id, 0.0),
    );
    first.unwrap();
    second.unwrap();

    let order = repo.find_by_id(placed.order.id).await.unwrap().unwrap();
    assert_eq!(order.total, 0);
    assert!(repo.find_items(placed.order.id).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_orders_listed_newest_first() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[10]).await;
    let user_id = customer(&pool, "many@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());
    for _ in 0..3 {
        repo.place(order(user_id, &[(products[0], 10, 1.0)])).await.unwrap();
    }

    let page = repo.find_all(2, 0).await.unwrap();
    let mine = repo.find_for_user(user_id).await.unwrap();

    assert_eq!(page.len(), 2);
    assert!(page[0].id > page[1].id);
    assert_eq!(mine.len(), 3);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
#[serial]
async fn test_delivered_status_stamps_delivery_once() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[100]).await;
    let user_id = customer(&pool, "courier@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());
    let placed = repo.place(order(user_id, &[(products[0], 100, 1.0)])).await.unwrap();
    let delivered = || OrderStatusUpdate {
        status_id: Some(DELIVERED_STATUS_ID),
        delivered_at: None,
    };

    let first = repo.update_status(placed.order.id, delivered()).await.unwrap().unwrap();
    let second = repo.update_status(placed.order.id, delivered()).await.unwrap().unwrap();

    assert_eq!(first.status_id, DELIVERED_STATUS_ID);
    assert!(first.delivered_at.is_some());
    assert_eq!(second.delivered_at, first.delivered_at);

    let unknown = repo
        .update_status(
            placed.order.id,
            OrderStatusUpdate {
                status_id: Some(99),
                delivered_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(unknown.is::<UnknownStatusError>());
    assert!(repo.update_status(-1, delivered()).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_delete_cascades_to_items() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let products = common::seed_products(&pool, &[100, 50]).await;
    let user_id = customer(&pool, "undo@grocer.test").await;
    let repo = PostgresOrderRepository::new(pool.clone());
    let placed = repo
        .place(order(user_id, &[(products[0], 100, 1.0), (products[1], 50, 2.0)]))
        .await
        .unwrap();

    assert!(repo.delete(placed.order.id).await.unwrap());
    assert!(!repo.delete(placed.order.id).await.unwrap());

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
        .bind(placed.order.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(items, 0);
}
