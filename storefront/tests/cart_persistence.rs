//! Cart and session persistence through the file-backed store.

use std::sync::Arc;

use shared::{LoginResponse, Product, Role};
use storefront::services::cart::{CartStore, QuantityChange};
use storefront::services::session::SessionManager;
use storefront::services::storage::FileStore;

fn product(id: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        price,
        quantity: 50,
        images: vec![format!("{}.jpg", id)],
        owner_email: "farmer@farm.in".to_string(),
        description: None,
    }
}

#[tokio::test]
async fn concurrent_adds_both_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let store = Arc::new(FileStore::open(&file).await.unwrap());
    let cart = Arc::new(CartStore::new(store));

    let (first, second) = tokio::join!(
        {
            let cart = cart.clone();
            async move { cart.add(&product("p1", 40.0), 1).await }
        },
        {
            let cart = cart.clone();
            async move { cart.add(&product("p2", 25.0), 3).await }
        },
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first.version, second.version);

    let reopened = CartStore::new(Arc::new(FileStore::open(&file).await.unwrap()));
    let mut ids: Vec<String> = reopened.items().await.into_iter().map(|i| i.product_id).collect();
    ids.sort();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn quantity_never_drops_below_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("session.json")).await.unwrap());
    let cart = CartStore::new(store);
    cart.add(&product("p1", 40.0), 2).await.unwrap();

    let steps = [
        QuantityChange::Decrease,
        QuantityChange::Decrease,
        QuantityChange::Decrease,
        QuantityChange::Increase,
        QuantityChange::Decrease,
        QuantityChange::Decrease,
        QuantityChange::Increase,
        QuantityChange::Increase,
    ];
    for step in steps {
        let snapshot = cart.update_quantity("p1", step).await.unwrap();
        assert!(snapshot.items[0].quantity >= 1);
    }
    assert_eq!(cart.items().await[0].quantity, 3);
}

#[tokio::test]
async fn session_survives_restart_until_logout() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nested").join("session.json");
    let login = LoginResponse {
        email: "a@b.com".to_string(),
        role: Role::Farmer,
        token: "t1".to_string(),
        phone: Some("9999999999".to_string()),
        full_name: Some("Asha Patil".to_string()),
    };

    let session = SessionManager::new(Arc::new(FileStore::open(&file).await.unwrap()));
    session.establish(&login, "9999999999").await.unwrap();

    let restarted = SessionManager::new(Arc::new(FileStore::open(&file).await.unwrap()));
    let restored = restarted.restore().await.unwrap();
    assert_eq!(restored.role, Role::Farmer);
    assert_eq!(restored.greeting_name(), "Asha Patil");

    restarted.logout().await.unwrap();
    let after = SessionManager::new(Arc::new(FileStore::open(&file).await.unwrap()));
    assert!(after.restore().await.is_none());
}
