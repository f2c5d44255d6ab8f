use restock_core::{Product, ProductRepository, RepoError, SqliteProductRepository, Store};

#[test]
fn insert_and_get_roundtrip() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    let product = Product::with_serial_code("coffee-1", "Cafe Latte").unwrap();
    repo.insert_product(&product).unwrap();

    let loaded = repo.get_product("coffee-1").unwrap().unwrap();
    assert_eq!(loaded, product);
}

#[test]
fn get_missing_product_returns_none() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    assert!(repo.get_product("missing").unwrap().is_none());
}

#[test]
fn list_orders_by_name_ascending() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    for (serial_code, name) in [
        ("m-1", "Mocha"),
        ("a-1", "Americano"),
        ("e-1", "Espresso"),
    ] {
        repo.insert_product(&Product::with_serial_code(serial_code, name).unwrap())
            .unwrap();
    }

    let names: Vec<_> = repo
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.name)
        .collect();
    assert_eq!(names, vec!["Americano", "Espresso", "Mocha"]);
}

#[test]
fn list_breaks_name_ties_by_serial_code() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    repo.insert_product(&Product::with_serial_code("b-2", "Coffee").unwrap())
        .unwrap();
    repo.insert_product(&Product::with_serial_code("a-1", "Coffee").unwrap())
        .unwrap();

    let serials: Vec<_> = repo
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.serial_code)
        .collect();
    assert_eq!(serials, vec!["a-1", "b-2"]);
}

#[test]
fn duplicate_serial_code_is_a_conflict() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    repo.insert_product(&Product::with_serial_code("coffee-1", "Cafe Latte").unwrap())
        .unwrap();
    let err = repo
        .insert_product(&Product::with_serial_code("coffee-1", "Imposter Latte").unwrap())
        .unwrap_err();

    assert!(matches!(err, RepoError::Conflict(serial) if serial == "coffee-1"));
    assert_eq!(repo.count_products().unwrap(), 1);
}

#[test]
fn delete_removes_exactly_one_product() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    repo.insert_product(&Product::with_serial_code("coffee-1", "Cafe Latte").unwrap())
        .unwrap();
    repo.insert_product(&Product::with_serial_code("coffee-2", "Cappuchino").unwrap())
        .unwrap();

    repo.delete_product("coffee-1").unwrap();

    assert!(repo.get_product("coffee-1").unwrap().is_none());
    assert_eq!(repo.count_products().unwrap(), 1);
}

#[test]
fn delete_missing_product_returns_not_found() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    let err = repo.delete_product("missing").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(serial) if serial == "missing"));
}

#[test]
fn validation_failure_blocks_insert() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());

    let invalid = Product {
        serial_code: "coffee-1".to_string(),
        name: "   ".to_string(),
    };
    let err = repo.insert_product(&invalid).unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count_products().unwrap(), 0);
}
