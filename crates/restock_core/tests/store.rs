use restock_core::{Product, ProductRepository, SqliteProductRepository, Store};

#[test]
fn background_connection_sees_in_memory_store_data() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteProductRepository::new(store.connection());
    let product = Product::with_serial_code("coffee-1", "Cafe Latte").unwrap();
    repo.insert_product(&product).unwrap();

    let background = store.background_connection().unwrap();
    let background_repo = SqliteProductRepository::new(&background);

    let listed = background_repo.list_products().unwrap();
    assert_eq!(listed, vec![product]);
}

#[test]
fn primary_connection_sees_background_writes() {
    let store = Store::open_in_memory().unwrap();

    let background = store.background_connection().unwrap();
    let background_repo = SqliteProductRepository::new(&background);
    let product = Product::with_serial_code("coffee-2", "Cappuchino").unwrap();
    background_repo.insert_product(&product).unwrap();
    drop(background);

    let repo = SqliteProductRepository::new(store.connection());
    assert_eq!(repo.list_products().unwrap(), vec![product]);
}

#[test]
fn separate_in_memory_stores_are_isolated() {
    let store_a = Store::open_in_memory().unwrap();
    let store_b = Store::open_in_memory().unwrap();

    let repo_a = SqliteProductRepository::new(store_a.connection());
    repo_a
        .insert_product(&Product::with_serial_code("coffee-1", "Cafe Latte").unwrap())
        .unwrap();

    let repo_b = SqliteProductRepository::new(store_b.connection());
    assert_eq!(repo_b.count_products().unwrap(), 0);
}

#[test]
fn file_backed_background_connection_shares_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("restock.db")).unwrap();

    let background = store.background_connection().unwrap();
    let background_repo = SqliteProductRepository::new(&background);
    background_repo
        .insert_product(&Product::with_serial_code("coffee-3", "Flat White").unwrap())
        .unwrap();

    let repo = SqliteProductRepository::new(store.connection());
    assert_eq!(repo.count_products().unwrap(), 1);
}
