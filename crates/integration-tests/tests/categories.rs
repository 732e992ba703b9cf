//! Integration tests for categories, product links and the category service.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `COMMERCE_TEST_DATABASE_URL`.

use commerce_core::CategoryId;
use commerce_integration_tests::TestContext;
use commerce_store::db::{
    CategoryRepository, MAX_TREE_DEPTH, ProductCategoryRepository, ProductRepository,
};
use commerce_store::dto::{CategoryDto, ProductDto};
use commerce_store::models::{Category, ProductCategory};
use commerce_store::services::{CategoryService, ServiceError};
use rust_decimal::Decimal;

fn category_dto(name: &str, parent_id: Option<CategoryId>) -> CategoryDto {
    CategoryDto {
        id: None,
        name: name.to_string(),
        description: String::new(),
        slug: TestContext::unique(&name.to_lowercase()),
        parent_id,
        is_active: true,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

async fn create(service: &CategoryService<'_>, name: &str, parent: Option<CategoryId>) -> CategoryId {
    service
        .create(category_dto(name, parent))
        .await
        .expect("Failed to create category")
        .id
        .expect("Category should have an id")
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_service_crud() {
    let ctx = TestContext::new().await;
    let service = CategoryService::new(&ctx.pool);

    let id = create(&service, "Tea", None).await;
    let fetched = service.get_by_id(id).await.expect("Fetch failed");
    assert_eq!(fetched.name, "Tea");

    let mut renamed = fetched.clone();
    renamed.name = "Teas".to_string();
    let updated = service.update(id, renamed).await.expect("Update failed");
    assert_eq!(updated.name, "Teas");
    assert_eq!(updated.id, Some(id));

    let all = service.get_all().await.expect("List failed");
    assert!(all.iter().any(|c| c.id == Some(id)));

    service.delete(id).await.expect("Delete failed");
    let all = service.get_all().await.expect("List failed");
    assert!(all.iter().all(|c| c.id != Some(id)));

    let missing = service.update(CategoryId::new(i32::MAX), category_dto("X", None)).await;
    assert!(missing.as_ref().is_err_and(ServiceError::is_not_found));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_tree_and_cycle_rejection() {
    let ctx = TestContext::new().await;
    let service = CategoryService::new(&ctx.pool);
    let repo = CategoryRepository::new(&ctx.pool);

    let root = create(&service, "Root", None).await;
    let child = create(&service, "Child", Some(root)).await;
    let grandchild = create(&service, "Grandchild", Some(child)).await;
    let sibling = create(&service, "Sibling", Some(root)).await;

    let tree = repo.get_tree(root, MAX_TREE_DEPTH).await.expect("Tree failed");
    assert_eq!(tree.count(), 4);
    assert_eq!(tree.depth(), 2);
    let child_ids: Vec<Option<CategoryId>> = tree.children.iter().map(|n| n.category.id).collect();
    assert_eq!(child_ids, vec![Some(child), Some(sibling)]);

    let shallow = repo.get_tree(root, 1).await.expect("Tree failed");
    assert_eq!(shallow.count(), 3);

    let children = repo.get_by_parent_id(root).await.expect("Lookup failed");
    assert_eq!(children.len(), 2);

    let ancestors = repo.ancestor_ids(grandchild).await.expect("Ancestors failed");
    assert_eq!(ancestors, vec![grandchild, child, root]);

    // Moving the root under its own grandchild would close a loop
    let mut dto = service.get_by_id(root).await.expect("Fetch failed");
    dto.parent_id = Some(grandchild);
    assert!(matches!(
        service.update(root, dto.clone()).await,
        Err(ServiceError::InvalidParent(_))
    ));

    dto.parent_id = Some(root);
    assert!(matches!(
        service.update(root, dto).await,
        Err(ServiceError::InvalidParent(_))
    ));

    // A deleted parent is not accepted
    service.delete(sibling).await.expect("Delete failed");
    assert!(matches!(
        service.create(category_dto("Orphan", Some(sibling))).await,
        Err(ServiceError::InvalidParent(_))
    ));

    let roots = repo.get_roots().await.expect("Roots failed");
    assert!(roots.iter().any(|c| c.id == Some(root)));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_product_relations_loaded() {
    let ctx = TestContext::new().await;
    let categories = CategoryRepository::new(&ctx.pool);
    let links = ProductCategoryRepository::new(&ctx.pool);
    let products = ProductRepository::new(&ctx.pool);

    let product = ctx.create_product(Decimal::new(1299, 2)).await;
    let product_id = product.id.expect("Product should have an id");

    let green = categories
        .save(Category::new("Green", TestContext::unique("green")))
        .await
        .expect("Failed to save category");
    let loose = categories
        .save(Category::new("Loose", TestContext::unique("loose")))
        .await
        .expect("Failed to save category");
    let green_id = green.id.expect("Category should have an id");
    let loose_id = loose.id.expect("Category should have an id");

    links
        .save(ProductCategory::new(product_id, green_id))
        .await
        .expect("Failed to link");
    let loose_link = links
        .save(ProductCategory::new(product_id, loose_id))
        .await
        .expect("Failed to link");

    let fetched = products.get_by_id(product_id).await.expect("Fetch failed");
    let linked: Vec<Option<CategoryId>> = fetched.categories.iter().map(|c| c.id).collect();
    assert_eq!(linked, vec![Some(green_id), Some(loose_id)]);

    let dto = ProductDto::from(&fetched);
    assert_eq!(dto.categories.len(), 2);

    let in_green = products.get_by_category_id(green_id).await.expect("Lookup failed");
    assert_eq!(in_green.len(), 1);
    assert_eq!(in_green[0].categories.len(), 2);

    // Unlinking (soft) hides the category from the product
    links
        .delete(loose_link.id.expect("Link should have an id"), false)
        .await
        .expect("Unlink failed");
    let fetched = products.get_by_id(product_id).await.expect("Fetch failed");
    assert_eq!(fetched.categories.len(), 1);

    let by_product = links.get_by_product_id(product_id).await.expect("Lookup failed");
    assert_eq!(by_product.len(), 1);
    let by_category = links.get_by_category_id(green_id).await.expect("Lookup failed");
    assert_eq!(by_category.len(), 1);

    // Duplicate live links conflict
    assert!(matches!(
        links.save(ProductCategory::new(product_id, green_id)).await,
        Err(commerce_store::db::RepositoryError::Conflict(_))
    ));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_cycle_rejected_below_tree_depth_limit() {
    let ctx = TestContext::new().await;
    let service = CategoryService::new(&ctx.pool);
    let repo = CategoryRepository::new(&ctx.pool);

    let root = create(&service, "Deep Root", None).await;
    let mut leaf = root;
    for level in 0..MAX_TREE_DEPTH + 4 {
        leaf = create(&service, &format!("Level {level}"), Some(leaf)).await;
    }

    let path = repo.ancestor_ids(leaf).await.expect("Ancestors failed");
    assert_eq!(path.len(), MAX_TREE_DEPTH + 5);
    assert_eq!(path.last(), Some(&root));

    let mut dto = service.get_by_id(root).await.expect("Fetch failed");
    dto.parent_id = Some(leaf);
    assert!(matches!(
        service.update(root, dto).await,
        Err(ServiceError::InvalidParent(_))
    ));

    // Saving through the repository directly is checked as well
    let mut category = repo.get_by_id(root).await.expect("Fetch failed");
    category.parent_id = Some(leaf);
    assert!(matches!(
        repo.save(category).await,
        Err(commerce_store::db::RepositoryError::Validation(_))
    ));

    let stored = repo.get_by_id(root).await.expect("Fetch failed");
    assert_eq!(stored.parent_id, None);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_concurrent_reparenting_cannot_close_loop() {
    let ctx = TestContext::new().await;
    let repo = CategoryRepository::new(&ctx.pool);

    let a = repo
        .save(Category::new("A", TestContext::unique("a")))
        .await
        .expect("Failed to save category");
    let b = repo
        .save(Category::new("B", TestContext::unique("b")))
        .await
        .expect("Failed to save category");
    let a_id = a.id.expect("Category should have an id");
    let b_id = b.id.expect("Category should have an id");

    let mut a_under_b = a;
    a_under_b.parent_id = Some(b_id);
    let mut b_under_a = b;
    b_under_a.parent_id = Some(a_id);

    let (first, second) = tokio::join!(repo.save(a_under_b), repo.save(b_under_a));
    assert_eq!(
        u8::from(first.is_ok()) + u8::from(second.is_ok()),
        1,
        "exactly one re-parenting should win: {first:?} / {second:?}"
    );

    // The walk from A must end at a real root, not loop back
    let a_path = repo.ancestor_ids(a_id).await.expect("Ancestors failed");
    let top = *a_path.last().expect("Path starts with A itself");
    let top = repo.get_by_id(top).await.expect("Fetch failed");
    assert_eq!(top.parent_id, None);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_soft_deleted_link_can_be_relinked() {
    let ctx = TestContext::new().await;
    let categories = CategoryRepository::new(&ctx.pool);
    let links = ProductCategoryRepository::new(&ctx.pool);
    let products = ProductRepository::new(&ctx.pool);

    let product_id = ctx
        .create_product(Decimal::new(899, 2))
        .await
        .id
        .expect("Product should have an id");
    let category_id = categories
        .save(Category::new("Herbal", TestContext::unique("herbal")))
        .await
        .expect("Failed to save category")
        .id
        .expect("Category should have an id");

    let first = links
        .save(ProductCategory::new(product_id, category_id))
        .await
        .expect("Failed to link");
    links
        .delete(first.id.expect("Link should have an id"), false)
        .await
        .expect("Unlink failed");
    assert!(links.get_by_product_id(product_id).await.expect("Lookup failed").is_empty());

    let relinked = links
        .save(ProductCategory::new(product_id, category_id))
        .await
        .expect("Relinking a soft-deleted pair should succeed");
    assert_ne!(relinked.id, first.id);

    let fetched = products.get_by_id(product_id).await.expect("Fetch failed");
    let linked: Vec<Option<CategoryId>> = fetched.categories.iter().map(|c| c.id).collect();
    assert_eq!(linked, vec![Some(category_id)]);

    // Still only one live link per pair
    assert!(matches!(
        links.save(ProductCategory::new(product_id, category_id)).await,
        Err(commerce_store::db::RepositoryError::Conflict(_))
    ));
}
