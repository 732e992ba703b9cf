//! Category service.

use sqlx::PgPool;

use commerce_core::CategoryId;

use super::ServiceError;
use crate::db::{CategoryRepository, RepositoryError};
use crate::dto::CategoryDto;
use crate::models::Category;

/// Category CRUD in wire types, with tree validation on parent changes.
pub struct CategoryService<'a> {
    categories: CategoryRepository<'a>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
        }
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` with `RepositoryError::NotFound` if it does not exist.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<CategoryDto, ServiceError> {
        let category = self.categories.get_by_id(id).await?;
        Ok(CategoryDto::from(&category))
    }

    /// All live categories, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn get_all(&self) -> Result<Vec<CategoryDto>, ServiceError> {
        let categories = self.categories.get_all().await?;
        Ok(categories.iter().map(CategoryDto::from).collect())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidParent` if the parent does not exist or is deleted.
    /// Returns `ServiceError::Repository` for database errors.
    pub async fn create(&self, dto: CategoryDto) -> Result<CategoryDto, ServiceError> {
        let category = Category::from(dto);
        if let Some(parent_id) = category.parent_id {
            self.ensure_live_parent(parent_id).await?;
        }

        let saved = self.categories.save(category).await.map_err(parent_rejection)?;
        Ok(CategoryDto::from(&saved))
    }

    /// Overwrite a category.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidParent` if the new parent is missing,
    /// deleted, the category itself, or one of its descendants.
    /// Returns `ServiceError::Repository` with `RepositoryError::NotFound` if the category does not exist.
    pub async fn update(&self, id: CategoryId, dto: CategoryDto) -> Result<CategoryDto, ServiceError> {
        let mut category = Category::from(dto);
        category.id = Some(id);

        if let Some(parent_id) = category.parent_id {
            self.ensure_live_parent(parent_id).await?;
            let ancestors = self.categories.ancestor_ids(parent_id).await?;
            check_no_cycle(id, &ancestors)?;
        }

        // The checks above give early, precise errors; the save re-checks
        // for cycles under a lock in case another re-parenting raced us.
        let saved = self.categories.save(category).await.map_err(parent_rejection)?;
        Ok(CategoryDto::from(&saved))
    }

    /// Soft-delete a category.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` with `RepositoryError::NotFound` if it does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), ServiceError> {
        self.categories.delete(id, false).await?;
        Ok(())
    }

    async fn ensure_live_parent(&self, parent_id: CategoryId) -> Result<(), ServiceError> {
        match self.categories.get_by_id(parent_id).await {
            Ok(parent) if parent.timestamps.is_deleted() => Err(ServiceError::InvalidParent(
                format!("category {parent_id} is deleted"),
            )),
            Ok(_) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ServiceError::InvalidParent(format!(
                "category {parent_id} does not exist"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

/// Categories only fail validation on their parent (cycle or self-parent).
fn parent_rejection(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::Validation(msg) => ServiceError::InvalidParent(msg),
        other => other.into(),
    }
}

/// Reject a parent whose ancestor path (starting with the parent itself)
/// contains the category being updated.
fn check_no_cycle(id: CategoryId, parent_path: &[CategoryId]) -> Result<(), ServiceError> {
    if parent_path.contains(&id) {
        return Err(ServiceError::InvalidParent(format!(
            "category {id} cannot be placed under itself or its descendants"
        )));
    }
    Ok(())
}
