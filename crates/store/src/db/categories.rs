//! Category tree and product/category link lookups.
//!
//! Categories are an adjacency list (`parent_id`). Trees are read one level
//! per query and never deeper than [`MAX_TREE_DEPTH`]. Ancestor walks have
//! no depth limit but stop at the first repeated ID.
//!
//! Every category save with a parent re-checks for cycles inside its own
//! transaction while holding a transaction-scoped advisory lock, so two
//! concurrent re-parentings cannot each pass the check and together close
//! a loop.

use std::collections::{HashMap, HashSet};

use commerce_core::{CategoryId, ProductId};
use sqlx::{PgConnection, PgExecutor};

use super::{Repository, RepositoryError};
use crate::models::{Category, ProductCategory};

/// Deepest level [`Repository::get_tree`] will descend to.
pub const MAX_TREE_DEPTH: usize = 16;

/// Repository for categories.
pub type CategoryRepository<'a> = Repository<'a, Category>;

/// Repository for product/category links.
pub type ProductCategoryRepository<'a> = Repository<'a, ProductCategory>;

/// A category with its loaded subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    /// This node's category.
    pub category: Category,
    /// Live children, ordered by ID.
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Number of categories in this subtree, including this one.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// Levels below this node (0 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Repository<'_, Category> {
    /// Live direct children of a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_parent_id(
        &self,
        parent_id: CategoryId,
    ) -> Result<Vec<Category>, RepositoryError> {
        self.find_by("parent_id", parent_id).await
    }

    /// Live categories without a parent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_roots(&self) -> Result<Vec<Category>, RepositoryError> {
        let roots = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE parent_id IS NULL AND deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(roots)
    }

    /// Load a category and its live descendants.
    ///
    /// Descends breadth-first, one query per level, at most `max_depth`
    /// levels below the root (clamped to [`MAX_TREE_DEPTH`]). A category
    /// reached twice is only placed once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the root does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_tree(
        &self,
        root_id: CategoryId,
        max_depth: usize,
    ) -> Result<CategoryNode, RepositoryError> {
        let root = self.get_by_id(root_id).await?;
        let max_depth = max_depth.min(MAX_TREE_DEPTH);

        let mut seen: HashSet<CategoryId> = HashSet::from([root_id]);
        let mut frontier = vec![root_id.as_i32()];
        let mut descendants = Vec::new();

        for _ in 0..max_depth {
            if frontier.is_empty() {
                break;
            }

            let level = sqlx::query_as::<_, Category>(
                "SELECT * FROM categories WHERE parent_id = ANY($1) AND deleted_at IS NULL ORDER BY id",
            )
            .bind(frontier.as_slice())
            .fetch_all(self.pool())
            .await?;

            frontier.clear();
            for category in level {
                let Some(id) = category.id else { continue };
                if seen.insert(id) {
                    frontier.push(id.as_i32());
                    descendants.push(category);
                }
            }
        }

        tracing::debug!(%root_id, max_depth, loaded = descendants.len(), "Loaded category tree");
        Ok(build_tree(root, descendants))
    }

    /// IDs on the path from `id` up to its root, starting with `id` itself.
    ///
    /// Soft-deleted ancestors are still followed. If stored data already
    /// holds a loop, the walk ends before the first repeated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ancestor_ids(&self, id: CategoryId) -> Result<Vec<CategoryId>, RepositoryError> {
        ancestor_path(self.pool(), id).await
    }
}

/// Advisory lock key serializing category re-parenting ("category" in ASCII).
const TREE_LOCK_KEY: i64 = 0x6361_7465_676f_7279;

async fn ancestor_path<'e, X>(executor: X, id: CategoryId) -> Result<Vec<CategoryId>, RepositoryError>
where
    X: PgExecutor<'e>,
{
    let ids = sqlx::query_scalar::<_, CategoryId>(
        r"
        WITH RECURSIVE ancestors (id, parent_id, path) AS (
            SELECT id, parent_id, ARRAY[id] FROM categories WHERE id = $1
            UNION ALL
            SELECT c.id, c.parent_id, a.path || c.id
            FROM categories c
            JOIN ancestors a ON c.id = a.parent_id
            WHERE NOT c.id = ANY(a.path)
        )
        SELECT id FROM ancestors ORDER BY cardinality(path)
        ",
    )
    .bind(id)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

/// Reject a just-written category whose parent chain leads back to itself.
///
/// Called from the save transaction. Takes [`TREE_LOCK_KEY`] first so the
/// walk sees every re-parenting committed before this one.
pub(crate) async fn ensure_acyclic(
    conn: &mut PgConnection,
    id: Option<CategoryId>,
    parent_id: Option<CategoryId>,
) -> Result<(), RepositoryError> {
    let (Some(id), Some(parent_id)) = (id, parent_id) else {
        return Ok(());
    };

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(TREE_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    let path = ancestor_path(&mut *conn, parent_id).await?;
    if path.contains(&id) {
        return Err(RepositoryError::Validation(format!(
            "category {id} cannot be placed under itself or its descendants"
        )));
    }
    Ok(())
}

impl Repository<'_, ProductCategory> {
    /// Live category links of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductCategory>, RepositoryError> {
        self.find_by("product_id", product_id).await
    }

    /// Live product links of a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductCategory>, RepositoryError> {
        self.find_by("category_id", category_id).await
    }
}

/// Assemble a tree from a root and its descendants.
///
/// Descendants whose parent is not part of the tree are dropped.
fn build_tree(root: Category, descendants: Vec<Category>) -> CategoryNode {
    let mut children_by_parent: HashMap<CategoryId, Vec<Category>> = HashMap::new();
    for category in descendants {
        if let Some(parent_id) = category.parent_id {
            children_by_parent.entry(parent_id).or_default().push(category);
        }
    }
    attach_children(root, &mut children_by_parent)
}

fn attach_children(
    category: Category,
    children_by_parent: &mut HashMap<CategoryId, Vec<Category>>,
) -> CategoryNode {
    let children = category
        .id
        .and_then(|id| children_by_parent.remove(&id))
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_children(child, children_by_parent))
        .collect();

    CategoryNode { category, children }
}
