//! Category inspection commands.
//!
//! # Usage
//!
//! ```bash
//! commerce-cli category tree 1 --depth 3
//! ```

use std::fmt::Write as _;
use std::path::Path;

use commerce_core::CategoryId;
use commerce_store::db::{CategoryNode, CategoryRepository, RepositoryError};
use thiserror::Error;

use super::ConnectError;

/// Errors that can occur during category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Print a category subtree, one indented line per category.
///
/// # Errors
///
/// Returns `CategoryError` if the root does not exist or the database is unreachable.
pub async fn tree(config_path: Option<&Path>, id: i32, depth: usize) -> Result<(), CategoryError> {
    let (_, pool) = super::connect(config_path).await?;

    let root = CategoryRepository::new(&pool)
        .get_tree(CategoryId::new(id), depth)
        .await?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&root));
    }

    Ok(())
}

fn render(root: &CategoryNode) -> String {
    let mut out = String::new();
    render_into(&mut out, root, 0);
    out
}

fn render_into(out: &mut String, node: &CategoryNode, level: usize) {
    let category = &node.category;
    let id = category.id.map_or_else(|| "-".to_owned(), |id| id.to_string());
    let inactive = if category.is_active { "" } else { " (inactive)" };
    let _ = writeln!(
        out,
        "{:indent$}{} [{}] #{id}{inactive}",
        "",
        category.name,
        category.slug,
        indent = level * 2
    );

    for child in &node.children {
        render_into(out, child, level + 1);
    }
}
