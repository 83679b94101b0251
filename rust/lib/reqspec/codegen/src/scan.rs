//! Source scanning: find `.rs` files and read trait declarations out of them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqspec_ir::DeclSet;
use tracing::{debug, warn};

/// Every `.rs` file under `roots`, sorted. A root may itself be a file.
pub fn rust_files(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root.clone());
        } else if root.is_dir() {
            walk(root, &mut files)?;
        } else {
            anyhow::bail!("input {} does not exist", root.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse every file and collect all trait declarations.
///
/// A trait name declared twice keeps the later declaration.
pub fn load_decls(files: &[PathBuf]) -> Result<DeclSet> {
    let mut decls = DeclSet::new();
    for file in files {
        let source =
            std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        let ast = syn::parse_file(&source)
            .with_context(|| format!("parsing {}", file.display()))?;
        let traits = reqspec_parser::parse_file(&ast)
            .with_context(|| format!("reading client metadata in {}", file.display()))?;

        debug!(file = %file.display(), traits = traits.len(), "scanned");
        for decl in traits {
            let name = decl.name.clone();
            if decls.insert(decl).is_some() {
                warn!(file = %file.display(), ty = %name, "trait declared more than once, using the last one");
            }
        }
    }
    Ok(decls)
}
