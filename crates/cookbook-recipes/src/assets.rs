use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cookbook_bitmap::Bitmap;

use crate::mesh::{load_gltf_mesh, MeshAsset};

/// Environment variable naming the asset root explicitly.
pub const ASSETS_ENV: &str = "COOKBOOK_ASSETS";

/// Roots probed, in order, when `COOKBOOK_ASSETS` is unset.
const DEFAULT_ROOTS: [&str; 3] = ["assets", "../assets", "../../assets"];

pub const DUCK_MESH: &str = "rubber_duck/scene.gltf";
pub const DUCK_TEXTURE: &str = "rubber_duck/textures/Duck_baseColor.png";
pub const ENVIRONMENT_HDR: &str = "piazza_bologni_1k.hdr";

/// Resolves `rel` against the asset root.
///
/// Assets are not shipped with the recipes; point `COOKBOOK_ASSETS` at a
/// directory holding `rubber_duck/` and `piazza_bologni_1k.hdr`, or run from
/// a directory that has an `assets/` folder nearby.
pub fn asset_path(rel: impl AsRef<Path>) -> Result<PathBuf> {
    let roots: Vec<PathBuf> = match std::env::var_os(ASSETS_ENV) {
        Some(root) => vec![PathBuf::from(root)],
        None => DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
    };
    resolve_in(&roots, rel.as_ref())
}

/// Loads the rubber duck mesh and its base color texture (RGBA8).
pub fn load_duck() -> Result<(MeshAsset, Bitmap)> {
    let mesh_path = asset_path(DUCK_MESH)?;
    let mesh = load_gltf_mesh(&mesh_path)?;

    let texture_path = asset_path(DUCK_TEXTURE)?;
    let texture = cookbook_bitmap::load_rgba8(&texture_path)
        .with_context(|| format!("loading duck texture {}", texture_path.display()))?;
    log::info!(
        "loaded {} ({}x{})",
        texture_path.display(),
        texture.width(),
        texture.height()
    );

    Ok((mesh, texture))
}

fn resolve_in(roots: &[PathBuf], rel: &Path) -> Result<PathBuf> {
    for root in roots {
        let candidate = root.join(rel);
        if candidate.exists() {
            log::debug!("asset {} -> {}", rel.display(), candidate.display());
            return Ok(candidate);
        }
    }

    let tried: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
    bail!(
        "asset {} not found (tried roots: {}; set {ASSETS_ENV} to override)",
        rel.display(),
        tried.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cookbook-assets-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn first_root_with_the_file_wins() {
        let a = scratch("a");
        let b = scratch("b");
        std::fs::write(b.join("duck.png"), b"x").unwrap();

        let found = resolve_in(&[a.clone(), b.clone()], Path::new("duck.png")).unwrap();
        assert_eq!(found, b.join("duck.png"));

        std::fs::write(a.join("duck.png"), b"x").unwrap();
        let found = resolve_in(&[a.clone(), b.clone()], Path::new("duck.png")).unwrap();
        assert_eq!(found, a.join("duck.png"));

        let _ = std::fs::remove_dir_all(a);
        let _ = std::fs::remove_dir_all(b);
    }

    #[test]
    fn missing_asset_lists_every_root() {
        let roots = [PathBuf::from("nowhere-1"), PathBuf::from("nowhere-2")];
        let err = resolve_in(&roots, Path::new("sky.hdr")).unwrap_err().to_string();
        assert!(err.contains("sky.hdr"));
        assert!(err.contains("nowhere-1"));
        assert!(err.contains("nowhere-2"));
        assert!(err.contains(ASSETS_ENV));
    }
}
