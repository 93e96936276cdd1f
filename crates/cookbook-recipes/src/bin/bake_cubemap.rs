//! Offline conversion: equirectangular HDR -> vertical cross + six faces.
//!
//! Usage: `bake_cubemap <input.hdr> <out_dir>`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cookbook_bitmap::{equirect_to_vertical_cross, load_hdr, save, vertical_cross_to_faces, CubeFace};

use cookbook_engine::logging::{init_logging, LoggingConfig};

fn parse_args() -> Result<(PathBuf, PathBuf)> {
    let mut args = std::env::args_os().skip(1);
    match (args.next(), args.next(), args.next()) {
        (Some(input), Some(out_dir), None) => Ok((input.into(), out_dir.into())),
        _ => bail!("usage: bake_cubemap <input.hdr> <out_dir>"),
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let (input, out_dir) = parse_args()?;

    let equirect = load_hdr(&input)?;
    log::info!("loaded {} ({}x{})", input.display(), equirect.width(), equirect.height());

    let cross = equirect_to_vertical_cross(&equirect)?;
    let faces = vertical_cross_to_faces(&cross)?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let cross_path = out_dir.join("cross.hdr");
    save(&cross, &cross_path)?;
    log::info!("wrote {} ({}x{})", cross_path.display(), cross.width(), cross.height());

    for face in CubeFace::ALL {
        let path = out_dir.join(format!("face_{}.hdr", face.tag()));
        save(&faces.face(face)?, &path)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
