//! Daltonize command
//!
//! Corrects an image and optionally writes how a dichromat sees the
//! corrected result next to it.

use crate::DaltonizeArgs;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, trace};
use visim_color::convert::{linear_to_rgba, rgba_to_linear};
use visim_ops::{DaltonizeParams, Daltonizer, DeficiencyType, Settings, simulate_deficiency};

/// Strengths from settings, overridden by any flags given
fn resolve_params(args: &DaltonizeArgs, base: DaltonizeParams) -> DaltonizeParams {
    let scale = if args.percent { 0.01 } else { 1.0 };
    DaltonizeParams {
        lm_stretch: args.lm_stretch.map_or(base.lm_stretch, |v| v * scale),
        lum_scale: args.lum_scale.map_or(base.lum_scale, |v| v * scale),
        s_scale: args.s_scale.map_or(base.s_scale, |v| v * scale),
    }
}

fn seen_path(output: &std::path::Path) -> PathBuf {
    let mut name = output.file_stem().unwrap_or_default().to_os_string();
    name.push(".seen.rgba");
    output.with_file_name(name)
}

pub fn run(args: DaltonizeArgs, mut settings: Settings) -> Result<()> {
    trace!(input = %args.image.input.display(), "daltonize::run");

    settings.daltonize = resolve_params(&args, settings.daltonize);
    let img = super::load_raw(&args.image.input, args.image.width, args.image.height)?;
    let linear = rgba_to_linear(&img);
    let alpha = img.alpha();

    let daltonizer = settings.daltonizer();
    info!(params = ?daltonizer.params(), "Applying Daltonize correction");
    let correction = daltonizer.analyze(&linear)?;
    let corrected = Daltonizer::apply(&correction, &linear);
    super::save_raw(&args.image.output, &linear_to_rgba(&corrected, &alpha)?)?;

    if args.print_matrix {
        for row in correction.to_linear_rgb_affine().to_homogeneous() {
            println!(
                "{:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                row[0], row[1], row[2], row[3]
            );
        }
    }

    if let Some(kind) = &args.simulate {
        let kind: DeficiencyType = kind.parse()?;
        let seen = simulate_deficiency(&corrected, kind)?;
        let path = seen_path(&args.image.output);
        info!(%kind, path = %path.display(), "Writing simulated preview");
        super::save_raw(&path, &linear_to_rgba(&seen, &alpha)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawImageArgs;

    fn args(percent: bool) -> DaltonizeArgs {
        DaltonizeArgs {
            image: RawImageArgs {
                input: "in.rgba".into(),
                output: "out/fixed.rgba".into(),
                width: 1,
                height: 1,
            },
            lm_stretch: Some(80.0),
            lum_scale: None,
            s_scale: Some(10.0),
            percent,
            simulate: None,
            print_matrix: false,
        }
    }

    #[test]
    fn test_percent_flags_override() {
        let p = resolve_params(&args(true), DaltonizeParams::new(0.1, 0.2, 0.3));
        assert_eq!(p.lum_scale, 0.2);
        assert!((p.lm_stretch - 0.8).abs() < 1e-12);
        assert!((p.s_scale - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_seen_path() {
        assert_eq!(
            seen_path(std::path::Path::new("out/fixed.rgba")),
            PathBuf::from("out/fixed.seen.rgba")
        );
    }
}
