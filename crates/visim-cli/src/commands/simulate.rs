//! Simulate command
//!
//! Decodes sRGB bytes to linear light, projects onto the dichromat's
//! confusion surface and re-encodes.

use crate::SimulateArgs;
use anyhow::Result;
use tracing::{info, trace};
use visim_color::convert::{linear_to_rgba, rgba_to_linear};
use visim_ops::{DeficiencyType, Settings, simulate_deficiency};

pub fn run(args: SimulateArgs, settings: Settings) -> Result<()> {
    trace!(input = %args.image.input.display(), kind = ?args.kind, "simulate::run");

    let kind: DeficiencyType = match &args.kind {
        Some(k) => k.parse()?,
        None => settings.deficiency,
    };
    let img = super::load_raw(&args.image.input, args.image.width, args.image.height)?;

    info!(%kind, "Simulating deficiency");
    let linear = rgba_to_linear(&img);
    let seen = simulate_deficiency(&linear, kind)?;
    let out = linear_to_rgba(&seen, &img.alpha())?;

    super::save_raw(&args.image.output, &out)
}
