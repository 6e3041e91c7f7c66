//! Infant-vision commands: infant, plan, presets

use crate::{GeometryArgs, InfantArgs, PlanArgs};
use anyhow::{Result, bail};
use tracing::{info, trace, warn};
use visim_ops::{AgePreset, Settings, ViewingGeometry};

/// Apply flag overrides to the settings' age and geometry
fn apply_geometry(args: &GeometryArgs, settings: &mut Settings) -> Result<()> {
    if let Some(age) = &args.age {
        settings.age = age.parse()?;
    }
    let g = settings.geometry;
    settings.geometry = ViewingGeometry::new(
        args.display_width_cm.unwrap_or(g.display_width_cm),
        args.view_dist_cm.unwrap_or(g.view_dist_cm),
    );
    Ok(())
}

pub fn run(args: InfantArgs, mut settings: Settings) -> Result<()> {
    trace!(input = %args.image.input.display(), "infant::run");
    apply_geometry(&args.geometry, &mut settings)?;

    let mut img = super::load_raw(&args.image.input, args.image.width, args.image.height)?;
    if !img.is_square() {
        if !args.crop {
            bail!(
                "infant vision needs a square image, got {}x{} (use --crop)",
                img.width(),
                img.height()
            );
        }
        warn!(width = img.width(), height = img.height(), "cropping to centred square");
        img = img.center_square_crop();
    }

    let sim = settings.infant_vision();
    info!(age = %sim.age(), geometry = ?sim.geometry(), "Simulating infant vision");
    let out = sim.simulate(&img)?;
    super::save_raw(&args.image.output, &out)
}

pub fn run_plan(args: PlanArgs, mut settings: Settings) -> Result<()> {
    apply_geometry(&args.geometry, &mut settings)?;
    let plan = settings.infant_vision().plan(args.size, args.size)?;
    print!("{}", serde_yaml::to_string(&plan)?);
    Ok(())
}

pub fn run_presets() -> Result<()> {
    println!("{:<8} {:>10} {:>10} {:>10}", "age", "lum", "red-green", "blue-yel");
    for age in AgePreset::ALL {
        let [a, b, c] = age.coefficients();
        println!("{:<8} {:>10} {:>10} {:>10}", age.name(), a, b, c);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let mut s = Settings::default();
        let args = GeometryArgs {
            age: Some("week24".into()),
            display_width_cm: None,
            view_dist_cm: Some(25.0),
        };
        apply_geometry(&args, &mut s).unwrap();
        assert_eq!(s.age, AgePreset::Week24);
        assert_eq!(s.geometry, ViewingGeometry::new(50.0, 25.0));
    }

    #[test]
    fn test_unknown_age_flag() {
        let mut s = Settings::default();
        let args = GeometryArgs {
            age: Some("toddler".into()),
            display_width_cm: None,
            view_dist_cm: None,
        };
        assert!(apply_geometry(&args, &mut s).is_err());
    }
}
