use crate::error::Result;
use chiralbd::core::units::UnitStyle;

pub fn run() -> Result<()> {
    let mut names: Vec<&str> = UnitStyle::names().collect();
    names.sort_unstable();

    println!("{:<8} {:>16} {:>16} {:>16}", "style", "boltz", "ftm2v", "mvv2e");
    for style in names.into_iter().filter_map(UnitStyle::by_name) {
        println!(
            "{:<8} {:>16.8e} {:>16.8e} {:>16.8e}",
            style.name, style.boltz, style.ftm2v, style.mvv2e
        );
    }
    Ok(())
}
