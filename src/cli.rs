use std::path::PathBuf;

use clap::Parser;

use abundance_viewer::config::AnalysisConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Star table (.txt, .csv, .json or .parquet)
    #[arg(value_name = "STAR_TABLE")]
    pub input: Option<PathBuf>,

    /// Path to config JSON (created with defaults when missing)
    #[arg(long, default_value = "abundance.json")]
    pub config: PathBuf,

    /// Write the charts and exit without opening a window
    #[arg(long, default_value_t = false)]
    pub nogui: bool,

    /// Chart output directory (overrides config)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Europium solar reference constant (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    pub eu_solar: Option<f64>,

    /// Draw all stars as one point group
    #[arg(long, default_value_t = false)]
    pub no_groups: bool,
}

impl Args {
    /// Fold command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(eu) = self.eu_solar {
            config.solar.europium = eu;
        }
        if self.no_groups {
            config.provenance_groups = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::try_parse_from([
            "abundance-viewer",
            "stars.txt",
            "--nogui",
            "--eu-solar",
            "-13.82",
            "--out-dir",
            "plots",
            "--no-groups",
        ])
        .unwrap();
        assert!(args.nogui);
        assert_eq!(args.input, Some(PathBuf::from("stars.txt")));

        let mut cfg = AnalysisConfig::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.solar.europium, -13.82);
        assert_eq!(cfg.solar.barium, -9.87);
        assert_eq!(cfg.output_dir, PathBuf::from("plots"));
        assert!(!cfg.provenance_groups);
    }

    #[test]
    fn no_flags_keep_config() {
        let args = Args::try_parse_from(["abundance-viewer"]).unwrap();
        assert!(args.input.is_none());
        assert_eq!(args.config, PathBuf::from("abundance.json"));

        let mut cfg = AnalysisConfig::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg, AnalysisConfig::default());
    }
}
