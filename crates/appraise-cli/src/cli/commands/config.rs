use crate::cli::args::ConfigArgs;
use crate::cli::exit_codes;
use appraise_core::config::AppConfig;

pub(crate) fn configure(args: ConfigArgs) -> anyhow::Result<i32> {
    let path = match args.config.clone().or_else(AppConfig::default_path) {
        Some(p) => p,
        None => anyhow::bail!("no config directory available on this system"),
    };
    let mut config = AppConfig::load(&path)?;

    let is_empty = args.dst_dir.is_none()
        && args.report_name.is_none()
        && !args.enable_csv
        && !args.disable_csv
        && args.log_level.is_none();
    if is_empty {
        println!("{}", serde_yaml::to_string(&config)?.trim_end());
        println!("# file: {}", path.display());
        return Ok(exit_codes::OK);
    }

    if let Some(dir) = args.dst_dir {
        config.dst_dir = Some(dir);
    }
    if let Some(name) = args.report_name {
        config.report_name = name;
    }
    if args.enable_csv {
        config.enable_csv = true;
    }
    if args.disable_csv {
        config.enable_csv = false;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    config.save(&path)?;
    tracing::info!(path = %path.display(), "settings saved");
    Ok(exit_codes::OK)
}
