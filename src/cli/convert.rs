use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use spectrum_io::modification::{CustomMods, LabelChemistry};
use spectrum_io::search_result::{convert, ReadOptions, SearchEngineKind};
use spectrum_io::table::CompressionType;

use super::config::Config;
use super::Profile;

/// Arguments of the convert command after clap parsing
pub struct ConvertArgs {
    pub engine: SearchEngineKind,
    pub input: PathBuf,
    pub output: PathBuf,
    pub label: Option<String>,
    pub config: Option<PathBuf>,
    pub suffix: Option<String>,
    pub mods: Vec<String>,
    pub profile: Option<Profile>,
    pub compression_level: Option<i32>,
    pub row_group_size: Option<usize>,
}

/// Convert search engine results to the internal format
pub fn run(args: ConvertArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(engine) = &config.conversion.engine {
        let configured: SearchEngineKind = engine.parse()?;
        if configured != args.engine {
            warn!(
                "Config file selects engine {}, using {} from the command line",
                configured, args.engine
            );
        }
    }

    if !args.input.exists() {
        anyhow::bail!("Input does not exist: {}", args.input.display());
    }

    let mut options = ReadOptions::new();
    if let Some(label) = args.label.as_ref().or(config.conversion.label.as_ref()) {
        let label: LabelChemistry = label
            .parse()
            .with_context(|| format!("Invalid label chemistry '{}'", label))?;
        options = options.with_label(label);
    }
    if let Some(suffix) = args.suffix.or(config.conversion.suffix.clone()) {
        options = options.with_suffix(suffix);
    }
    if let Some(permutation) = config.permutation.clone() {
        options = options.with_permutation(permutation);
    }

    // Leave the mods unset unless something was given, engines treat None
    // and an empty mapping differently.
    let mut custom_mods = config.custom_mods()?;
    if !args.mods.is_empty() {
        let mods = custom_mods.get_or_insert_with(CustomMods::new);
        for assignment in &args.mods {
            let (key, unimod_id) = CustomMods::parse_assignment(assignment)
                .with_context(|| format!("Invalid --mod value '{}'", assignment))?;
            mods.insert(key, unimod_id);
        }
    }
    if let Some(mods) = custom_mods {
        options = options.with_custom_mods(mods);
    }

    let profile = match (args.profile, &config.conversion.profile) {
        (Some(profile), _) => profile,
        (None, Some(name)) => name.parse().map_err(anyhow::Error::msg)?,
        (None, None) => Profile::default(),
    };
    let mut writer_config = profile.writer_config();
    if let Some(level) = args.compression_level.or(config.conversion.compression_level) {
        writer_config.compression = CompressionType::Zstd(level);
    }
    if let Some(size) = args.row_group_size.or(config.conversion.row_group_size) {
        writer_config.row_group_size = size;
    }

    info!("spectrum-io - {} results to internal format", args.engine);
    info!("Input:  {}", args.input.display());
    info!("Output: {}", args.output.display());
    if let Some(label) = options.label {
        info!("Label: {}", label);
    }
    info!("Profile: {}", profile);

    let summary = convert(
        args.engine,
        &args.input,
        &options,
        Some(&args.output),
        &writer_config,
    )
    .with_context(|| format!("Conversion of {} failed", args.input.display()))?;

    info!("{}", summary);
    info!("Internal table written to {}", args.output.display());

    Ok(())
}
