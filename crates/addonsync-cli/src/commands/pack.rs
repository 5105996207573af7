use addonsync_core::{
    AddonUnit, BatchReporter, BatchResult, Cleaner, FieldRequirement, Packager, Settings,
    extract_metadata,
};

use super::common::{self, RunOptions};
use crate::cli::PackArgs;
use crate::config::ConfigValidator;
use crate::interactive::OverwritePrompter;

pub struct Pack;

impl Pack {
    /// Clean every discovered addon and write it to a named archive
    ///
    /// Returns whether every addon was packed.
    pub fn execute(args: &PackArgs, options: &RunOptions) -> anyhow::Result<bool> {
        let settings = options.settings(Self::overrides(args))?;
        let requirement = if args.strict {
            FieldRequirement::Strict
        } else {
            FieldRequirement::Basic
        };

        common::print_settings(
            "Packing Tool Settings",
            &[
                ("Addon Sources Directory", common::show(settings.source_dir.as_deref())),
                ("Output Directory", common::show(settings.release_dir.as_deref())),
                ("Excluded Addons", format!("{:?}", settings.excluded_names)),
                ("Remove Suffixes", format!("{:?}", settings.extra_suffixes)),
                ("Require Compatibility", args.strict.to_string()),
            ],
        );

        let source_dir =
            ConfigValidator::require_dir("source-dir", settings.source_dir.as_deref())?;
        let release_dir =
            ConfigValidator::require_dir("release-dir", settings.release_dir.as_deref())?;

        let discovery = common::discover(source_dir, &settings, options.verbose)?;
        let mut packager = Packager::new(source_dir, release_dir)
            .with_overwrite_approver(OverwritePrompter::new(options.yes_all).into_approver());
        let mut result = BatchResult::default();
        let mut total_cleared = 0;

        for unit in &discovery.units {
            let cleared = Self::pack_unit(&mut packager, unit, requirement, &settings);
            if let Some((archive, cleared)) = result.record(&unit.name, cleared) {
                total_cleared += cleared;
                if options.verbose {
                    println!("Packed {} -> {}", unit.name, archive);
                }
            }
        }

        if total_cleared > 0 {
            println!("Garbage Cleaning: {total_cleared} files removed.");
        }
        println!("{}", BatchReporter::generate_summary("Packed", &result));

        if result.is_success() {
            println!("Done!");
        }

        Ok(result.is_success())
    }

    /// Name, clean, and pack one addon
    ///
    /// The name comes first so an addon with bad metadata is left untouched.
    fn pack_unit(
        packager: &mut Packager,
        unit: &AddonUnit,
        requirement: FieldRequirement,
        settings: &Settings,
    ) -> addonsync_core::Result<(String, usize)> {
        let metadata = extract_metadata(&unit.path)?;
        let name = Packager::name_for(&metadata, requirement)?;
        let cleared = Cleaner::new(settings.suffixes()).clean(&unit.path)?;
        let report = packager.pack(&unit.path, &name)?;

        Ok((report.archive_path.display().to_string(), cleared))
    }

    fn overrides(args: &PackArgs) -> Settings {
        Settings {
            release_dir: args.release_dir.clone(),
            ..args.source.overrides()
        }
    }
}
