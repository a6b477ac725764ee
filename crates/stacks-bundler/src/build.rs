//! The bundling pass.
//!
//! Checks the entry, reads the manifest, runs Rolldown once and writes the
//! result into `.sst/stacks/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, ResolveOptions,
    SourceMapType,
};
use rolldown_common::BundlerTransformOptions;
use rolldown_plugin::__inner::SharedPluginable;
use stacks_core::{Config, ExternalPackages, PackageManifest};

use crate::external_plugin::ExternalPackagesPlugin;
use crate::settings::BuildSettings;
use crate::writer::write_bundle;
use crate::{Error, Result};

/// Bundle the app at `root` into `<root>/.sst/stacks/index.js`.
///
/// Fails with [`Error::MissingEntry`] before anything else happens if the
/// configured entry file does not exist; in that case no file is written.
pub async fn build(root: &Path, config: &Config) -> Result<()> {
    build_with(root, config, &BuildSettings::default()).await
}

/// [`build`] with explicit settings.
pub async fn build_with(root: &Path, config: &Config, settings: &BuildSettings) -> Result<()> {
    let entry = config.entry_path(root);
    if !is_file(&entry).await {
        tracing::debug!(entry = %entry.display(), "app entry not found");
        return Err(Error::MissingEntry {
            main: config.main.clone(),
            expected: entry,
        });
    }

    let externals = read_externals(root, &settings.infrastructure_package).await?;

    let options = configure_rolldown_options(root, &entry, settings);
    let external_plugin: SharedPluginable = Arc::new(ExternalPackagesPlugin::new(externals));

    let mut bundler = BundlerBuilder::default()
        .with_options(options)
        .with_plugins(vec![external_plugin])
        .build()
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    let output = bundler
        .generate()
        .await
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    if !output.warnings.is_empty() {
        tracing::warn!(count = output.warnings.len(), "bundler reported warnings");
    }

    let written = write_bundle(&output, &settings.output_dir(root))?;
    tracing::info!(
        entry = %config.main.display(),
        output = %settings.output_file(root).display(),
        files = written.len(),
        "bundled app"
    );

    Ok(())
}

/// Where [`build`] writes the bundle for a project rooted at `root`.
pub fn output_file(root: &Path) -> PathBuf {
    BuildSettings::default().output_file(root)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn read_externals(root: &Path, infrastructure: &str) -> Result<ExternalPackages> {
    let path = PackageManifest::path_in(root);
    let content = tokio::fs::read_to_string(&path).await.map_err(|source| {
        stacks_core::Error::ManifestRead {
            path: path.clone(),
            source,
        }
    })?;
    let manifest = PackageManifest::from_json(&path, &content)?;
    Ok(manifest.external_packages(infrastructure))
}

fn configure_rolldown_options(root: &Path, entry: &Path, settings: &BuildSettings) -> BundlerOptions {
    BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(settings.entry_name.clone()),
            import: entry.to_string_lossy().into_owned(),
        }]),
        cwd: Some(root.to_path_buf()),
        format: Some(OutputFormat::Cjs),
        platform: Some(Platform::Node),
        sourcemap: settings.sourcemap.then_some(SourceMapType::File),
        keep_names: Some(settings.keep_names),
        transform: Some(BundlerTransformOptions {
            target: Some(either::Either::Left(settings.target.clone())),
            ..Default::default()
        }),
        resolve: Some(configure_resolution()),
        ..Default::default()
    }
}

fn configure_resolution() -> ResolveOptions {
    ResolveOptions {
        main_fields: Some(vec!["module".to_string(), "main".to_string()]),
        condition_names: Some(vec![
            "node".to_string(),
            "require".to_string(),
            "default".to_string(),
        ]),
        extensions: Some(vec![
            ".ts".to_string(),
            ".tsx".to_string(),
            ".js".to_string(),
            ".mjs".to_string(),
            ".cjs".to_string(),
            ".json".to_string(),
        ]),
        symlinks: Some(true),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_fix_the_output_contract() {
        let settings = BuildSettings::default();
        let options = configure_rolldown_options(
            Path::new("/app"),
            Path::new("/app/stacks/handler.ts"),
            &settings,
        );

        let input = options.input.unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(input[0].name.as_deref(), Some("index"));
        assert_eq!(input[0].import, "/app/stacks/handler.ts");
        assert!(matches!(options.format, Some(OutputFormat::Cjs)));
        assert!(matches!(options.platform, Some(Platform::Node)));
        assert!(matches!(options.sourcemap, Some(SourceMapType::File)));
        assert_eq!(options.keep_names, Some(true));
    }

    #[test]
    fn sourcemap_can_be_disabled() {
        let settings = BuildSettings {
            sourcemap: false,
            ..Default::default()
        };
        let options =
            configure_rolldown_options(Path::new("/app"), Path::new("/app/index.ts"), &settings);
        assert!(options.sourcemap.is_none());
    }

    #[test]
    fn output_file_is_independent_of_entry_name() {
        assert_eq!(
            output_file(Path::new("/app")),
            PathBuf::from("/app/.sst/stacks/index.js")
        );
    }
}
