//! Rolldown plugin that keeps declared packages out of the bundle.
//!
//! Rolldown's own `external` list matches ids exactly, so a deep import such
//! as `left-pad/lib/pad.js` would still be inlined. This plugin claims every
//! bare specifier that belongs to an external package (the package itself or
//! any subpath of it) and marks it external, leaving a runtime `require`.

use rolldown_common::ResolvedExternal;
use rolldown_plugin::{
    HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};
use stacks_core::ExternalPackages;
use std::borrow::Cow;
use std::sync::Arc;

/// Marks imports of external packages as unresolved runtime requires.
#[derive(Debug, Clone)]
pub struct ExternalPackagesPlugin {
    externals: Arc<ExternalPackages>,
}

impl ExternalPackagesPlugin {
    pub fn new(externals: ExternalPackages) -> Self {
        Self {
            externals: Arc::new(externals),
        }
    }

    /// Whether `specifier` must stay external.
    pub fn is_external(&self, specifier: &str) -> bool {
        !is_relative_or_absolute(specifier) && self.externals.matches(specifier)
    }
}

impl Plugin for ExternalPackagesPlugin {
    fn name(&self) -> Cow<'static, str> {
        "stacks-external-packages".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let external = self.is_external(&specifier);

        async move {
            if !external {
                // Let Rolldown resolve and inline it
                return Ok(None);
            }

            tracing::trace!(specifier = %specifier, "keeping import external");
            Ok(Some(HookResolveIdOutput {
                id: specifier.into(),
                external: Some(ResolvedExternal::Bool(true)),
                ..Default::default()
            }))
        }
    }
}

fn is_relative_or_absolute(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/') || specifier.starts_with('\\')
}
