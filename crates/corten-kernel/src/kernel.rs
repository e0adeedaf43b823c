//! Kernel integration
//!
//! The kernel glues the plugin loader, the bundle resolver and the active
//! environment together. It memoizes the resolved bundle order for its own
//! lifetime, assembles container configuration with the environment skeleton
//! last, mounts the manager routes only in development and folds extension
//! patches in plugin discovery order.

use crate::cache::BUNDLE_CACHE_FILE;
use crate::core_plugin::{CorePlugin, CORE_PLUGIN_CLASS};
use crate::environment::Environment;
use crate::errors::KernelError;
use crate::routes::RouteCollection;
use ahash::AHashMap;
use corten_bundle::{
    BundleDeclaration, BundleProvider, BundleResolver, DelegatingParser, IniParser, JsonParser,
};
use corten_config::ManagerConfig;
use corten_plugin::{
    Capability, ConfigFragment, ContainerConfigLoader, ContainerContext, PluginError,
    PluginFactory, PluginLoader, RouteDefinition,
};
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Relative path of the installed-package manifest
pub const INSTALLED_MANIFEST: &str = "vendor/installed.json";

const PROD_SKELETON: &str = include_str!("skeleton/config_prod.yaml");
const DEV_SKELETON: &str = include_str!("skeleton/config_dev.yaml");

/// Builds the plugin factory with the plugin shipped in this workspace
///
/// Callers register additional plugin classes on the returned factory.
pub fn default_factory(project_dir: &Path) -> PluginFactory {
    let mut factory = PluginFactory::new();
    let dir = project_dir.to_path_buf();
    factory.register(CORE_PLUGIN_CLASS, move || Box::new(CorePlugin::new(dir.clone())));
    factory
}

/// Creates the plugin loader for a project, honoring disabled packages
pub fn project_loader(
    project_dir: &Path,
    factory: PluginFactory,
) -> Result<PluginLoader, KernelError> {
    let config = ManagerConfig::load(project_dir)?;
    let manifest = project_dir.join(INSTALLED_MANIFEST);
    Ok(PluginLoader::new(manifest, config.disabled_packages(), factory))
}

/// One recorded configuration source, in load order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub origin: String,
    pub content: String,
}

/// Config loader that records its sources in order
///
/// Stands in for the container side of the configuration seam in the CLI
/// and in tests.
#[derive(Debug, Default)]
pub struct RecordingConfigLoader {
    sources: Vec<ConfigSource>,
}

impl RecordingConfigLoader {
    pub fn new() -> Self {
        RecordingConfigLoader::default()
    }

    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }
}

impl ContainerConfigLoader for RecordingConfigLoader {
    fn load_file(&mut self, path: &Path) -> Result<(), PluginError> {
        let content = std::fs::read_to_string(path)?;
        self.sources.push(ConfigSource { origin: path.display().to_string(), content });
        Ok(())
    }

    fn load_str(&mut self, origin: &str, content: &str) -> Result<(), PluginError> {
        self.sources
            .push(ConfigSource { origin: origin.to_string(), content: content.to_string() });
        Ok(())
    }
}

/// Framework integration point of the manager layer
pub struct Kernel {
    project_dir: PathBuf,
    environment: Environment,
    loader: PluginLoader,
    resolver: BundleResolver,
    bundles: OnceCell<Vec<BundleDeclaration>>,
}

impl Kernel {
    /// Creates a kernel with the conventional parser chain
    ///
    /// The structured JSON format takes precedence over the legacy INI
    /// format rooted at `system/modules`.
    pub fn new(
        project_dir: impl Into<PathBuf>,
        environment: Environment,
        loader: PluginLoader,
    ) -> Self {
        let project_dir = project_dir.into();

        let mut parser = DelegatingParser::new();
        parser.register(Box::new(JsonParser));
        parser.register(Box::new(IniParser::new(project_dir.join("system").join("modules"))));

        Kernel {
            resolver: BundleResolver::new(parser),
            bundles: OnceCell::new(),
            project_dir,
            environment,
            loader,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    /// Path of the bundle cache artifact for this environment
    pub fn bundle_cache_path(&self) -> PathBuf {
        self.environment.cache_dir(&self.project_dir).join(BUNDLE_CACHE_FILE)
    }

    /// The resolved bundle order, computed once per kernel
    ///
    /// Outside of development the resolver reads and writes the bundle
    /// cache artifact.
    pub fn registered_bundles(&self) -> Result<&[BundleDeclaration], KernelError> {
        self.bundles.get_or_try_init(|| self.resolve_bundles()).map(Vec::as_slice)
    }

    fn resolve_bundles(&self) -> Result<Vec<BundleDeclaration>, KernelError> {
        let plugins = self.loader.instances_of(Capability::Bundles)?;
        let providers: Vec<&dyn BundleProvider> =
            plugins.iter().filter_map(|plugin| plugin.instance().as_bundle_provider()).collect();

        let cache_path = (!self.environment.is_dev()).then(|| self.bundle_cache_path());

        let resolved =
            self.resolver.resolve(&providers, self.environment.is_dev(), cache_path.as_deref())?;

        info!(count = resolved.len(), environment = %self.environment, "bundles resolved");
        Ok(resolved)
    }

    /// Assembles container configuration
    ///
    /// Every config plugin contributes in discovery order with the manager
    /// configuration in hand; the environment skeleton loads last so its
    /// settings close the list.
    pub fn container_config(
        &self,
        loader: &mut dyn ContainerConfigLoader,
    ) -> Result<(), KernelError> {
        let manager_config = self.manager_config_fragment()?;

        for plugin in self.loader.instances_of(Capability::Config)? {
            if let Some(provider) = plugin.instance().as_config_provider() {
                provider.register_container_config(loader, &manager_config)?;
            }
        }

        let (origin, content) = match self.environment {
            Environment::Production => ("config_prod.yaml", PROD_SKELETON),
            Environment::Development => ("config_dev.yaml", DEV_SKELETON),
        };
        loader.load_str(origin, content)?;

        Ok(())
    }

    /// Routes mounted by the manager layer; empty outside development
    ///
    /// Routing plugins aggregate in reverse discovery order, so a route name
    /// contributed by an earlier-discovered plugin overrides later ones.
    /// The project route file loads after the plugins, and the late site
    /// routes are re-appended so the catch-all stays at the tail.
    pub fn routes(&self) -> Result<Vec<RouteDefinition>, KernelError> {
        if !self.environment.is_dev() {
            return Ok(Vec::new());
        }

        let mut collection = RouteCollection::new();

        for plugin in self.loader.instances_of(Capability::Routing)?.iter().rev() {
            if let Some(provider) = plugin.instance().as_route_provider() {
                collection.extend(provider.routes()?);
            }
        }

        let route_file = self.project_dir.join("config").join("routes.yaml");

        if route_file.is_file() {
            let content = std::fs::read_to_string(&route_file)?;
            let routes: Vec<RouteDefinition> =
                serde_yaml::from_str(&content).map_err(|source| KernelError::MalformedRoutes {
                    path: route_file.clone(),
                    source,
                })?;
            collection.extend(routes);
        }

        collection.push_late_routes();

        Ok(collection.into_routes())
    }

    /// Folds the patches of every extension plugin over the fragment list
    pub fn extension_config(
        &self,
        extension: &str,
        fragments: Vec<ConfigFragment>,
        context: &mut ContainerContext,
    ) -> Result<Vec<ConfigFragment>, KernelError> {
        let mut fragments = fragments;

        for plugin in self.loader.instances_of(Capability::ExtensionConfig)? {
            if let Some(provider) = plugin.instance().as_extension_provider() {
                fragments = provider.extension_config(extension, fragments, context)?;
            }
        }

        Ok(fragments)
    }

    /// Builds the extension patch context from the project parameter file
    /// and the given environment snapshot
    pub fn container_context(
        &self,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<ContainerContext, KernelError> {
        let mut parameters: AHashMap<String, Value> = AHashMap::new();
        let path = self.project_dir.join("config").join("parameters.yaml");

        if path.is_file() {
            let content = std::fs::read_to_string(&path)?;
            let document: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|source| {
                KernelError::MalformedParameters { path: path.clone(), source }
            })?;

            if let Some(serde_yaml::Value::Mapping(mapping)) = document.get("parameters") {
                for (key, value) in mapping {
                    let Some(key) = key.as_str() else {
                        continue;
                    };
                    parameters.insert(key.to_string(), serde_json::to_value(value)?);
                }
            }
        }

        Ok(ContainerContext::new()
            .with_parameters(parameters)
            .with_env(env.into_iter().collect()))
    }

    /// The manager configuration as a fragment for plugin consumption
    fn manager_config_fragment(&self) -> Result<ConfigFragment, KernelError> {
        let config = ManagerConfig::load(&self.project_dir)?;
        Ok(serde_json::to_value(config.all())?)
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("project_dir", &self.project_dir)
            .field("environment", &self.environment)
            .field("resolved", &self.bundles.get().is_some())
            .finish()
    }
}
