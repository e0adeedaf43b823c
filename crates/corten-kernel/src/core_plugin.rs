//! Core plugin of the manager layer
//!
//! The manager package registers this plugin for its own manifest entry. It
//! contributes the framework bundle set and the legacy module declarations,
//! loads the project parameter file, mounts the development tooling routes
//! and patches the `database`, `mailer` and `orm` container extensions with
//! deployment defaults.

use crate::dsn;
use corten_bundle::{BundleDeclaration, BundleError, BundleProvider, DeclarationParser};
use corten_plugin::{
    ConfigFragment, ConfigProvider, ContainerConfigLoader, ContainerContext, DependencyProvider,
    ExtensionConfigProvider, Plugin, PluginError, RouteDefinition, RouteProvider,
};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Class reference the manager package declares in its manifest entry
pub const CORE_PLUGIN_CLASS: &str = "corten::manager";

/// Package that provides the CMS core bundle
pub const CORE_PACKAGE: &str = "corten/core-bundle";

const APP_ENTITY_DIR: &str = "%kernel.project_dir%/src/entity";

const STRICT_MODE_SQL: &str =
    "SET SESSION sql_mode=CONCAT(@@sql_mode, IF(INSTR(@@sql_mode, 'STRICT_'), '', ',TRADITIONAL'))";

/// Plugin shipped with the manager layer itself
#[derive(Debug, Clone)]
pub struct CorePlugin {
    project_dir: PathBuf,
}

impl CorePlugin {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        CorePlugin { project_dir: project_dir.into() }
    }

    /// Framework bundles every installation registers
    ///
    /// The debug and profiler bundles only load in development; the manager
    /// and filesystem bundles sort behind the CMS core when it is installed.
    fn framework_bundles() -> Vec<BundleDeclaration> {
        vec![
            BundleDeclaration::new("corten/framework-bundle"),
            BundleDeclaration::new("corten/security-bundle")
                .with_load_after(["corten/framework-bundle"]),
            BundleDeclaration::new("corten/templating-bundle"),
            BundleDeclaration::new("corten/logging-bundle"),
            BundleDeclaration::new("corten/database-bundle"),
            BundleDeclaration::new("corten/cors-bundle"),
            BundleDeclaration::new("corten/headers-bundle"),
            BundleDeclaration::new("corten/http-cache-bundle"),
            BundleDeclaration::new("corten/manager-bundle").with_load_after([CORE_PACKAGE]),
            BundleDeclaration::new("corten/debug-bundle").with_load_in_production(false),
            BundleDeclaration::new("corten/profiler-bundle").with_load_in_production(false),
            BundleDeclaration::new("corten/filesystem-bundle").with_load_after([CORE_PACKAGE]),
        ]
    }

    /// Declarations for the legacy modules below `system/modules`
    ///
    /// Module directories are visited in name order; a directory carrying a
    /// `.skip` sentinel contributes nothing.
    fn legacy_module_bundles(
        &self,
        parser: &dyn DeclarationParser,
    ) -> Result<Vec<BundleDeclaration>, BundleError> {
        let modules_dir = self.project_dir.join("system").join("modules");

        if !modules_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();

        for entry in std::fs::read_dir(&modules_dir)? {
            let entry = entry?;

            if !entry.path().is_dir() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();

        let mut declarations = Vec::new();

        for name in names {
            if modules_dir.join(&name).join(".skip").exists() {
                debug!(module = %name, "legacy module skipped");
                continue;
            }

            declarations.extend(parser.parse(&name, Some("ini"))?);
        }

        Ok(declarations)
    }

    /// Adds the application entity mapping when auto mapping is on and no
    /// fragment maps the application namespace yet
    fn patch_orm(&self, fragments: &mut Vec<ConfigFragment>) {
        let mut entity_manager = "default".to_string();

        for fragment in fragments.iter() {
            if let Some(name) = fragment.get("default_entity_manager").and_then(Value::as_str) {
                entity_manager = name.to_string();
            }
        }

        let mut auto_mapping = false;
        let mut app_is_mapped = false;

        for fragment in fragments.iter() {
            if fragment.get("auto_mapping").and_then(Value::as_bool) == Some(true) {
                auto_mapping = true;
            }

            if fragment
                .get("entity_managers")
                .and_then(|managers| managers.get(&entity_manager))
                .and_then(|manager| manager.get("auto_mapping"))
                .and_then(Value::as_bool)
                == Some(true)
            {
                auto_mapping = true;
            }

            for mappings in mapping_tables(fragment) {
                for (name, mapping) in mappings {
                    if name == "app"
                        || mapping.get("alias").and_then(Value::as_str) == Some("app")
                        || mapping.get("dir").and_then(Value::as_str) == Some(APP_ENTITY_DIR)
                    {
                        app_is_mapped = true;
                    }
                }
            }
        }

        if !auto_mapping || app_is_mapped {
            return;
        }

        if !self.project_dir.join("src").join("entity").is_dir() {
            return;
        }

        let mut managers = Map::new();
        managers.insert(
            entity_manager,
            json!({"mappings": {"app": {
                "dir": APP_ENTITY_DIR,
                "prefix": "app::entity",
                "alias": "app"
            }}}),
        );

        fragments.push(json!({"entity_managers": managers}));
    }
}

impl Plugin for CorePlugin {
    fn as_bundle_provider(&self) -> Option<&dyn BundleProvider> {
        Some(self)
    }

    fn as_config_provider(&self) -> Option<&dyn ConfigProvider> {
        Some(self)
    }

    fn as_route_provider(&self) -> Option<&dyn RouteProvider> {
        Some(self)
    }

    fn as_extension_provider(&self) -> Option<&dyn ExtensionConfigProvider> {
        Some(self)
    }

    fn as_dependency_provider(&self) -> Option<&dyn DependencyProvider> {
        Some(self)
    }
}

impl BundleProvider for CorePlugin {
    fn bundles(
        &self,
        parser: &dyn DeclarationParser,
    ) -> Result<Vec<BundleDeclaration>, BundleError> {
        let mut bundles = CorePlugin::framework_bundles();
        bundles.extend(self.legacy_module_bundles(parser)?);
        Ok(bundles)
    }
}

impl ConfigProvider for CorePlugin {
    fn register_container_config(
        &self,
        loader: &mut dyn ContainerConfigLoader,
        _manager_config: &ConfigFragment,
    ) -> Result<(), PluginError> {
        let parameters = self.project_dir.join("config").join("parameters.yaml");

        if parameters.is_file() {
            loader.load_file(&parameters)?;
        }

        Ok(())
    }
}

impl RouteProvider for CorePlugin {
    fn routes(&self) -> Result<Vec<RouteDefinition>, PluginError> {
        Ok(vec![
            RouteDefinition::new("site.wdt", "/_wdt/{token}"),
            RouteDefinition::new("site.profiler_home", "/_profiler/"),
            RouteDefinition::new("site.profiler", "/_profiler/{token}"),
            RouteDefinition::new("site.install_redirect", "/install.php")
                .with_controller("site.redirect::install"),
        ])
    }
}

impl ExtensionConfigProvider for CorePlugin {
    fn extension_config(
        &self,
        extension: &str,
        mut fragments: Vec<ConfigFragment>,
        context: &mut ContainerContext,
    ) -> Result<Vec<ConfigFragment>, PluginError> {
        match extension {
            "database" => patch_database(&mut fragments, context),
            "mailer" => patch_mailer(&mut fragments, context)?,
            "orm" => self.patch_orm(&mut fragments),
            _ => {}
        }

        Ok(fragments)
    }
}

fn patch_database(fragments: &mut Vec<ConfigFragment>, context: &mut ContainerContext) {
    if context.env("DATABASE_URL").is_none() {
        let url = dsn::database_url(fragments, context);
        context.set_env_default("DATABASE_URL", url);
    }

    add_strict_mode_options(fragments, context);
    add_default_collation(fragments);
}

fn patch_mailer(
    fragments: &mut Vec<ConfigFragment>,
    context: &mut ContainerContext,
) -> Result<(), PluginError> {
    if context.string_parameter("mailer_transport").as_deref() == Some("mail") {
        context.set_parameter("mailer_transport", json!("sendmail"));
    }

    if context.env("MAILER_DSN").is_none() {
        let dsn = match context.env("MAILER_URL") {
            Some(url) => dsn::mailer_dsn_from_url(url)?,
            None => dsn::mailer_dsn(context),
        };
        context.set_env_default("MAILER_DSN", dsn);
    }

    add_default_mailer(fragments);
    Ok(())
}

impl DependencyProvider for CorePlugin {
    fn package_dependencies(&self) -> Vec<Arc<str>> {
        vec![CORE_PACKAGE.into()]
    }
}

/// The mapping tables of one `orm` fragment, top level and per entity manager
fn mapping_tables(fragment: &ConfigFragment) -> Vec<&Map<String, Value>> {
    let mut tables = Vec::new();

    if let Some(mappings) = fragment.get("mappings").and_then(Value::as_object) {
        tables.push(mappings);
    }

    if let Some(managers) = fragment.get("entity_managers").and_then(Value::as_object) {
        for manager in managers.values() {
            if let Some(mappings) = manager.get("mappings").and_then(Value::as_object) {
                tables.push(mappings);
            }
        }
    }

    tables
}

/// Appends the session strict-mode init command unless one is configured
///
/// The init command option key depends on the effective driver.
fn add_strict_mode_options(fragments: &mut Vec<ConfigFragment>, context: &ContainerContext) {
    let (driver, options) = dsn::database_driver_and_options(fragments, context);

    let option_key = match driver.as_deref() {
        Some("mysql") => "1002",
        Some("mysqli") => "3",
        _ => return,
    };

    if options.contains_key(option_key) {
        return;
    }

    let mut init_command = Map::new();
    init_command.insert(option_key.to_string(), json!(STRICT_MODE_SQL));

    fragments.push(json!({"connections": {"default": {"options": init_command}}}));
}

/// Mirrors a configured collation onto both spellings of the table option
fn add_default_collation(fragments: &mut Vec<ConfigFragment>) {
    let mut collation: Option<Value> = None;

    for fragment in fragments.iter() {
        let Some(table_options) = fragment.pointer("/connections/default/default_table_options")
        else {
            continue;
        };

        if let Some(value) = table_options.get("collation").or_else(|| table_options.get("collate"))
        {
            if !value.is_null() {
                collation = Some(value.clone());
            }
        }
    }

    let Some(collation) = collation else {
        return;
    };

    fragments.push(json!({"connections": {"default": {"default_table_options": {
        "collate": collation.clone(),
        "collation": collation
    }}}}));
}

/// Appends the environment-driven default mailer unless one is configured
fn add_default_mailer(fragments: &mut Vec<ConfigFragment>) {
    let configured = fragments
        .iter()
        .any(|fragment| fragment.get("transports").is_some() || fragment.get("dsn").is_some());

    if !configured {
        fragments.push(json!({"dsn": "%env(MAILER_DSN)%"}));
    }
}
