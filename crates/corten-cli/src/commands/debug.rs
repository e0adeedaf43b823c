//! Plugin and bundle diagnostics
//!
//! `debug plugins` prints the discovered plugins with their capabilities;
//! naming one plugin lists the bundle declarations it contributes. `debug
//! bundles` prints the resolved order for the active environment, always
//! computed fresh so a stale cache artifact never hides a configuration
//! problem.

use crate::common::GlobalOpts;
use anyhow::{bail, Result};
use colored::Colorize;
use corten_bundle::{
    BundleDeclaration, BundleProvider, BundleResolver, DelegatingParser, IniParser, JsonParser,
};
use corten_config::DotEnvFile;
use corten_kernel::{default_factory, project_loader};
use corten_plugin::{Capability, PluginLoader, RegisteredPlugin};
use clap::Subcommand;
use std::path::Path;

/// Dotenv variable gating development access on the HTTP side
const ACCESS_KEY_VAR: &str = "APP_DEV_ACCESSKEY";

#[derive(Subcommand, Debug, Clone)]
pub enum DebugAction {
    /// List plugins and their capabilities, or one plugin's bundles
    Plugins { name: Option<String> },
    /// Print the resolved bundle order for the active environment
    Bundles,
    /// Set the debug access key, or remove it when no value is given
    AccessKey { value: Option<String> },
}

pub fn handle(action: DebugAction, opts: &GlobalOpts) -> Result<()> {
    match action {
        DebugAction::AccessKey { value } => update_access_key(value, opts),
        DebugAction::Plugins { name } => {
            let loader = project_loader(&opts.project_dir, default_factory(&opts.project_dir))?;

            match name {
                Some(name) => show_plugin(&loader, &name, opts),
                None => list_plugins(&loader),
            }
        }
        DebugAction::Bundles => {
            let loader = project_loader(&opts.project_dir, default_factory(&opts.project_dir))?;
            list_bundles(&loader, opts)
        }
    }
}

fn update_access_key(value: Option<String>, opts: &GlobalOpts) -> Result<()> {
    let mut file = DotEnvFile::load(opts.project_dir.join(".env"))?;

    match value {
        Some(value) => {
            file.set(ACCESS_KEY_VAR, value);
            file.save()?;
            println!("{} {ACCESS_KEY_VAR}", "set".green());
        }
        None => {
            if file.remove(ACCESS_KEY_VAR) {
                file.save()?;
                println!("{} {ACCESS_KEY_VAR}", "removed".yellow());
            }
        }
    }

    Ok(())
}

fn list_plugins(loader: &PluginLoader) -> Result<()> {
    let plugins = loader.instances()?;

    if plugins.is_empty() {
        println!("No plugins discovered.");
        return Ok(());
    }

    let package_width = column_width("Package", plugins.iter().map(RegisteredPlugin::package));
    let class_width = column_width("Class", plugins.iter().map(RegisteredPlugin::class_ref));

    let mut header = format!("{:<package_width$}  {:<class_width$}", "Package", "Class");
    for capability in Capability::ALL {
        header.push_str(&format!("  {}", capability.label()));
    }
    println!("{}", header.bold());

    for plugin in plugins {
        let mut line =
            format!("{:<package_width$}  {:<class_width$}", plugin.package(), plugin.class_ref());

        for capability in Capability::ALL {
            let mark = if plugin.supports(capability) { "\u{2714}" } else { "" };
            let width = capability.label().len();
            line.push_str(&format!("  {mark:^width$}"));
        }

        println!("{}", line.trim_end());
    }

    Ok(())
}

fn show_plugin(loader: &PluginLoader, name: &str, opts: &GlobalOpts) -> Result<()> {
    let plugins = loader.instances()?;

    let Some(plugin) = plugins
        .iter()
        .find(|plugin| plugin.package() == name || plugin.class_ref() == name)
    else {
        bail!("no plugin named \"{name}\" is installed");
    };

    println!("{} {}", "Package:".bold(), plugin.package());
    println!("{} {}", "Class:".bold(), plugin.class_ref());

    let labels: Vec<&str> =
        plugin.capabilities().iter().map(|capability| capability.label()).collect();
    println!("{} {}", "Capabilities:".bold(), labels.join(", "));

    if let Some(provider) = plugin.instance().as_bundle_provider() {
        let parser = module_parser(&opts.project_dir);
        let declarations = provider.bundles(&parser)?;

        println!("{}", "Bundles:".bold());

        for declaration in &declarations {
            println!("  {}", describe(declaration));
        }
    }

    Ok(())
}

fn list_bundles(loader: &PluginLoader, opts: &GlobalOpts) -> Result<()> {
    let environment = opts.environment()?;
    let plugins = loader.instances_of(Capability::Bundles)?;
    let providers: Vec<&dyn BundleProvider> =
        plugins.iter().filter_map(|plugin| plugin.instance().as_bundle_provider()).collect();

    let resolver = BundleResolver::new(module_parser(&opts.project_dir));
    let resolved = resolver.resolve(&providers, environment.is_dev(), None)?;

    for declaration in &resolved {
        println!("{}", describe(declaration));
    }

    Ok(())
}

/// The conventional parser chain, structured JSON before legacy INI
fn module_parser(project_dir: &Path) -> DelegatingParser {
    let mut parser = DelegatingParser::new();
    parser.register(Box::new(JsonParser));
    parser.register(Box::new(IniParser::new(project_dir.join("system").join("modules"))));
    parser
}

fn describe(declaration: &BundleDeclaration) -> String {
    let mut environments = Vec::new();

    if declaration.load_in_production {
        environments.push("prod");
    }

    if declaration.load_in_development {
        environments.push("dev");
    }

    let mut line = format!("{} [{}]", declaration.name, environments.join(", "));

    if !declaration.load_after.is_empty() {
        let after: Vec<&str> = declaration.load_after.iter().map(AsRef::as_ref).collect();
        line.push_str(&format!(" load-after: {}", after.join(", ")));
    }

    if !declaration.replaces.is_empty() {
        let replaces: Vec<&str> = declaration.replaces.iter().map(AsRef::as_ref).collect();
        line.push_str(&format!(" replaces: {}", replaces.join(", ")));
    }

    line
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).chain([header.len()]).max().unwrap_or(header.len())
}
