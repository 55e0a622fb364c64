use crate::app::command_support::{ensure_runtime_root, map_config_err};
use crate::config::{
    default_global_config_path, home_directory, save_settings, Settings, GLOBAL_STATE_DIR,
};
use crate::runtime::append_runtime_log;
use crate::templates::install_default_step_catalog;

/// Writes the config on first run, then (re)creates directories and any
/// missing step descriptors. Existing files are never overwritten.
pub fn cmd_setup() -> Result<String, String> {
    let config_path = default_global_config_path().map_err(map_config_err)?;
    let created_config = !config_path.exists();
    let settings = if created_config {
        let home = home_directory().map_err(map_config_err)?;
        let settings = Settings::with_state_root(home.join(GLOBAL_STATE_DIR));
        save_settings(&settings).map_err(map_config_err)?;
        settings
    } else {
        let settings = Settings::from_path(&config_path).map_err(map_config_err)?;
        settings.validate().map_err(map_config_err)?;
        settings
    };

    let paths = ensure_runtime_root(&settings)?;
    let steps_dir = paths.steps_dir();
    let installed = install_default_step_catalog(&steps_dir)
        .map_err(|e| format!("failed to install step catalog in {}: {e}", steps_dir.display()))?;
    append_runtime_log(
        &paths,
        "info",
        "setup.completed",
        &format!(
            "config_created={created_config} step_descriptors_installed={}",
            installed.len()
        ),
    );

    Ok(format!(
        "setup complete\nconfig={}\nconfig_created={created_config}\nstate_root={}\nsteps_dir={}\nstep_descriptors_installed={}\nprovider={}\nmodel={}",
        config_path.display(),
        paths.root.display(),
        steps_dir.display(),
        installed.len(),
        settings.provider.kind,
        settings.methodologist_model,
    ))
}
