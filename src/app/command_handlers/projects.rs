use crate::app::command_support::{load_settings, parse_user_flag};
use crate::store::{ActiveProjectStore, ProjectStore};

pub fn cmd_projects() -> Result<String, String> {
    let settings = load_settings()?;
    let store = ProjectStore::new(settings.state_paths());
    let ids = store.list().map_err(|e| e.to_string())?;
    if ids.is_empty() {
        return Ok("no projects".to_string());
    }
    Ok(ids.join("\n"))
}

pub fn cmd_status(args: &[String]) -> Result<String, String> {
    let user_id = parse_user_flag(args, "status [--user <id>]")?;
    let settings = load_settings()?;
    let paths = settings.state_paths();
    let active = ActiveProjectStore::new(paths.clone(), settings.default_project_id.clone());
    let projects = ProjectStore::new(paths);

    let project_id = active.get(&user_id);
    let exists = projects.exists(&project_id);
    let state = projects.load(&project_id);
    let meta = &state.meta;

    let lines = [
        format!("user={user_id}"),
        format!("project={project_id}"),
        format!("stored={exists}"),
        format!("step={}", state.current_step.number()),
        format!("step3_phase={}", meta.step3_phase.as_str()),
        format!("step4_phase={}", meta.step4_phase.as_str()),
        format!("step6_phase={}", meta.step6_phase.as_str()),
        format!("step7_phase={}", meta.step7_phase.as_str()),
        format!("edit_mode={}", meta.edit_mode),
        format!("provider={}", settings.provider.kind),
    ];
    Ok(lines.join("\n"))
}
